//! One signed-in (or anonymous) client: the shared API client plus every store.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::{AuthService, TokenStore};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::stores::{BlogStore, GymStore, ParkingStore, PropertyStore};

pub struct Session {
    api: ApiClient,
    pub auth: AuthService,
    pub properties: PropertyStore,
    pub gyms: GymStore,
    pub parking: ParkingStore,
    pub blogs: BlogStore,
}

impl Session {
    /// Build a session over the production HTTP transport.
    pub fn connect(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let api = ApiClient::from_config(config, tokens)?;
        tracing::debug!(base_url = %config.api_base_url, "Connected session");
        Ok(Self::with_client(api, config.blog_page_size))
    }

    pub fn with_client(api: ApiClient, blog_page_size: u32) -> Self {
        Self {
            auth: AuthService::new(api.clone()),
            properties: PropertyStore::new(api.clone()),
            gyms: GymStore::new(api.clone()),
            parking: ParkingStore::new(api.clone()),
            blogs: BlogStore::new(api.clone(), blog_page_size),
            api,
        }
    }

    /// Run `hook` whenever the backend rejects the stored token.
    pub fn on_sign_out(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.api.on_sign_out(hook);
    }

    /// Cancel in-flight calls of every store.
    pub fn close(&self) {
        self.properties.close();
        self.gyms.close();
        self.parking.close();
        self.blogs.close();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use reqwest::Method;

    use super::*;
    use crate::api::endpoints;
    use crate::error::Error;
    use crate::test_support::{api_client, ScriptedTransport};

    #[tokio::test]
    async fn rejected_token_signs_out_every_store() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::GET,
            endpoints::GYMS,
            401,
            serde_json::json!({ "message": "jwt expired" }),
        );
        let session = Session::with_client(api_client(&transport, Some("stale")), 10);
        let signed_out = Arc::new(AtomicUsize::new(0));
        let counter = signed_out.clone();
        session.on_sign_out(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let error = session.gyms.ensure_loaded().await.unwrap_err();

        assert!(matches!(error, Error::Unauthorized));
        assert_eq!(signed_out.load(Ordering::SeqCst), 1);
        assert!(!session.auth.is_signed_in().unwrap());
    }

    #[tokio::test]
    async fn close_cancels_every_store() {
        let transport = ScriptedTransport::new();
        let session = Session::with_client(api_client(&transport, Some("tok")), 10);
        session.close();

        assert!(matches!(
            session.properties.ensure_loaded().await,
            Err(Error::Cancelled)
        ));
        assert!(matches!(
            session.blogs.load_more_posts().await,
            Err(Error::Cancelled)
        ));
        assert!(transport.requests().is_empty());
    }
}
