//! Authenticated request wrapper shared by every store.

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
use crate::auth::TokenStore;
use crate::config::{AuthScheme, ClientConfig};
use crate::error::{Error, Result};
use crate::util::compact_text;

/// Callback run after the backend rejects the stored token.
pub type SignOutHook = Arc<dyn Fn() + Send + Sync>;

/// Whether a request may go out without a stored token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    Required,
    Optional,
}

/// Builds, authenticates, sends, and decodes backend requests.
///
/// Cloning is cheap; clones share the transport, the token store, and the
/// sign-out hook.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    auth_scheme: AuthScheme,
    sign_out_hook: Arc<RwLock<Option<SignOutHook>>>,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
        auth_scheme: AuthScheme,
    ) -> Self {
        Self {
            transport,
            tokens,
            auth_scheme,
            sign_out_hook: Arc::new(RwLock::new(None)),
        }
    }

    /// Client over the production `reqwest` transport.
    pub fn from_config(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), tokens, config.auth_scheme))
    }

    /// Register the callback invoked when a request comes back 401.
    pub fn on_sign_out(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.sign_out_hook.write() = Some(Arc::new(hook));
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn has_token(&self) -> Result<bool> {
        Ok(self.tokens.load_token()?.is_some())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, auth: AuthRequirement) -> Result<T> {
        self.get_with_query(path, &[], auth).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        auth: AuthRequirement,
    ) -> Result<T> {
        let response = self.execute(Method::GET, path, query, None, auth).await?;
        decode(&response)
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let response = self
            .execute(Method::POST, path, &[], Some(body), AuthRequirement::Required)
            .await?;
        decode(&response)
    }

    /// POST that attaches the token if one exists but does not require it.
    pub async fn post_public<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let response = self
            .execute(Method::POST, path, &[], Some(body), AuthRequirement::Optional)
            .await?;
        decode(&response)
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let response = self
            .execute(Method::PUT, path, &[], Some(body), AuthRequirement::Required)
            .await?;
        decode(&response)
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::DELETE, path, &[], None, AuthRequirement::Required)
            .await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
        auth: AuthRequirement,
    ) -> Result<ApiResponse> {
        let authorization = match self.tokens.load_token()? {
            Some(token) => Some(self.auth_scheme.header_value(&token)),
            None if auth == AuthRequirement::Required => return Err(Error::NotAuthenticated),
            None => None,
        };

        let request = ApiRequest {
            method,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(key, value)| ((*key).to_string(), value.clone()))
                .collect(),
            authorization,
            body,
        };
        tracing::debug!(method = %request.method, path, "Sending API request");

        let response = self.transport.send(request).await?;
        if response.status == 401 {
            self.handle_unauthorized();
            return Err(Error::Unauthorized);
        }
        if !response.is_success() {
            return Err(Error::Api {
                status: response.status,
                message: parse_api_error(response.status, &response.body),
            });
        }
        Ok(response)
    }

    fn handle_unauthorized(&self) {
        tracing::warn!("Backend rejected the stored token; signing out");
        if let Err(error) = self.tokens.clear_token() {
            tracing::error!("Failed to clear rejected token: {}", error);
        }
        let hook = self.sign_out_hook.read().clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T> {
    let body = response.body.trim();
    if body.is_empty() {
        return Ok(serde_json::from_str("null")?);
    }
    Ok(serde_json::from_str(body)?)
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
    msg: Option<String>,
}

fn parse_api_error(status: u16, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.msg).or(payload.error) {
            return message.trim().to_string();
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::test_support::ScriptedTransport;

    fn client(transport: &Arc<ScriptedTransport>, token: Option<&str>) -> ApiClient {
        let store = match token {
            Some(token) => MemoryTokenStore::with_token(token).unwrap(),
            None => MemoryTokenStore::new(),
        };
        ApiClient::new(transport.clone(), Arc::new(store), AuthScheme::Raw)
    }

    #[tokio::test]
    async fn attaches_raw_token_header() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::GET, "/auth/get-user", 200, serde_json::json!({}));
        let api = client(&transport, Some("tok-1"));

        let _: Value = api
            .get("/auth/get-user", AuthRequirement::Required)
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].authorization.as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn bearer_scheme_prefixes_token() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::GET, "/auth/get-user", 200, serde_json::json!({}));
        let store = MemoryTokenStore::with_token("tok-2").unwrap();
        let api = ApiClient::new(transport.clone(), Arc::new(store), AuthScheme::Bearer);

        let _: Value = api
            .get("/auth/get-user", AuthRequirement::Required)
            .await
            .unwrap();

        assert_eq!(
            transport.requests()[0].authorization.as_deref(),
            Some("Bearer tok-2")
        );
    }

    #[tokio::test]
    async fn required_auth_without_token_sends_nothing() {
        let transport = ScriptedTransport::new();
        let api = client(&transport, None);

        let error = api
            .post::<_, Value>("/gym/add-gym", &serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(matches!(error, Error::NotAuthenticated));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn optional_auth_without_token_omits_header() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::GET,
            "/properties/availableProperty",
            200,
            serde_json::json!([]),
        );
        let api = client(&transport, None);

        let _: Value = api
            .get("/properties/availableProperty", AuthRequirement::Optional)
            .await
            .unwrap();

        assert_eq!(transport.requests()[0].authorization, None);
    }

    #[tokio::test]
    async fn unauthorized_clears_token_and_runs_hook() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::GET,
            "/auth/get-user",
            401,
            serde_json::json!({ "message": "jwt expired" }),
        );
        let api = client(&transport, Some("stale"));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        api.on_sign_out(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let error = api
            .get::<Value>("/auth/get-user", AuthRequirement::Required)
            .await
            .unwrap_err();

        assert!(matches!(error, Error::Unauthorized));
        assert!(!api.has_token().unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_error_message_is_extracted() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::DELETE,
            "/gym/delete-gym/g1",
            500,
            serde_json::json!({ "error": "database unavailable" }),
        );
        let api = client(&transport, Some("tok"));

        let error = api.delete("/gym/delete-gym/g1").await.unwrap_err();
        match error {
            Error::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database unavailable");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn parse_api_error_falls_back_to_status() {
        assert_eq!(parse_api_error(502, "   "), "HTTP 502");
        assert_eq!(parse_api_error(400, "bad input"), "bad input");
    }

    #[test]
    fn decode_accepts_empty_body() {
        let response = ApiResponse {
            status: 204,
            body: String::new(),
        };
        let value: Option<Value> = decode(&response).unwrap();
        assert!(value.is_none());
    }
}
