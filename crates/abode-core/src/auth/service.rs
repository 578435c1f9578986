use serde::Deserialize;

use crate::api::{endpoints, ApiClient, AuthRequirement, RecordPayload};
use crate::error::{Error, Result};
use crate::models::User;

/// Sign-in and user lookups against the auth routes.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange credentials for a token and persist it.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        validate_credentials(email, password)?;

        // Login is the one mutation that runs before a token exists.
        let response: LoginResponse = self
            .api
            .post_public(
                endpoints::LOGIN,
                &serde_json::json!({
                    "email": email.trim(),
                    "password": password,
                }),
            )
            .await?;

        let token = response.token().ok_or_else(|| Error::Api {
            status: 200,
            message: "Login response did not include a token".to_string(),
        })?;
        self.api.tokens().save_token(&token)?;
        tracing::info!("Signed in as {}", email.trim());

        match response.user() {
            Some(user) => Ok(user),
            None => self.current_user().await,
        }
    }

    /// Resolve the user that owns the stored token.
    pub async fn current_user(&self) -> Result<User> {
        let payload: RecordPayload<User> = self
            .api
            .get(endpoints::CURRENT_USER, AuthRequirement::Required)
            .await?;
        Ok(payload.into_inner())
    }

    /// Look up any user by id (used to resolve listing owners).
    pub async fn user_by_id(&self, id: &str) -> Result<User> {
        let payload: RecordPayload<User> = self
            .api
            .get(
                &endpoints::with_id(endpoints::USER_BY_ID, id),
                AuthRequirement::Optional,
            )
            .await?;
        Ok(payload.into_inner())
    }

    /// Forget the stored token.
    pub fn sign_out(&self) -> Result<()> {
        self.api.tokens().clear_token()?;
        tracing::info!("Signed out");
        Ok(())
    }

    pub fn is_signed_in(&self) -> Result<bool> {
        self.api.has_token()
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(Error::InvalidInput("Email is required".to_string()));
    }
    if password.trim().is_empty() {
        return Err(Error::InvalidInput("Password is required".to_string()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: Option<String>,
    access_token: Option<String>,
    user: Option<User>,
    data: Option<LoginData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    token: Option<String>,
    access_token: Option<String>,
    user: Option<User>,
}

impl LoginResponse {
    fn token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| self.access_token.clone())
            .or_else(|| {
                self.data
                    .as_ref()
                    .and_then(|data| data.token.clone().or_else(|| data.access_token.clone()))
            })
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }

    fn user(self) -> Option<User> {
        self.user.or_else(|| self.data.and_then(|data| data.user))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::Method;

    use super::*;
    use crate::auth::{MemoryTokenStore, TokenStore};
    use crate::config::AuthScheme;
    use crate::test_support::ScriptedTransport;

    fn service(transport: &Arc<ScriptedTransport>, store: MemoryTokenStore) -> AuthService {
        AuthService::new(ApiClient::new(
            transport.clone(),
            Arc::new(store),
            AuthScheme::Raw,
        ))
    }

    #[tokio::test]
    async fn login_saves_nested_token() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::POST,
            endpoints::LOGIN,
            200,
            serde_json::json!({
                "data": { "accessToken": " tok-9 ", "user": { "_id": "u1", "name": "Kiran" } }
            }),
        );
        let store = MemoryTokenStore::new();
        let auth = service(&transport, store.clone());

        let user = auth.login("kiran@example.com", "pw").await.unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(store.load_token().unwrap().as_deref(), Some("tok-9"));
        assert_eq!(transport.requests()[0].authorization, None);
    }

    #[tokio::test]
    async fn login_falls_back_to_current_user() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::POST,
            endpoints::LOGIN,
            200,
            serde_json::json!({ "token": "tok-1" }),
        );
        transport.respond(
            Method::GET,
            endpoints::CURRENT_USER,
            200,
            serde_json::json!({ "user": { "_id": "u7" } }),
        );
        let auth = service(&transport, MemoryTokenStore::new());

        let user = auth.login("a@example.com", "pw").await.unwrap();
        assert_eq!(user.id, "u7");
        assert_eq!(
            transport.requests()[1].authorization.as_deref(),
            Some("tok-1")
        );
    }

    #[tokio::test]
    async fn login_without_token_is_an_error() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::POST,
            endpoints::LOGIN,
            200,
            serde_json::json!({ "message": "ok" }),
        );
        let store = MemoryTokenStore::new();
        let auth = service(&transport, store.clone());

        assert!(auth.login("a@example.com", "pw").await.is_err());
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[tokio::test]
    async fn login_rejects_blank_credentials() {
        let transport = ScriptedTransport::new();
        let auth = service(&transport, MemoryTokenStore::new());

        let error = auth.login("  ", "pw").await.unwrap_err();
        assert!(matches!(error, Error::InvalidInput(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn sign_out_clears_token() {
        let transport = ScriptedTransport::new();
        let store = MemoryTokenStore::with_token("tok").unwrap();
        let auth = service(&transport, store);

        assert!(auth.is_signed_in().unwrap());
        auth.sign_out().unwrap();
        assert!(!auth.is_signed_in().unwrap());
    }
}
