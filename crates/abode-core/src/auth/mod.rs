//! Token persistence and the auth endpoints of the listings backend.

mod service;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};

pub use service::AuthService;

/// Storage for the single credential the client persists.
///
/// Every request reads the token through this trait, so a sign-out anywhere
/// is observed by the next request everywhere.
pub trait TokenStore: Send + Sync + 'static {
    fn load_token(&self) -> Result<Option<String>>;
    fn save_token(&self, token: &str) -> Result<()>;
    fn clear_token(&self) -> Result<()>;
}

/// Process-local token store, used by tests and short-lived tools.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`.
    pub fn with_token(token: &str) -> Result<Self> {
        let store = Self::new();
        store.save_token(token)?;
        Ok(store)
    }
}

impl fmt::Debug for MemoryTokenStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = self.token.lock().is_some();
        formatter
            .debug_struct("MemoryTokenStore")
            .field("token", if present { &"[REDACTED]" } else { &"None" })
            .finish()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load_token(&self) -> Result<Option<String>> {
        Ok(self.token.lock().clone())
    }

    fn save_token(&self, token: &str) -> Result<()> {
        let token = normalize_token(token)?;
        *self.token.lock() = Some(token);
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        self.token.lock().take();
        Ok(())
    }
}

/// Trim a token and reject empty values.
pub fn normalize_token(raw: &str) -> Result<String> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(Error::InvalidInput("Token must not be empty".to_string()));
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load_token().unwrap(), None);

        store.save_token("  abc123 ").unwrap();
        assert_eq!(store.load_token().unwrap().as_deref(), Some("abc123"));

        store.clear_token().unwrap();
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[test]
    fn memory_store_rejects_empty_token() {
        let store = MemoryTokenStore::new();
        assert!(store.save_token("   ").is_err());
    }

    #[test]
    fn memory_store_debug_redacts_token() {
        let store = MemoryTokenStore::with_token("secret-token").unwrap();
        let rendered = format!("{store:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn clones_share_the_same_token() {
        let store = MemoryTokenStore::new();
        let clone = store.clone();
        store.save_token("shared").unwrap();
        assert_eq!(clone.load_token().unwrap().as_deref(), Some("shared"));
    }
}
