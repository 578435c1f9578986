//! CLI token persistence in the OS keychain, one entry per profile.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use abode_core::auth::{normalize_token, TokenStore};
use abode_core::{Error, Result};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "abode-cli";

/// Token store keyed by CLI profile.
#[derive(Clone)]
pub struct KeyringTokenStore {
    username: String,
}

impl std::fmt::Debug for KeyringTokenStore {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("KeyringTokenStore")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl KeyringTokenStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            username: format!("api_token:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| Error::TokenStorage(error.to_string()))
    }
}

impl TokenStore for KeyringTokenStore {
    #[cfg(not(test))]
    fn load_token(&self) -> Result<Option<String>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(normalize_token(&raw).ok()),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::TokenStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_token(&self) -> Result<Option<String>> {
        let store = Self::test_store();
        let guard = store
            .lock()
            .map_err(|error| Error::TokenStorage(error.to_string()))?;
        Ok(guard.get(&self.username).cloned())
    }

    #[cfg(not(test))]
    fn save_token(&self, token: &str) -> Result<()> {
        let token = normalize_token(token)?;
        self.entry()?
            .set_password(&token)
            .map_err(|error| Error::TokenStorage(error.to_string()))?;
        Ok(())
    }

    #[cfg(test)]
    fn save_token(&self, token: &str) -> Result<()> {
        let token = normalize_token(token)?;
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| Error::TokenStorage(error.to_string()))?;
        guard.insert(self.username.clone(), token);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_token(&self) -> Result<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::TokenStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_token(&self) -> Result<()> {
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| Error::TokenStorage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}
