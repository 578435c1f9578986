//! Favorites: a plain in-memory set, and the remote-synced property wishlist.

use std::collections::BTreeSet;

use parking_lot::RwLock;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::api::{endpoints, ApiClient, AuthRequirement, ListPayload};
use crate::auth::AuthService;
use crate::error::Result;
use crate::models::ListingId;
use crate::scope::Scope;

/// Set of favorited listing ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    ids: BTreeSet<ListingId>,
}

impl FavoritesSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &ListingId) -> bool {
        self.ids.contains(id)
    }

    pub fn insert(&mut self, id: ListingId) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: &ListingId) -> bool {
        self.ids.remove(id)
    }

    /// Flip membership of `id`; returns whether it is now a favorite.
    pub fn toggle(&mut self, id: &ListingId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListingId> {
        self.ids.iter()
    }
}

impl FromIterator<ListingId> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = ListingId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Favorites kept only in memory; nothing is sent to the backend and the set
/// is gone when the owning store is dropped.
#[derive(Debug, Default)]
pub struct LocalFavorites {
    set: RwLock<FavoritesSet>,
}

impl LocalFavorites {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&self, id: &ListingId) -> bool {
        self.set.write().toggle(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ListingId) -> bool {
        self.set.read().contains(id)
    }

    #[must_use]
    pub fn snapshot(&self) -> FavoritesSet {
        self.set.read().clone()
    }
}

/// Property wishlist mirrored from `/wishlist/*`.
///
/// Local membership changes only after the backend accepted the change.
/// Toggles are serialized, so each one sees the outcome of the previous.
pub struct WishlistFavorites {
    api: ApiClient,
    auth: AuthService,
    scope: Scope,
    set: RwLock<FavoritesSet>,
    toggle_lock: Mutex<()>,
}

impl WishlistFavorites {
    pub fn new(api: ApiClient, scope: Scope) -> Self {
        Self {
            auth: AuthService::new(api.clone()),
            api,
            scope,
            set: RwLock::new(FavoritesSet::new()),
            toggle_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn contains(&self, id: &ListingId) -> bool {
        self.set.read().contains(id)
    }

    #[must_use]
    pub fn snapshot(&self) -> FavoritesSet {
        self.set.read().clone()
    }

    /// Replace the local set with the backend wishlist.
    pub async fn load(&self) -> Result<FavoritesSet> {
        let _guard = self.toggle_lock.lock().await;
        let payload: ListPayload<WishlistEntry> = self
            .scope
            .run(self.api.get(endpoints::WISHLIST_GET, AuthRequirement::Required))
            .await
            .inspect_err(|error| tracing::error!("Failed to load wishlist: {}", error))?;

        let loaded = payload
            .into_vec()
            .into_iter()
            .filter_map(WishlistEntry::into_id)
            .collect::<FavoritesSet>();
        tracing::info!(count = loaded.len(), "Loaded wishlist");
        *self.set.write() = loaded.clone();
        Ok(loaded)
    }

    /// Add or remove `id` remotely, then mirror the change locally.
    ///
    /// Returns whether `id` is a favorite afterwards.
    pub async fn toggle(&self, id: &ListingId) -> Result<bool> {
        let _guard = self.toggle_lock.lock().await;

        if self.contains(id) {
            self.scope
                .run(
                    self.api
                        .delete(&endpoints::with_id(endpoints::WISHLIST_REMOVE, id.as_str())),
                )
                .await
                .inspect_err(|error| {
                    tracing::error!("Failed to remove {} from wishlist: {}", id, error);
                })?;
            self.set.write().remove(id);
            tracing::debug!("Removed {} from wishlist", id);
            Ok(false)
        } else {
            let user = self.scope.run(self.auth.current_user()).await?;
            let body = serde_json::json!({
                "userId": user.id,
                "propertyIds": [id.as_str()],
            });
            self.scope
                .run(
                    self.api
                        .post::<_, serde_json::Value>(endpoints::WISHLIST_ADD, &body),
                )
                .await
                .inspect_err(|error| {
                    tracing::error!("Failed to add {} to wishlist: {}", id, error);
                })?;
            self.set.write().insert(id.clone());
            tracing::debug!("Added {} to wishlist", id);
            Ok(true)
        }
    }
}

/// Wishlist entries arrive either as id strings or as listing records.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WishlistEntry {
    Id(String),
    Record {
        #[serde(rename = "_id", alias = "propertyId")]
        id: String,
    },
}

impl WishlistEntry {
    fn into_id(self) -> Option<ListingId> {
        let (Self::Id(raw) | Self::Record { id: raw }) = self;
        raw.parse().ok()
    }
}
