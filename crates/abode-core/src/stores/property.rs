//! Property listings: the public feed, the caller's own listings, and the
//! remote wishlist.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::MutexGuard;

use crate::api::ApiClient;
use crate::auth::AuthService;
use crate::error::Result;
use crate::favorites::{FavoritesSet, WishlistFavorites};
use crate::filters;
use crate::models::{ListingId, Owner, Property, User};
use crate::scope::Scope;
use crate::stores::collection::{CollectionEndpoints, RemoteCollection};

pub struct PropertyStore {
    available: RemoteCollection<Property>,
    mine: RemoteCollection<Property>,
    wishlist: WishlistFavorites,
    auth: AuthService,
    scope: Scope,
}

impl PropertyStore {
    pub fn new(api: ApiClient) -> Self {
        let scope = Scope::new();
        Self {
            available: RemoteCollection::new(
                api.clone(),
                scope.clone(),
                CollectionEndpoints::PROPERTIES_AVAILABLE,
                "properties",
            ),
            mine: RemoteCollection::new(
                api.clone(),
                scope.clone(),
                CollectionEndpoints::PROPERTIES_MINE,
                "user properties",
            ),
            wishlist: WishlistFavorites::new(api.clone(), scope.clone()),
            auth: AuthService::new(api),
            scope,
        }
    }

    /// Load the public feed unless it already holds listings.
    pub async fn ensure_loaded(&self) -> Result<()> {
        self.available
            .ensure_loaded_with(|items| resolve_owners(&self.auth, items))
            .await
    }

    pub async fn refresh(&self) -> Result<()> {
        self.available
            .refresh_with(|items| resolve_owners(&self.auth, items))
            .await
    }

    /// Load the signed-in user's own listings unless already loaded.
    pub async fn ensure_user_properties_loaded(&self) -> Result<()> {
        self.mine
            .ensure_loaded_with(|items| resolve_owners(&self.auth, items))
            .await
    }

    pub async fn refresh_user_properties(&self) -> Result<()> {
        self.mine
            .refresh_with(|items| resolve_owners(&self.auth, items))
            .await
    }

    /// Public feed; `None` until fetched.
    #[must_use]
    pub fn properties(&self) -> Option<Vec<Property>> {
        self.available.cache().snapshot()
    }

    /// The caller's own listings; `None` until fetched.
    #[must_use]
    pub fn user_properties(&self) -> Option<Vec<Property>> {
        self.mine.cache().snapshot()
    }

    /// Look a listing up in the public feed, then in the caller's listings.
    #[must_use]
    pub fn property(&self, id: &ListingId) -> Option<Property> {
        self.available
            .cache()
            .find(id)
            .or_else(|| self.mine.cache().find(id))
    }

    #[must_use]
    pub fn by_category(&self, category: &str) -> Option<Vec<Property>> {
        self.available
            .cache()
            .select(|items| filters::by_category(items, category))
    }

    #[must_use]
    pub fn by_city(&self, city: &str) -> Option<Vec<Property>> {
        self.available
            .cache()
            .select(|items| filters::by_city(items, city))
    }

    #[must_use]
    pub fn by_price_range(&self, min: f64, max: f64) -> Option<Vec<Property>> {
        self.available
            .cache()
            .select(|items| filters::by_price_range(items, min, max))
    }

    #[must_use]
    pub fn by_posting_type(&self, posting_type: &str) -> Option<Vec<Property>> {
        self.available
            .cache()
            .select(|items| filters::by_posting_type(items, posting_type))
    }

    /// Create a listing; the server's copy lands first in each loaded list.
    pub async fn add<B: Serialize + ?Sized>(&self, body: &B) -> Result<Property> {
        let (_available, _mine) = self.lock_loads().await;
        let created = self.available.create_remote(body).await?;
        self.available.cache().prepend(created.clone());
        self.mine.cache().prepend(created.clone());
        Ok(created)
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        id: &ListingId,
        body: &B,
    ) -> Result<Property> {
        let _loads = self.lock_loads().await;
        let updated = self.available.update_remote(id, body).await?;
        self.available.cache().replace(updated.clone());
        self.mine.cache().replace(updated.clone());
        Ok(updated)
    }

    pub async fn delete(&self, id: &ListingId) -> Result<()> {
        let _loads = self.lock_loads().await;
        self.available.delete_remote(id).await?;
        self.available.cache().remove(id);
        self.mine.cache().remove(id);
        Ok(())
    }

    /// Both lists' load locks, always taken feed first.
    async fn lock_loads(&self) -> (MutexGuard<'_, ()>, MutexGuard<'_, ()>) {
        let available = self.available.lock_loads().await;
        let mine = self.mine.lock_loads().await;
        (available, mine)
    }

    /// Replace the local wishlist with the backend's.
    pub async fn load_wishlist(&self) -> Result<FavoritesSet> {
        self.wishlist.load().await
    }

    /// Add or remove `id` from the wishlist; returns whether it is now a favorite.
    pub async fn toggle_favorite(&self, id: &ListingId) -> Result<bool> {
        self.wishlist.toggle(id).await
    }

    #[must_use]
    pub fn is_favorite(&self, id: &ListingId) -> bool {
        self.wishlist.contains(id)
    }

    #[must_use]
    pub fn favorites(&self) -> FavoritesSet {
        self.wishlist.snapshot()
    }

    /// Cancel in-flight calls; their responses are discarded.
    pub fn close(&self) {
        self.scope.cancel();
    }
}

/// Replace raw owner ids with user records where the lookup succeeds.
///
/// Each distinct owner is looked up once per call. A failed lookup keeps the
/// raw id.
async fn resolve_owners(auth: &AuthService, mut properties: Vec<Property>) -> Vec<Property> {
    let mut resolved: HashMap<String, Option<User>> = HashMap::new();

    for property in &mut properties {
        let Some(Owner::Id(owner_id)) = &property.user else {
            continue;
        };
        let owner_id = owner_id.clone();

        if !resolved.contains_key(&owner_id) {
            let user = match auth.user_by_id(&owner_id).await {
                Ok(user) => Some(user),
                Err(error) => {
                    tracing::warn!("Failed to resolve owner {}: {}", owner_id, error);
                    None
                }
            };
            resolved.insert(owner_id.clone(), user);
        }

        if let Some(Some(user)) = resolved.get(&owner_id) {
            property.user = Some(Owner::User(user.clone()));
        }
    }

    properties
}
