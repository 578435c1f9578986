//! Gym listings with in-memory favorites.

use serde::Serialize;

use crate::api::ApiClient;
use crate::error::Result;
use crate::favorites::{FavoritesSet, LocalFavorites};
use crate::filters;
use crate::models::{Gym, ListingId};
use crate::scope::Scope;
use crate::stores::collection::{CollectionEndpoints, RemoteCollection};

pub struct GymStore {
    gyms: RemoteCollection<Gym>,
    favorites: LocalFavorites,
}

impl GymStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            gyms: RemoteCollection::new(api, Scope::new(), CollectionEndpoints::GYMS, "gyms"),
            favorites: LocalFavorites::new(),
        }
    }

    pub async fn ensure_loaded(&self) -> Result<()> {
        self.gyms.ensure_loaded_with(std::future::ready).await
    }

    pub async fn refresh(&self) -> Result<()> {
        self.gyms.refresh_with(std::future::ready).await
    }

    #[must_use]
    pub fn gyms(&self) -> Option<Vec<Gym>> {
        self.gyms.cache().snapshot()
    }

    #[must_use]
    pub fn gym(&self, id: &ListingId) -> Option<Gym> {
        self.gyms.cache().find(id)
    }

    #[must_use]
    pub fn by_city(&self, city: &str) -> Option<Vec<Gym>> {
        self.gyms.cache().select(|items| filters::by_city(items, city))
    }

    pub async fn add<B: Serialize + ?Sized>(&self, body: &B) -> Result<Gym> {
        self.gyms.create(body).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &ListingId, body: &B) -> Result<Gym> {
        self.gyms.update(id, body).await
    }

    pub async fn delete(&self, id: &ListingId) -> Result<()> {
        self.gyms.delete(id).await
    }

    /// Flip a local favorite; nothing is sent to the backend.
    pub fn toggle_favorite(&self, id: &ListingId) -> bool {
        self.favorites.toggle(id)
    }

    #[must_use]
    pub fn is_favorite(&self, id: &ListingId) -> bool {
        self.favorites.contains(id)
    }

    #[must_use]
    pub fn favorites(&self) -> FavoritesSet {
        self.favorites.snapshot()
    }

    pub fn close(&self) {
        self.gyms.scope().cancel();
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use super::*;
    use crate::api::endpoints;
    use crate::test_support::{api_client, ScriptedTransport};

    #[tokio::test]
    async fn filters_by_city_after_load() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::GET,
            endpoints::GYMS,
            200,
            serde_json::json!([
                { "_id": "g1", "name": "Iron", "location": { "city": "Pune" } },
                { "_id": "g2", "name": "Steel", "location": { "city": "Delhi" } }
            ]),
        );
        let store = GymStore::new(api_client(&transport, None));
        assert!(store.by_city("pune").is_none());

        store.ensure_loaded().await.unwrap();

        let found = store.by_city("pune").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Iron");
    }

    #[tokio::test]
    async fn favorites_stay_local() {
        let transport = ScriptedTransport::new();
        let store = GymStore::new(api_client(&transport, Some("tok")));
        let id: ListingId = "g1".parse().unwrap();

        assert!(store.toggle_favorite(&id));
        assert!(store.is_favorite(&id));
        assert!(!store.toggle_favorite(&id));
        assert!(store.favorites().is_empty());
        assert!(transport.requests().is_empty());
    }
}
