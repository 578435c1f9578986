//! Parking spots with in-memory favorites.

use serde::Serialize;

use crate::api::ApiClient;
use crate::error::Result;
use crate::favorites::{FavoritesSet, LocalFavorites};
use crate::filters;
use crate::models::{ListingId, ParkingSpot};
use crate::scope::Scope;
use crate::stores::collection::{CollectionEndpoints, RemoteCollection};

pub struct ParkingStore {
    spots: RemoteCollection<ParkingSpot>,
    favorites: LocalFavorites,
}

impl ParkingStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            spots: RemoteCollection::new(
                api,
                Scope::new(),
                CollectionEndpoints::PARKINGS,
                "parking spots",
            ),
            favorites: LocalFavorites::new(),
        }
    }

    pub async fn ensure_loaded(&self) -> Result<()> {
        self.spots.ensure_loaded_with(std::future::ready).await
    }

    pub async fn refresh(&self) -> Result<()> {
        self.spots.refresh_with(std::future::ready).await
    }

    #[must_use]
    pub fn spots(&self) -> Option<Vec<ParkingSpot>> {
        self.spots.cache().snapshot()
    }

    #[must_use]
    pub fn spot(&self, id: &ListingId) -> Option<ParkingSpot> {
        self.spots.cache().find(id)
    }

    #[must_use]
    pub fn by_city(&self, city: &str) -> Option<Vec<ParkingSpot>> {
        self.spots.cache().select(|items| filters::by_city(items, city))
    }

    #[must_use]
    pub fn by_vehicle_type(&self, vehicle_type: &str) -> Option<Vec<ParkingSpot>> {
        self.spots
            .cache()
            .select(|items| filters::by_vehicle_type(items, vehicle_type))
    }

    pub async fn add<B: Serialize + ?Sized>(&self, body: &B) -> Result<ParkingSpot> {
        self.spots.create(body).await
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        id: &ListingId,
        body: &B,
    ) -> Result<ParkingSpot> {
        self.spots.update(id, body).await
    }

    pub async fn delete(&self, id: &ListingId) -> Result<()> {
        self.spots.delete(id).await
    }

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
        self.spots.scope().cancel();
    }
}
