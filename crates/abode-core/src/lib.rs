//! abode-core - Client data layer for Abode
//!
//! Typed models, the authenticated API client, and the per-kind listing
//! stores (properties, gyms, parking, blogs) shared by every Abode front end.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod favorites;
pub mod filters;
pub mod models;
pub mod scope;
pub mod session;
pub mod stores;
pub mod util;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, AuthRequirement};
pub use auth::{AuthService, MemoryTokenStore, TokenStore};
pub use config::{AuthScheme, ClientConfig};
pub use error::{Error, Result};
pub use models::{BlogPost, Gym, ListingId, ParkingSpot, Property, User};
pub use scope::Scope;
pub use session::Session;
pub use stores::{BlogStore, GymStore, LoadMore, ParkingStore, PropertyStore};
