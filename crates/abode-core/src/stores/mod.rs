//! Listing stores: cached lists, selectors, mutations and favorites per kind.

mod blog;
mod cache;
mod collection;
mod gym;
mod parking;
mod property;

pub use blog::{BlogStore, LoadMore};
pub use cache::ListCache;
pub use collection::{CollectionEndpoints, RemoteCollection};
pub use gym::GymStore;
pub use parking::ParkingStore;
pub use property::PropertyStore;
