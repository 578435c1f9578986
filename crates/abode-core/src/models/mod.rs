//! Data models for Abode listings

mod blog;
mod gym;
mod listing;
mod parking;
mod property;
mod user;

pub use blog::{BlogPage, BlogPost};
pub use gym::Gym;
pub use listing::{Listing, ListingId, Located, Location, Owner, PriceKind, Pricing};
pub use parking::ParkingSpot;
pub use property::{create_property_title, Property};
pub use user::User;
