//! Listing filter helpers over in-memory slices.
//!
//! Stores wrap these in selectors that return `None` while the underlying
//! list has not been fetched yet.

use crate::models::{BlogPost, Located, ParkingSpot, Property};
use crate::util::eq_ignore_case_trimmed;

/// Properties whose category equals `category` exactly.
#[must_use]
pub fn by_category(properties: &[Property], category: &str) -> Vec<Property> {
    properties
        .iter()
        .filter(|property| property.category == category)
        .cloned()
        .collect()
}

/// Properties whose posting type (sell, rent, ...) equals `posting_type` exactly.
#[must_use]
pub fn by_posting_type(properties: &[Property], posting_type: &str) -> Vec<Property> {
    properties
        .iter()
        .filter(|property| property.posting_type == posting_type)
        .cloned()
        .collect()
}

/// Properties with a numeric expected price inside `[min, max]`.
///
/// Listings priced any other way (rent, per night, missing) never match.
#[must_use]
pub fn by_price_range(properties: &[Property], min: f64, max: f64) -> Vec<Property> {
    properties
        .iter()
        .filter(|property| {
            property
                .pricing
                .expected_price
                .is_some_and(|price| price >= min && price <= max)
        })
        .cloned()
        .collect()
}

/// Listings located in `city`, compared case-insensitively.
#[must_use]
pub fn by_city<T: Located + Clone>(listings: &[T], city: &str) -> Vec<T> {
    listings
        .iter()
        .filter(|listing| eq_ignore_case_trimmed(&listing.location().city, city))
        .cloned()
        .collect()
}

/// Parking spots accepting `vehicle_type`, compared case-insensitively.
#[must_use]
pub fn by_vehicle_type(spots: &[ParkingSpot], vehicle_type: &str) -> Vec<ParkingSpot> {
    spots
        .iter()
        .filter(|spot| eq_ignore_case_trimmed(&spot.vehicle_type, vehicle_type))
        .cloned()
        .collect()
}

/// Blog posts whose category equals `category` exactly.
#[must_use]
pub fn posts_by_category(posts: &[BlogPost], category: &str) -> Vec<BlogPost> {
    posts
        .iter()
        .filter(|post| post.category == category)
        .cloned()
        .collect()
}
