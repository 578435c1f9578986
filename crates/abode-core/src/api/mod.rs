//! HTTP access to the listings backend.

mod client;
mod payload;
mod transport;

pub use client::{ApiClient, AuthRequirement, SignOutHook};
pub use payload::{ListPayload, RecordPayload};
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};

/// Backend routes, relative to the API base URL.
pub mod endpoints {
    pub const CURRENT_USER: &str = "/auth/get-user";
    pub const USER_BY_ID: &str = "/auth/get-user-by-id";
    pub const LOGIN: &str = "/auth/login";

    pub const PROPERTIES_AVAILABLE: &str = "/properties/availableProperty";
    pub const PROPERTIES_MINE: &str = "/properties/alluser-properties";
    pub const PROPERTY_CREATE: &str = "/properties/add-property";
    pub const PROPERTY_UPDATE: &str = "/properties/update-property";
    pub const PROPERTY_DELETE: &str = "/properties/delete-property";

    pub const WISHLIST_GET: &str = "/wishlist/get";
    pub const WISHLIST_ADD: &str = "/wishlist/add";
    pub const WISHLIST_REMOVE: &str = "/wishlist/remove";

    pub const GYMS: &str = "/gym/get-gyms";
    pub const GYM_CREATE: &str = "/gym/add-gym";
    pub const GYM_UPDATE: &str = "/gym/update-gym";
    pub const GYM_DELETE: &str = "/gym/delete-gym";

    pub const PARKINGS: &str = "/Parking/get-parkings";
    pub const PARKING_CREATE: &str = "/Parking/add-parking";
    pub const PARKING_UPDATE: &str = "/Parking/update-parking";
    pub const PARKING_DELETE: &str = "/Parking/delete-parking";

    pub const BLOGS: &str = "/blogs/get";
    pub const BLOG_CREATE: &str = "/blogs/create";
    pub const BLOG_UPDATE: &str = "/blogs/update";
    pub const BLOG_DELETE: &str = "/blogs/delete";

    /// `{route}/{segment}` with the segment percent-encoded.
    #[must_use]
    pub fn with_id(route: &str, id: &str) -> String {
        format!("{route}/{}", urlencoding::encode(id))
    }
}
