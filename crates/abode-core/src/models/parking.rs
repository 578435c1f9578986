//! Parking spot listing model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::listing::{
    lenient_text, null_default, Listing, ListingId, Located, Location, Owner, Pricing,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpot {
    #[serde(rename = "_id")]
    pub id: ListingId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub parking_type: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub vehicle_type: String,
    #[serde(default, deserialize_with = "null_default")]
    pub location: Location,
    #[serde(default, deserialize_with = "null_default")]
    pub pricing: Pricing,
    #[serde(default, deserialize_with = "null_default")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Owner>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listing for ParkingSpot {
    fn id(&self) -> &ListingId {
        &self.id
    }
}

impl Located for ParkingSpot {
    fn location(&self) -> &Location {
        &self.location
    }
}
