//! Gym listing model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::listing::{
    lenient_text, null_default, Listing, ListingId, Located, Location, Owner, Pricing,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gym {
    #[serde(rename = "_id")]
    pub id: ListingId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, alias = "type", deserialize_with = "lenient_text")]
    pub gym_type: String,
    #[serde(default, deserialize_with = "null_default")]
    pub location: Location,
    #[serde(default, deserialize_with = "null_default")]
    pub pricing: Pricing,
    #[serde(default, deserialize_with = "null_default")]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Owner>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listing for Gym {
    fn id(&self) -> &ListingId {
        &self.id
    }
}

impl Located for Gym {
    fn location(&self) -> &Location {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gym_accepts_type_alias() {
        let gym: Gym = serde_json::from_value(serde_json::json!({
            "_id": "g1",
            "name": "Iron Temple",
            "type": "Unisex",
            "pricing": { "monthlyRent": 2500 }
        }))
        .unwrap();
        assert_eq!(gym.gym_type, "Unisex");
        assert_eq!(gym.pricing.monthly_rent, Some(2500.0));
    }

    #[test]
    fn explicit_nulls_fall_back_to_defaults() {
        let gym: Gym = serde_json::from_value(serde_json::json!({
            "_id": "g2",
            "name": null,
            "location": null,
            "pricing": null,
            "amenities": null,
            "images": null,
            "user": null
        }))
        .unwrap();
        assert!(gym.name.is_empty());
        assert_eq!(gym.location, Location::default());
        assert_eq!(gym.pricing, Pricing::default());
        assert!(gym.amenities.is_empty());
        assert!(gym.images.is_empty());
        assert_eq!(gym.user, None);
    }
}
