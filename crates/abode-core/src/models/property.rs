//! Property listing model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::listing::{
    lenient_count, lenient_text, null_default, Listing, ListingId, Located, Location, Owner,
    Pricing,
};

/// A property listing (sale, rent, or stay).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "_id")]
    pub id: ListingId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub posting_type: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub property_type: String,
    #[serde(default, deserialize_with = "null_default")]
    pub location: Location,
    #[serde(default, deserialize_with = "null_default")]
    pub pricing: Pricing,
    #[serde(default, deserialize_with = "null_default")]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub furnishing: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub bedrooms: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub bathrooms: Option<u32>,
    #[serde(default, deserialize_with = "null_default")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Owner>,
    /// Derived from `location` after each fetch; never authored by the server.
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    /// Kind-specific attributes this client does not model explicitly.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Property {
    /// Recompute `title` from the location fields.
    pub fn derive_title(&mut self) {
        self.title = create_property_title(&self.location);
    }
}

impl Listing for Property {
    fn id(&self) -> &ListingId {
        &self.id
    }

    fn after_fetch(&mut self) {
        self.derive_title();
    }
}

impl Located for Property {
    fn location(&self) -> &Location {
        &self.location
    }
}

/// Build the display title of a property from its location.
///
/// Every segment is trimmed. House number, apartment, and sub-locality are
/// included only when non-blank; locality, city, and state always are, and
/// the title ends with a period.
///
/// # Examples
///
/// ```
/// use abode_core::models::{create_property_title, Location};
///
/// let location = Location {
///     locality: "Indiranagar".to_string(),
///     city: "Bangalore".to_string(),
///     state: "Karnataka".to_string(),
///     ..Location::default()
/// };
/// assert_eq!(create_property_title(&location), "Indiranagar, Bangalore, Karnataka.");
/// ```
#[must_use]
pub fn create_property_title(location: &Location) -> String {
    let mut title = String::new();
    for optional in [
        &location.house_number,
        &location.apartment,
        &location.sub_locality,
    ] {
        let segment = optional.trim();
        if !segment.is_empty() {
            title.push_str(segment);
            title.push_str(", ");
        }
    }
    title.push_str(location.locality.trim());
    title.push_str(", ");
    title.push_str(location.city.trim());
    title.push_str(", ");
    title.push_str(location.state.trim());
    title.push('.');
    title
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn location(house: &str, apartment: &str, sub_locality: &str) -> Location {
        Location {
            city: "Bangalore".to_string(),
            state: "Karnataka".to_string(),
            locality: "Indiranagar".to_string(),
            sub_locality: sub_locality.to_string(),
            house_number: house.to_string(),
            apartment: apartment.to_string(),
        }
    }

    #[test]
    fn title_with_all_fields() {
        assert_eq!(
            create_property_title(&location("12", "Orchid Apts", "Block 9")),
            "12, Orchid Apts, Block 9, Indiranagar, Bangalore, Karnataka."
        );
    }

    #[test]
    fn title_without_optional_fields() {
        assert_eq!(
            create_property_title(&location("", "", "")),
            "Indiranagar, Bangalore, Karnataka."
        );
    }

    #[test]
    fn title_trims_required_segments() {
        let mut padded = location(" 12 ", "", "");
        padded.locality = " Indiranagar".to_string();
        padded.state = "Karnataka  ".to_string();
        assert_eq!(
            create_property_title(&padded),
            "12, Indiranagar, Bangalore, Karnataka."
        );
    }

    #[test]
    fn title_omits_every_empty_optional_combination() {
        let values = [("12", "12, "), ("", "")];
        let apartments = [("Orchid Apts", "Orchid Apts, "), ("  ", "")];
        let subs = [("Block 9", "Block 9, "), ("", "")];

        for (house, house_part) in values {
            for (apartment, apartment_part) in apartments {
                for (sub, sub_part) in subs {
                    let expected = format!(
                        "{house_part}{apartment_part}{sub_part}Indiranagar, Bangalore, Karnataka."
                    );
                    assert_eq!(
                        create_property_title(&location(house, apartment, sub)),
                        expected
                    );
                }
            }
        }
    }

    #[test]
    fn deserializes_backend_record_and_keeps_extras() {
        let mut property: Property = serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "category": "Residential",
            "postingType": "Sell",
            "location": {
                "houseNumber": "12",
                "locality": "Indiranagar",
                "city": "Bangalore",
                "state": "Karnataka"
            },
            "pricing": { "expectedPrice": 4500000 },
            "bedrooms": "3",
            "user": "owner-1",
            "facing": "East"
        }))
        .unwrap();

        property.derive_title();
        assert_eq!(property.title, "12, Indiranagar, Bangalore, Karnataka.");
        assert_eq!(property.pricing.expected_price, Some(4_500_000.0));
        assert_eq!(property.bedrooms, None);
        assert_eq!(property.user, Some(Owner::Id("owner-1".to_string())));
        assert_eq!(property.extra.get("facing"), Some(&Value::from("East")));
    }
}
