//! Types shared by every listing kind: ids, locations, pricing, owners.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;
use crate::models::User;

/// Server-assigned identifier of a listing (the backend's `_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for ListingId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("Listing id cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Common access to a listing's identity, used by the generic list cache.
pub trait Listing: Clone + Send + Sync + 'static {
    fn id(&self) -> &ListingId;

    /// Fill in client-derived fields of a record received from the backend.
    fn after_fetch(&mut self) {}
}

/// Listings that carry a structured location.
pub trait Located {
    fn location(&self) -> &Location;
}

/// Structured address of a listing. Missing fields arrive as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    #[serde(deserialize_with = "lenient_text")]
    pub city: String,
    #[serde(deserialize_with = "lenient_text")]
    pub state: String,
    #[serde(deserialize_with = "lenient_text")]
    pub locality: String,
    #[serde(deserialize_with = "lenient_text")]
    pub sub_locality: String,
    #[serde(deserialize_with = "lenient_text")]
    pub house_number: String,
    #[serde(deserialize_with = "lenient_text")]
    pub apartment: String,
}

/// Price fields. Which one is populated depends on the listing kind and
/// posting type; at most one is expected per record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_per_sqft: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub monthly_rent: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_per_night: Option<f64>,
}

/// The populated price of a listing, tagged with its meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceKind {
    Expected(f64),
    PerSqft(f64),
    MonthlyRent(f64),
    PerNight(f64),
}

impl Pricing {
    /// First populated price, in declaration order.
    #[must_use]
    pub fn primary(&self) -> Option<PriceKind> {
        self.expected_price
            .map(PriceKind::Expected)
            .or_else(|| self.price_per_sqft.map(PriceKind::PerSqft))
            .or_else(|| self.monthly_rent.map(PriceKind::MonthlyRent))
            .or_else(|| self.price_per_night.map(PriceKind::PerNight))
    }
}

impl fmt::Display for PriceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected(value) => write!(f, "{value}"),
            Self::PerSqft(value) => write!(f, "{value}/sqft"),
            Self::MonthlyRent(value) => write!(f, "{value}/month"),
            Self::PerNight(value) => write!(f, "{value}/night"),
        }
    }
}

/// Owner sub-record: the raw user id as sent by the backend, or the
/// resolved user once looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Owner {
    User(User),
    Id(String),
}

impl Owner {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::User(user) => &user.id,
            Self::Id(id) => id,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::User(user) if !user.name.trim().is_empty() => &user.name,
            Self::User(user) => &user.id,
            Self::Id(id) => id,
        }
    }
}

/// Accept any JSON value for a number field, keeping only real numbers.
///
/// Strings, nulls, and objects become `None` instead of failing the record.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(serde_json::Value::as_f64))
}

/// Strings that may arrive as `null` or as numbers (house numbers often do).
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => text,
        Some(serde_json::Value::Number(number)) => number.to_string(),
        _ => String::new(),
    })
}

/// Treat an explicit `null` like a missing key.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Like [`lenient_number`] for counts (rooms, bathrooms).
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .and_then(|count| u32::try_from(count).ok()))
}
