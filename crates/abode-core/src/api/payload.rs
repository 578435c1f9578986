//! Tolerant response envelopes.
//!
//! The backend answers with either a bare value or the value wrapped under a
//! kind-specific key; both shapes decode to the same thing.

use serde::Deserialize;

/// A list response: `[..]` or `{ "<key>": [..] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(
            alias = "properties",
            alias = "gyms",
            alias = "parkings",
            alias = "parking",
            alias = "blogs",
            alias = "posts",
            alias = "wishlist",
            alias = "propertyIds",
            alias = "items"
        )]
        data: Vec<T>,
    },
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { data: items } => items,
        }
    }
}

/// A single-record response: `{..record..}` or `{ "<key>": {..record..} }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecordPayload<T> {
    Bare(T),
    Wrapped {
        #[serde(
            alias = "property",
            alias = "gym",
            alias = "parking",
            alias = "blog",
            alias = "post",
            alias = "user"
        )]
        data: T,
    },
}

impl<T> RecordPayload<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Bare(record) | Self::Wrapped { data: record } => record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gym, User};

    #[test]
    fn list_payload_accepts_both_shapes() {
        let bare: ListPayload<Gym> =
            serde_json::from_value(serde_json::json!([{ "_id": "g1" }])).unwrap();
        assert_eq!(bare.into_vec().len(), 1);

        let wrapped: ListPayload<Gym> = serde_json::from_value(serde_json::json!({
            "gyms": [{ "_id": "g1" }, { "_id": "g2" }]
        }))
        .unwrap();
        assert_eq!(wrapped.into_vec().len(), 2);
    }

    #[test]
    fn record_payload_unwraps_kind_key() {
        let wrapped: RecordPayload<User> = serde_json::from_value(serde_json::json!({
            "user": { "_id": "u1", "name": "Meera" }
        }))
        .unwrap();
        assert_eq!(wrapped.into_inner().name, "Meera");

        let bare: RecordPayload<User> =
            serde_json::from_value(serde_json::json!({ "_id": "u2" })).unwrap();
        assert_eq!(bare.into_inner().id, "u2");
    }
}
