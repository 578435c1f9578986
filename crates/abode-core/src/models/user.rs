//! User model (read-only, owned by the auth backend)

use serde::{Deserialize, Serialize};

use crate::models::listing::lenient_text;

/// An account as returned by `/auth/get-user` and `/auth/get-user-by-id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        alias = "phoneNumber",
        alias = "mobile",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_accepts_alternate_field_names() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "name": "Ravi",
            "phoneNumber": "+91 98450 00000",
            "role": "Owner"
        }))
        .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.phone.as_deref(), Some("+91 98450 00000"));
        assert_eq!(user.role.as_deref(), Some("Owner"));
    }
}
