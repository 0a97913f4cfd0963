// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON:API response envelope for the user directory.

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Auth0 prefixes database-connection user IDs with this marker; resource
/// IDs exposed by the gateway have it stripped.
pub const USER_ID_PREFIX: &str = "auth0|";

/// The `jsonapi` member of the envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct JsonApiObject {
    /// JSON:API version implemented by this endpoint.
    pub version: String,
}

impl Default for JsonApiObject {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
        }
    }
}

/// A single user resource.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResource {
    /// Provider user ID with the `auth0|` prefix stripped.
    pub id: String,
    /// Always `"user"`.
    #[serde(rename = "type")]
    #[schema(example = "user")]
    pub resource_type: String,
    /// The full provider record, passed through untouched.
    #[schema(value_type = Object)]
    pub attributes: Map<String, Value>,
}

impl UserResource {
    /// Build a resource from a raw Management API user record.
    pub fn from_record(record: Map<String, Value>) -> Self {
        let id = record
            .get("user_id")
            .and_then(Value::as_str)
            .map(|user_id| user_id.strip_prefix(USER_ID_PREFIX).unwrap_or(user_id))
            .unwrap_or_default()
            .to_string();

        Self {
            id,
            resource_type: "user".to_string(),
            attributes: record,
        }
    }
}

/// Response body for `GET /users`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    /// JSON:API envelope marker.
    pub jsonapi: JsonApiObject,
    /// One resource per user record.
    pub data: Vec<UserResource>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(user_id: &str) -> Map<String, Value> {
        let Value::Object(record) = json!({
            "user_id": user_id,
            "nickname": "ada",
            "email": "ada@acme.com"
        }) else {
            unreachable!()
        };
        record
    }

    #[test]
    fn resource_id_strips_the_provider_prefix() {
        let resource = UserResource::from_record(record("auth0|5f7c8ec7c33c6c004bbafe82"));
        assert_eq!(resource.id, "5f7c8ec7c33c6c004bbafe82");
    }

    #[test]
    fn unprefixed_ids_pass_through() {
        let resource = UserResource::from_record(record("google-oauth2|1234"));
        assert_eq!(resource.id, "google-oauth2|1234");
    }

    #[test]
    fn attributes_keep_the_full_record() {
        let resource = UserResource::from_record(record("auth0|abc"));
        assert_eq!(
            resource.attributes.get("user_id"),
            Some(&json!("auth0|abc"))
        );
        assert_eq!(resource.attributes.get("nickname"), Some(&json!("ada")));
    }

    #[test]
    fn envelope_serializes_to_jsonapi_shape() {
        let response = UserListResponse {
            jsonapi: JsonApiObject::default(),
            data: vec![UserResource::from_record(record("auth0|abc"))],
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["jsonapi"]["version"], "1.0");
        assert_eq!(value["data"][0]["id"], "abc");
        assert_eq!(value["data"][0]["type"], "user");
        assert_eq!(value["data"][0]["attributes"]["email"], "ada@acme.com");
    }
}
