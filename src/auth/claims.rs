// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the verified-token context attached to requests.

use serde::Deserialize;

/// Claims extracted from an Auth0-issued JWT.
///
/// Only the registered claims the gateway validates are modeled; anything
/// else the token carries is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Subject (user or client ID)
    #[serde(default)]
    pub sub: String,

    /// Issuer (the tenant URL, with trailing slash)
    #[serde(default)]
    pub iss: String,

    /// Audience; Auth0 emits either a single string or an array
    #[serde(default)]
    pub aud: Option<serde_json::Value>,

    /// Expiration timestamp
    #[serde(default)]
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    /// Check whether the `aud` claim covers the expected audience.
    pub fn matches_audience(&self, expected: &str) -> bool {
        match &self.aud {
            Some(serde_json::Value::String(aud)) => aud == expected,
            Some(serde_json::Value::Array(auds)) => auds
                .iter()
                .any(|aud| aud.as_str() == Some(expected)),
            _ => false,
        }
    }
}

/// Verified token context.
///
/// Inserted into request extensions by the authentication gate once the
/// token has passed the full verification flow.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    /// The validated claims.
    pub claims: Claims,
}

impl VerifiedToken {
    /// The token's subject.
    pub fn subject(&self) -> &str {
        &self.claims.sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_claims(aud: serde_json::Value) -> Claims {
        Claims {
            sub: "auth0|user_123".to_string(),
            iss: "https://acme.eu.auth0.com/".to_string(),
            aud: Some(aud),
            exp: 1700003600,
            iat: 1700000000,
        }
    }

    #[test]
    fn string_audience_matches_exactly() {
        let claims = sample_claims(json!("https://api.acme.com"));
        assert!(claims.matches_audience("https://api.acme.com"));
        assert!(!claims.matches_audience("https://api.other.com"));
    }

    #[test]
    fn array_audience_matches_any_element() {
        let claims = sample_claims(json!(["https://api.acme.com", "https://acme.eu.auth0.com/userinfo"]));
        assert!(claims.matches_audience("https://api.acme.com"));
        assert!(claims.matches_audience("https://acme.eu.auth0.com/userinfo"));
        assert!(!claims.matches_audience("https://api.other.com"));
    }

    #[test]
    fn missing_audience_never_matches() {
        let mut claims = sample_claims(json!("ignored"));
        claims.aud = None;
        assert!(!claims.matches_audience("https://api.acme.com"));
    }

    #[test]
    fn verified_token_exposes_subject() {
        let token = VerifiedToken {
            claims: sample_claims(json!("https://api.acme.com")),
        };
        assert_eq!(token.subject(), "auth0|user_123");
    }
}
