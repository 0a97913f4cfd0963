// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Every variant renders as the same HTTP 401 response with the literal
//! body `Unauthorized.` so that a caller cannot tell which validation step
//! rejected the token. The variant is only visible in logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Authentication error type.
///
/// One variant per step of the token verification flow, plus the gate's
/// missing-token case.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No token was supplied with the request
    MissingToken,
    /// Token could not be parsed as a compact JWT
    MalformedToken,
    /// Token header names an algorithm other than RS256
    UnsupportedAlgorithm,
    /// Issuer, audience, or expiry claims did not validate
    ClaimValidationFailed,
    /// Token header carries no key ID
    MissingKeyHint,
    /// No key in the fetched JWKS matched the token's key ID
    KeyNotFound,
    /// Token signature did not verify against the matched key
    InvalidSignature,
}

impl AuthError {
    /// Get the error code for this error, used in log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedToken => "malformed_token",
            AuthError::UnsupportedAlgorithm => "unsupported_algorithm",
            AuthError::ClaimValidationFailed => "claim_validation_failed",
            AuthError::MissingKeyHint => "missing_key_hint",
            AuthError::KeyNotFound => "key_not_found",
            AuthError::InvalidSignature => "invalid_signature",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "No token was supplied"),
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::UnsupportedAlgorithm => {
                write!(f, "Token algorithm is not RS256")
            }
            AuthError::ClaimValidationFailed => {
                write!(f, "Token issuer, audience, or expiry is invalid")
            }
            AuthError::MissingKeyHint => write!(f, "Token header carries no key ID"),
            AuthError::KeyNotFound => write!(f, "No matching key found in JWKS"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Deliberately uniform: the failure cause must not leak to the caller.
        (StatusCode::UNAUTHORIZED, "Unauthorized.").into_response()
    }
}
