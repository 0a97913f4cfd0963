// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! This module gates the user directory API behind Auth0 JWT verification.
//!
//! ## Auth Flow
//!
//! 1. The caller obtains a JWT from Auth0 and sends it with each request
//!    (`?token=<JWT>`, or `Authorization: Bearer <JWT>`)
//! 2. The gateway:
//!    - Parses the token and requires RS256
//!    - Validates issuer, audience, and expiry
//!    - Fetches the tenant JWKS and matches the signing key by `kid`
//!    - Verifies the signature
//! 3. On success, the verified claims travel with the request; on any
//!    failure the response is 401 with the body `Unauthorized.`
//!
//! ## Security
//!
//! - JWKS fetching is HTTPS-only, cached with a TTL
//! - Clock skew tolerance is 60 seconds
//! - Failure causes are never distinguished in responses, only in logs

pub mod claims;
pub mod error;
pub mod jwks;
pub mod middleware;
pub mod verifier;

pub use claims::{Claims, VerifiedToken};
pub use error::AuthError;
pub use jwks::JwksManager;
pub use verifier::TokenVerifier;
