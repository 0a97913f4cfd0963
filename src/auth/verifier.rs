// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT verification.
//!
//! The flow is deliberately linear, with one failure kind per step:
//!
//! 1. Parse the token structure → [`AuthError::MalformedToken`]
//! 2. Require RS256 → [`AuthError::UnsupportedAlgorithm`]
//! 3. Validate issuer/audience/expiry claims → [`AuthError::ClaimValidationFailed`]
//! 4. Require a `kid` header → [`AuthError::MissingKeyHint`]
//! 5. Resolve the key from the tenant JWKS → [`AuthError::KeyNotFound`]
//! 6. Verify the RS256 signature → [`AuthError::InvalidSignature`]
//!
//! There are no retries; any failure denies the request at the gate.

use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use super::claims::{Claims, VerifiedToken};
use super::error::AuthError;
use super::jwks::JwksManager;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Token verifier.
///
/// Holds the JWKS manager and the issuer/audience the tenant is expected
/// to stamp into every token.
#[derive(Clone)]
pub struct TokenVerifier {
    jwks: JwksManager,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    /// Create a new verifier.
    pub fn new(jwks: JwksManager, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            jwks,
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// The JWKS manager backing this verifier.
    pub fn jwks(&self) -> &JwksManager {
        &self.jwks
    }

    /// Run the full verification flow over a compact JWT.
    pub async fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError> {
        // Step 1: parse the token structure
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

        // Step 2: only RS256 is acceptable
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::UnsupportedAlgorithm);
        }

        // Step 3: claim checks run before any key material is fetched
        let unverified = jsonwebtoken::dangerous::insecure_decode::<Claims>(token)
            .map_err(|_| AuthError::MalformedToken)?;
        self.check_claims(&unverified.claims)?;

        // Step 4: the kid header tells us which key signed the token
        let kid = header.kid.as_deref().ok_or(AuthError::MissingKeyHint)?;

        // Step 5: resolve the key from the tenant JWKS
        let decoding_key = self.jwks.get_decoding_key(kid).await?;

        // Step 6: signature verification; the library re-checks the claims
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = CLOCK_SKEW_LEEWAY;

        let token_data =
            decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::ImmatureSignature
                | jsonwebtoken::errors::ErrorKind::InvalidIssuer
                | jsonwebtoken::errors::ErrorKind::InvalidAudience
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_) => {
                    AuthError::ClaimValidationFailed
                }
                _ => AuthError::MalformedToken,
            })?;

        Ok(VerifiedToken {
            claims: token_data.claims,
        })
    }

    /// Validate issuer, audience, and expiry on as-yet-unverified claims.
    fn check_claims(&self, claims: &Claims) -> Result<(), AuthError> {
        if claims.iss != self.issuer {
            return Err(AuthError::ClaimValidationFailed);
        }

        if !claims.matches_audience(&self.audience) {
            return Err(AuthError::ClaimValidationFailed);
        }

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;

        if claims.exp <= 0 || claims.exp < now - CLOCK_SKEW_LEEWAY as i64 {
            return Err(AuthError::ClaimValidationFailed);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    const ISSUER: &str = "https://acme.eu.auth0.com/";
    const AUDIENCE: &str = "https://api.acme.com";

    fn verifier() -> TokenVerifier {
        // The JWKS URL is never contacted by these tests; every case below
        // fails before key resolution.
        TokenVerifier::new(
            JwksManager::new("https://acme.eu.auth0.com/.well-known/jwks.json"),
            ISSUER,
            AUDIENCE,
        )
    }

    /// Build an unsigned compact JWT from raw header/claims JSON.
    fn unsigned_token(header: &str, claims: &str) -> String {
        let header_b64 = URL_SAFE_NO_PAD.encode(header.as_bytes());
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims.as_bytes());
        format!("{header_b64}.{claims_b64}.AAAA")
    }

    fn valid_claims() -> String {
        format!(
            r#"{{"sub":"auth0|user_1","iss":"{ISSUER}","aud":"{AUDIENCE}","exp":9999999999,"iat":1700000000}}"#
        )
    }

    #[tokio::test]
    async fn garbage_is_malformed() {
        let result = verifier().verify("not-a-jwt").await;
        assert_eq!(result.unwrap_err(), AuthError::MalformedToken);
    }

    #[tokio::test]
    async fn non_rs256_algorithm_is_rejected() {
        let token = unsigned_token(r#"{"alg":"HS256","typ":"JWT"}"#, &valid_claims());
        let result = verifier().verify(&token).await;
        assert_eq!(result.unwrap_err(), AuthError::UnsupportedAlgorithm);
    }

    #[tokio::test]
    async fn wrong_issuer_fails_claim_validation() {
        let claims = format!(
            r#"{{"sub":"auth0|user_1","iss":"https://evil.example.com/","aud":"{AUDIENCE}","exp":9999999999}}"#
        );
        let token = unsigned_token(r#"{"alg":"RS256","typ":"JWT","kid":"key-1"}"#, &claims);
        let result = verifier().verify(&token).await;
        assert_eq!(result.unwrap_err(), AuthError::ClaimValidationFailed);
    }

    #[tokio::test]
    async fn wrong_audience_fails_claim_validation() {
        let claims = format!(
            r#"{{"sub":"auth0|user_1","iss":"{ISSUER}","aud":"https://api.other.com","exp":9999999999}}"#
        );
        let token = unsigned_token(r#"{"alg":"RS256","typ":"JWT","kid":"key-1"}"#, &claims);
        let result = verifier().verify(&token).await;
        assert_eq!(result.unwrap_err(), AuthError::ClaimValidationFailed);
    }

    #[tokio::test]
    async fn expired_token_fails_claim_validation() {
        let claims = format!(
            r#"{{"sub":"auth0|user_1","iss":"{ISSUER}","aud":"{AUDIENCE}","exp":1500000000}}"#
        );
        let token = unsigned_token(r#"{"alg":"RS256","typ":"JWT","kid":"key-1"}"#, &claims);
        let result = verifier().verify(&token).await;
        assert_eq!(result.unwrap_err(), AuthError::ClaimValidationFailed);
    }

    #[tokio::test]
    async fn missing_kid_is_reported_before_key_lookup() {
        let token = unsigned_token(r#"{"alg":"RS256","typ":"JWT"}"#, &valid_claims());
        let result = verifier().verify(&token).await;
        assert_eq!(result.unwrap_err(), AuthError::MissingKeyHint);
    }
}
