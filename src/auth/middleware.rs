// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied to the `/users` subtree via
//! `axum::middleware::from_fn_with_state(state, require_auth)`.
//!
//! The token is read from the `token` query parameter, which is the
//! interface API consumers already use; a standard `Authorization: Bearer`
//! header is accepted as a fallback. Every denial, whatever its cause,
//! is the same HTTP 401 with the literal body `Unauthorized.`.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::error::AuthError;
use crate::state::AppState;

/// Authentication middleware function.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = token_from_request(&request) else {
        warn!(
            error_code = AuthError::MissingToken.error_code(),
            path = %request.uri().path(),
            "request denied"
        );
        return AuthError::MissingToken.into_response();
    };

    match state.verifier.verify(&token).await {
        Ok(verified) => {
            request.extensions_mut().insert(verified);
            next.run(request).await
        }
        Err(error) => {
            warn!(
                error_code = error.error_code(),
                path = %request.uri().path(),
                "request denied: {error}"
            );
            error.into_response()
        }
    }
}

/// Extract the bearer token from a request.
///
/// The `token` query parameter wins; the `Authorization` header is the
/// fallback.
fn token_from_request(request: &Request) -> Option<String> {
    if let Some(query) = request.uri().query() {
        let token = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned());
        if let Some(token) = token {
            if !token.is_empty() {
                return Some(token);
            }
        }
    }

    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn token_query_parameter_is_read() {
        let req = request("/users?token=abc.def.ghi&page=1");
        assert_eq!(token_from_request(&req), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn bearer_header_is_the_fallback() {
        let req = Request::builder()
            .uri("/users")
            .header(AUTHORIZATION, "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();
        assert_eq!(token_from_request(&req), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn query_parameter_wins_over_header() {
        let req = Request::builder()
            .uri("/users?token=from-query")
            .header(AUTHORIZATION, "Bearer from-header")
            .body(Body::empty())
            .unwrap();
        assert_eq!(token_from_request(&req), Some("from-query".to_string()));
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let req = request("/users?token=");
        assert_eq!(token_from_request(&req), None);
    }

    #[test]
    fn tokenless_request_yields_none() {
        let req = request("/users");
        assert_eq!(token_from_request(&req), None);
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let req = Request::builder()
            .uri("/users")
            .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        assert_eq!(token_from_request(&req), None);
    }
}
