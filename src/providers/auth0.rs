// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth0 Management API integration.
//!
//! The client performs a client-credentials token exchange once, at
//! construction, and holds the resulting access token for its lifetime;
//! recreate the client to refresh. Outbound calls carry a fixed 2-second
//! timeout and are never retried. Only an HTTP 200 with a JSON content
//! type counts as success; every other outcome is an upstream failure
//! that callers treat uniformly.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::config::Config;

/// Fixed timeout on every Management API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum Auth0Error {
    #[error("Auth0 token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Auth0 request failed: {0}")]
    UpstreamRequestFailed(String),

    #[error("Auth0 response was invalid: {0}")]
    InvalidResponse(String),
}

/// Options for the user-listing operation.
///
/// Mirrors the filtering surface of Auth0's `GET /api/v2/users`.
#[derive(Debug, Clone)]
pub struct ListUsersOptions {
    /// Zero-based result page; always sent.
    pub page: u32,
    /// Results per page; always sent.
    pub per_page: u32,
    /// Ask Auth0 for a totals envelope instead of a bare array.
    pub include_totals: bool,
    /// Sort expression, `field:order` with order 1 ascending.
    pub sort: String,
    /// Comma-separated field list to include or exclude.
    pub fields: Option<String>,
    /// Whether `fields` is an include list or an exclude list.
    pub include_fields: Option<bool>,
    /// Lucene query against user attributes.
    pub q: Option<String>,
}

impl Default for ListUsersOptions {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: 5,
            include_totals: false,
            sort: "username:1".to_string(),
            fields: None,
            include_fields: None,
            q: None,
        }
    }
}

/// Options for the single-user operation.
#[derive(Debug, Clone, Default)]
pub struct GetUserOptions {
    /// Comma-separated field list to include or exclude.
    pub fields: Option<String>,
    /// Whether `fields` is an include list or an exclude list.
    pub include_fields: Option<bool>,
}

/// Auth0 Management API client.
#[derive(Debug, Clone)]
pub struct Auth0Client {
    api_base_url: String,
    access_token: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
}

impl Auth0Client {
    /// Build the client and immediately perform the client-credentials
    /// exchange. A client that failed the exchange is never constructed.
    pub async fn connect(config: &Config) -> Result<Self, Auth0Error> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                Auth0Error::UpstreamRequestFailed(format!("failed to build HTTP client: {e}"))
            })?;

        let access_token = exchange_client_credentials(&http, config).await?;

        info!(api_base_url = %config.api_base_url, "Auth0 Management API client ready");

        Ok(Self {
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            access_token,
            http,
        })
    }

    /// List users.
    ///
    /// Auth0 returns a bare JSON array unless `include_totals` was set;
    /// each element is passed through as an opaque attribute map.
    pub async fn list_users(
        &self,
        options: &ListUsersOptions,
    ) -> Result<Vec<Map<String, Value>>, Auth0Error> {
        let query = build_users_query(options);
        let value = self.get_json("users", &query).await?;

        let Value::Array(items) = value else {
            return Err(Auth0Error::InvalidResponse(
                "expected a JSON array of users".to_string(),
            ));
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(Auth0Error::InvalidResponse(format!(
                    "expected a user object, got {other}"
                ))),
            })
            .collect()
    }

    /// Fetch a single user by provider ID.
    pub async fn get_user(
        &self,
        id: &str,
        options: &GetUserOptions,
    ) -> Result<Map<String, Value>, Auth0Error> {
        let mut query = Vec::new();
        if let Some(fields) = &options.fields {
            query.push(("fields", fields.clone()));
        }
        if let Some(include_fields) = options.include_fields {
            query.push(("include_fields", include_fields.to_string()));
        }

        let value = self.get_json(&format!("users/{id}"), &query).await?;
        match value {
            Value::Object(record) => Ok(record),
            other => Err(Auth0Error::InvalidResponse(format!(
                "expected a user object, got {other}"
            ))),
        }
    }

    /// Issue a GET against the Management API.
    ///
    /// Only HTTP 200 with a JSON content type is a success; anything else
    /// is collapsed into `UpstreamRequestFailed`.
    async fn get_json(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Value, Auth0Error> {
        let url = format!("{}/{endpoint}", self.api_base_url);
        let response = self
            .http
            .get(&url)
            .query(query)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                Auth0Error::UpstreamRequestFailed(format!("GET {endpoint} failed: {e}"))
            })?;

        if response.status() != StatusCode::OK {
            return Err(Auth0Error::UpstreamRequestFailed(format!(
                "GET {endpoint} returned {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        if !content_type.contains("application/json") {
            return Err(Auth0Error::UpstreamRequestFailed(format!(
                "GET {endpoint} returned non-JSON content type {content_type:?}"
            )));
        }

        response.json().await.map_err(|e| {
            Auth0Error::InvalidResponse(format!("GET {endpoint} returned invalid JSON: {e}"))
        })
    }
}

/// Perform the client-credentials grant against the tenant token endpoint.
async fn exchange_client_credentials(http: &Client, config: &Config) -> Result<String, Auth0Error> {
    let mut form = HashMap::new();
    form.insert("grant_type".to_string(), "client_credentials".to_string());
    form.insert("client_id".to_string(), config.client_id.clone());
    form.insert("client_secret".to_string(), config.client_secret.clone());
    form.insert("audience".to_string(), config.audience.clone());

    let response = http
        .post(&config.token_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| Auth0Error::TokenExchangeFailed(format!("token request failed: {e}")))?;

    if response.status() != StatusCode::OK {
        return Err(Auth0Error::TokenExchangeFailed(format!(
            "token request returned {}",
            response.status()
        )));
    }

    let token_response: OAuthTokenResponse = response
        .json()
        .await
        .map_err(|e| Auth0Error::TokenExchangeFailed(format!("invalid token response: {e}")))?;

    if token_response.access_token.trim().is_empty() {
        return Err(Auth0Error::TokenExchangeFailed(
            "token response did not include access_token".to_string(),
        ));
    }

    Ok(token_response.access_token)
}

/// Build the query string for the user-listing operation.
///
/// `page`, `per_page`, and `sort` are always present; the optional
/// filters are only sent when set.
fn build_users_query(options: &ListUsersOptions) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("page", options.page.to_string()),
        ("per_page", options.per_page.to_string()),
        ("sort", options.sort.clone()),
    ];

    if options.include_totals {
        query.push(("include_totals", "true".to_string()));
    }
    if let Some(fields) = &options.fields {
        query.push(("fields", fields.clone()));
    }
    if let Some(include_fields) = options.include_fields {
        query.push(("include_fields", include_fields.to_string()));
    }
    if let Some(q) = &options.q {
        query.push(("q", q.clone()));
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(query: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn default_query_always_carries_page_and_sort() {
        let query = build_users_query(&ListUsersOptions::default());
        assert_eq!(lookup(&query, "page"), Some("0"));
        assert_eq!(lookup(&query, "per_page"), Some("5"));
        assert_eq!(lookup(&query, "sort"), Some("username:1"));
        assert_eq!(lookup(&query, "q"), None);
        assert_eq!(lookup(&query, "include_totals"), None);
        assert_eq!(lookup(&query, "fields"), None);
    }

    #[test]
    fn search_query_is_sent_when_present() {
        let options = ListUsersOptions {
            q: Some("email:*@acme.com".to_string()),
            page: 2,
            ..Default::default()
        };
        let query = build_users_query(&options);
        assert_eq!(lookup(&query, "q"), Some("email:*@acme.com"));
        assert_eq!(lookup(&query, "page"), Some("2"));
    }

    #[test]
    fn include_totals_only_appears_when_requested() {
        let options = ListUsersOptions {
            include_totals: true,
            ..Default::default()
        };
        let query = build_users_query(&options);
        assert_eq!(lookup(&query, "include_totals"), Some("true"));
    }

    #[test]
    fn field_filters_are_forwarded() {
        let options = ListUsersOptions {
            fields: Some("user_id,nickname".to_string()),
            include_fields: Some(true),
            ..Default::default()
        };
        let query = build_users_query(&options);
        assert_eq!(lookup(&query, "fields"), Some("user_id,nickname"));
        assert_eq!(lookup(&query, "include_fields"), Some("true"));
    }
}
