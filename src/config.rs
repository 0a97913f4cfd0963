// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup. The Auth0
//! tenant settings are required; everything else has a default derived
//! from the tenant domain.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH0_DOMAIN` | Auth0 tenant domain (e.g. `acme.eu.auth0.com`) | Required |
//! | `AUTH0_AUDIENCE` | API audience for token exchange and JWT validation | Required |
//! | `AUTH0_CLIENT_ID` | Client ID for the client-credentials grant | Required |
//! | `AUTH0_CLIENT_SECRET` | Client secret for the client-credentials grant | Required |
//! | `AUTH0_API_BASE_URL` | Management API base | `https://{domain}/api/v2` |
//! | `AUTH0_TOKEN_URL` | Token endpoint | `https://{domain}/oauth/token` |
//! | `AUTH0_JWKS_URL` | JWKS endpoint | `https://{domain}/.well-known/jwks.json` |
//! | `AUTH0_ISSUER` | Expected JWT issuer claim | `https://{domain}/` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the Auth0 tenant domain.
pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";

/// Environment variable name for the API audience.
pub const AUTH0_AUDIENCE_ENV: &str = "AUTH0_AUDIENCE";

/// Environment variable name for the client-credentials client ID.
pub const AUTH0_CLIENT_ID_ENV: &str = "AUTH0_CLIENT_ID";

/// Environment variable name for the client-credentials client secret.
pub const AUTH0_CLIENT_SECRET_ENV: &str = "AUTH0_CLIENT_SECRET";

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),
}

/// Resolved runtime configuration.
///
/// All endpoint URLs are derived from the tenant domain unless explicitly
/// overridden, which the integration tests use to point the gateway at a
/// stub server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Auth0 tenant domain.
    pub domain: String,
    /// API audience, used both in the token exchange and in JWT validation.
    pub audience: String,
    /// Client ID for the client-credentials grant.
    pub client_id: String,
    /// Client secret for the client-credentials grant.
    pub client_secret: String,
    /// Management API base URL.
    pub api_base_url: String,
    /// Token endpoint URL.
    pub token_url: String,
    /// JWKS endpoint URL.
    pub jwks_url: String,
    /// Expected JWT issuer claim.
    pub issuer: String,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let domain = env_required(AUTH0_DOMAIN_ENV)?;
        let audience = env_required(AUTH0_AUDIENCE_ENV)?;
        let client_id = env_required(AUTH0_CLIENT_ID_ENV)?;
        let client_secret = env_required(AUTH0_CLIENT_SECRET_ENV)?;

        let mut config = Self::for_tenant(domain, audience, client_id, client_secret);
        if let Some(api_base_url) = env_optional("AUTH0_API_BASE_URL") {
            config.api_base_url = api_base_url;
        }
        if let Some(token_url) = env_optional("AUTH0_TOKEN_URL") {
            config.token_url = token_url;
        }
        if let Some(jwks_url) = env_optional("AUTH0_JWKS_URL") {
            config.jwks_url = jwks_url;
        }
        if let Some(issuer) = env_optional("AUTH0_ISSUER") {
            config.issuer = issuer;
        }

        Ok(config)
    }

    /// Build a configuration with all endpoint URLs derived from the tenant
    /// domain, following Auth0's published API layout.
    pub fn for_tenant(
        domain: impl Into<String>,
        audience: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        let domain = domain.into();
        let api_base_url = format!("https://{domain}/api/v2");
        let token_url = format!("https://{domain}/oauth/token");
        let jwks_url = format!("https://{domain}/.well-known/jwks.json");
        let issuer = format!("https://{domain}/");

        Self {
            domain,
            audience: audience.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base_url,
            token_url,
            jwks_url,
            issuer,
        }
    }
}

fn env_required(name: &'static str) -> Result<String, ConfigError> {
    env_optional(name).ok_or(ConfigError::MissingVar(name))
}

fn env_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_derive_from_domain() {
        let config = Config::for_tenant("acme.eu.auth0.com", "https://api.acme.com", "id", "secret");
        assert_eq!(config.api_base_url, "https://acme.eu.auth0.com/api/v2");
        assert_eq!(config.token_url, "https://acme.eu.auth0.com/oauth/token");
        assert_eq!(
            config.jwks_url,
            "https://acme.eu.auth0.com/.well-known/jwks.json"
        );
        assert_eq!(config.issuer, "https://acme.eu.auth0.com/");
    }

    #[test]
    fn missing_required_var_is_reported_by_name() {
        let err = env_required("USERDIR_GATEWAY_TEST_UNSET_VAR").unwrap_err();
        assert_eq!(
            err.to_string(),
            "required environment variable USERDIR_GATEWAY_TEST_UNSET_VAR is not set"
        );
    }
}
