// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::providers::Auth0Client;

#[derive(Clone)]
pub struct AppState {
    pub auth0: Arc<Auth0Client>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(auth0: Auth0Client, verifier: TokenVerifier) -> Self {
        Self {
            auth0: Arc::new(auth0),
            verifier: Arc::new(verifier),
        }
    }
}
