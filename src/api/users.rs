// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User directory endpoints.
//!
//! Listing proxies the Auth0 Management API; the remaining CRUD routes are
//! placeholders that preserve the route shape until they are implemented.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::error;
use utoipa::IntoParams;

use crate::{
    error::ApiError,
    models::{JsonApiObject, UserListResponse, UserResource},
    providers::ListUsersOptions,
    state::AppState,
};

/// Directory listings are sorted by nickname, ascending.
const LIST_SORT_ORDER: &str = "nickname:1";

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    /// Zero-based result page.
    #[serde(default)]
    pub page: u32,
    /// Lucene query against user attributes.
    pub q: Option<String>,
}

/// List users from the directory.
#[utoipa::path(
    get,
    path = "/users",
    params(ListUsersQuery),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User listing", body = UserListResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 502, description = "Directory provider was unreachable"),
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let options = ListUsersOptions {
        page: params.page,
        q: params.q,
        sort: LIST_SORT_ORDER.to_string(),
        ..Default::default()
    };

    let records = state.auth0.list_users(&options).await.map_err(|e| {
        error!(error = %e, "user listing failed");
        ApiError::bad_gateway("Failed to list users")
    })?;

    let data = records.into_iter().map(UserResource::from_record).collect();

    Ok(Json(UserListResponse {
        jsonapi: JsonApiObject::default(),
        data,
    }))
}

/// Create a user. Not implemented; the route shape is reserved.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("bearer" = [])),
    responses((status = 200, description = "Placeholder"))
)]
pub async fn create_user() -> &'static str {
    "create()"
}

/// Fetch a single user. Not implemented; the route shape is reserved.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer" = [])),
    responses((status = 200, description = "Placeholder"))
)]
pub async fn get_user(Path(_id): Path<String>) -> &'static str {
    "get()"
}

/// Update a user. Not implemented; the route shape is reserved.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer" = [])),
    responses((status = 200, description = "Placeholder"))
)]
pub async fn update_user(Path(_id): Path<String>) -> &'static str {
    "update()"
}

/// Delete a user. Not implemented; the route shape is reserved.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer" = [])),
    responses((status = 200, description = "Placeholder"))
)]
pub async fn delete_user(Path(_id): Path<String>) -> &'static str {
    "delete()"
}
