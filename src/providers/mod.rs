// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Third-party provider integrations.

pub mod auth0;

pub use auth0::{Auth0Client, Auth0Error, GetUserOptions, ListUsersOptions};
