// ABOUTME: Session context passed explicitly to every persistence call
// ABOUTME: Replaces ambient auth state with an injected value object
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Explicit session context.
//!
//! There is no ambient "current user": orchestrators take a [`Session`] on
//! every call, and the REST backend is opened with the session's access token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated session for a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Authenticated user id; row-level ownership is enforced against this
    pub user_id: Uuid,
    /// Bearer token for backend requests
    pub access_token: String,
    /// Email, when the auth provider exposes it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Session {
    /// Build a session from an auth response
    #[must_use]
    pub fn new(user_id: Uuid, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            access_token: access_token.into(),
            email: None,
        }
    }

    /// Attach the user's email
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
