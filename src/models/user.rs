// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model for storage and API.

use serde::{Deserialize, Serialize};

use crate::models::preferences::Preferences;

/// User profile stored in the users document (keyed by subject id).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity-provider subject id (also the document key)
    pub id: String,
    /// Email address (may be None if not shared)
    #[serde(default)]
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Profile picture URL
    #[serde(default)]
    pub picture: Option<String>,
    /// When the profile was first created (RFC3339)
    pub created_at: String,
    /// Advances on every read-or-create and every update (RFC3339)
    pub updated_at: String,
    /// Self-healing preferences document
    #[serde(default)]
    pub preferences: Preferences,
}

/// Latest identity-provider view of a user, pushed on every lookup.
///
/// A `None` never overwrites a known value; providers sometimes withhold
/// fields the user previously shared.
#[derive(Debug, Clone, Default)]
pub struct ProviderFields {
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl UserProfile {
    /// Merge fresh provider fields, keeping existing values where the provider
    /// supplied nothing.
    pub fn refresh_provider_fields(&mut self, fields: &ProviderFields) {
        if fields.email.is_some() {
            self.email = fields.email.clone();
        }
        if fields.name.is_some() {
            self.name = fields.name.clone();
        }
        if fields.picture.is_some() {
            self.picture = fields.picture.clone();
        }
    }
}
