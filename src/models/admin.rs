// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Administrator registry entries.

use serde::{Deserialize, Serialize};

/// One administrator grant, keyed in the registry by normalized email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEntry {
    /// Normalized email (trimmed, lower-cased); the registry key.
    pub email: String,
    /// When the grant was created (RFC3339)
    pub created_at: String,
    /// Email of the admin who made the grant; `None` for bootstrap seeds.
    pub added_by: Option<String>,
}

/// Normalize an email address: trim, lower-case, require an `@`.
///
/// Returns `None` for anything that cannot be an email; callers decide whether
/// that means "not an admin" or "bad request".
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    if email.contains('@') {
        Some(email)
    } else {
        None
    }
}
