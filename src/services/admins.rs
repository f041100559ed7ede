// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Administrator registry on top of the JSON store.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::db::json_store::StoreError;
use crate::db::{stores, JsonStore};
use crate::error::{AppError, Result};
use crate::models::admin::{normalize_email, AdminEntry};
use crate::time_utils::format_utc_rfc3339;

/// The on-disk document: normalized email -> entry. A `BTreeMap` keeps the
/// registry alphabetically sorted by email for free.
type AdminDoc = BTreeMap<String, AdminEntry>;

/// Registry of administrator emails with bootstrap self-healing.
#[derive(Debug, Clone)]
pub struct AdminRegistry {
    store: JsonStore,
    bootstrap: Vec<String>,
}

impl AdminRegistry {
    pub fn new(store: JsonStore, bootstrap: Vec<String>) -> Self {
        Self { store, bootstrap }
    }

    /// Read the registry, re-seeding any missing bootstrap admin.
    ///
    /// Runs on every listing, so the default admin set survives even external
    /// deletion of the backing file. Returns entries sorted by email.
    pub async fn bootstrap_and_read(&self) -> std::result::Result<Vec<AdminEntry>, StoreError> {
        let mut doc: AdminDoc = self.store.read(stores::ADMINS).await?;

        let mut seeded = false;
        for email in &self.bootstrap {
            let Some(email) = normalize_email(email) else {
                continue;
            };
            if !doc.contains_key(&email) {
                doc.insert(
                    email.clone(),
                    AdminEntry {
                        email,
                        created_at: format_utc_rfc3339(Utc::now()),
                        added_by: None,
                    },
                );
                seeded = true;
            }
        }

        if seeded {
            self.store.write(stores::ADMINS, &doc).await?;
        }

        Ok(doc.into_values().collect())
    }

    /// Case- and whitespace-insensitive membership check.
    ///
    /// Bootstrap admins count as members even before their entries have been
    /// persisted; this read performs no write.
    pub async fn is_admin(&self, email: &str) -> std::result::Result<bool, StoreError> {
        let Some(email) = normalize_email(email) else {
            return Ok(false);
        };

        if self.bootstrap.iter().any(|b| b.trim().to_lowercase() == email) {
            return Ok(true);
        }

        let doc: AdminDoc = self.store.read(stores::ADMINS).await?;
        Ok(doc.contains_key(&email))
    }

    /// Grant admin rights to an email; fails on malformed input or duplicates.
    /// Returns the updated, sorted registry.
    pub async fn add(&self, email: &str, added_by: Option<&str>) -> Result<Vec<AdminEntry>> {
        let email = normalize_email(email)
            .ok_or_else(|| AppError::BadRequest("malformed email address".to_string()))?;

        let mut doc: AdminDoc = self.store.read(stores::ADMINS).await?;
        if doc.contains_key(&email) {
            return Err(AppError::AlreadyExists(format!(
                "{email} is already an administrator"
            )));
        }

        doc.insert(
            email.clone(),
            AdminEntry {
                email,
                created_at: format_utc_rfc3339(Utc::now()),
                added_by: added_by.and_then(normalize_email),
            },
        );

        self.store.write(stores::ADMINS, &doc).await?;
        Ok(doc.into_values().collect())
    }
}
