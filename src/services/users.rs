// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile store on top of the JSON store.

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::Value;

use crate::db::json_store::StoreError;
use crate::db::{stores, JsonStore};
use crate::models::preferences::Preferences;
use crate::models::user::{ProviderFields, UserProfile};
use crate::time_utils::format_utc_rfc3339;

/// The on-disk document: subject id -> profile.
type UserDoc = BTreeMap<String, UserProfile>;

/// One profile per authenticated subject, with self-healing preferences.
#[derive(Debug, Clone)]
pub struct UserProfileStore {
    store: JsonStore,
}

impl UserProfileStore {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Fetch the profile for `id`, creating it with default preferences on
    /// first sight. Provider fields refresh stored values only when non-null,
    /// preferences are re-normalized, and `updatedAt` advances. The returned
    /// profile is an independent snapshot.
    pub async fn get_or_create(
        &self,
        id: &str,
        fields: &ProviderFields,
    ) -> Result<UserProfile, StoreError> {
        let mut doc: UserDoc = self.store.read(stores::USERS).await?;
        let now = format_utc_rfc3339(Utc::now());

        let profile = match doc.get_mut(id) {
            Some(profile) => {
                profile.refresh_provider_fields(fields);
                profile.preferences = profile.preferences.renormalize();
                profile.updated_at = now;
                profile.clone()
            }
            None => {
                let profile = new_profile(id, fields, now);
                doc.insert(id.to_string(), profile.clone());
                profile
            }
        };

        self.store.write(stores::USERS, &doc).await?;
        Ok(profile)
    }

    /// Replace the profile's preferences with the normalized form of an
    /// untrusted payload, refreshing provider fields along the way.
    pub async fn update(
        &self,
        id: &str,
        fields: &ProviderFields,
        raw_preferences: &Value,
    ) -> Result<UserProfile, StoreError> {
        let mut doc: UserDoc = self.store.read(stores::USERS).await?;
        let now = format_utc_rfc3339(Utc::now());

        let entry = doc
            .entry(id.to_string())
            .or_insert_with(|| new_profile(id, fields, now.clone()));

        entry.refresh_provider_fields(fields);
        entry.preferences = Preferences::normalize(raw_preferences);
        entry.updated_at = now;
        let profile = entry.clone();

        self.store.write(stores::USERS, &doc).await?;
        Ok(profile)
    }
}

fn new_profile(id: &str, fields: &ProviderFields, now: String) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        email: fields.email.clone(),
        name: fields.name.clone(),
        picture: fields.picture.clone(),
        created_at: now.clone(),
        updated_at: now,
        preferences: Preferences::default(),
    }
}
