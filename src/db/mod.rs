// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer (fallback-chain JSON document store).

pub mod json_store;

pub use json_store::JsonStore;

/// Logical store names as constants.
pub mod stores {
    pub const ADMINS: &str = "admins";
    pub const USERS: &str = "users";
}
