// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod admin;
pub mod preferences;
pub mod user;

pub use admin::AdminEntry;
pub use preferences::Preferences;
pub use user::{ProviderFields, UserProfile};
