// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod admins;
pub mod backtest;
pub mod identity;
pub mod users;

pub use admins::AdminRegistry;
pub use backtest::BacktestClient;
pub use identity::{GoogleIdentityVerifier, IdentityError, IdentityVerifier, VerifiedIdentity};
pub use users::UserProfileStore;
