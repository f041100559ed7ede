// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Quantboard: backend for the stock-analytics dashboard.
//!
//! This crate provides session auth over signed cookie tokens, an admin
//! registry, per-user preference storage on a fallback-chain JSON store, and
//! a thin proxy to the external backtest engine.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;

use config::Config;
use services::{AdminRegistry, BacktestClient, IdentityVerifier, UserProfileStore};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub admins: AdminRegistry,
    pub users: UserProfileStore,
    pub identity: Arc<dyn IdentityVerifier>,
    pub backtest: BacktestClient,
}
