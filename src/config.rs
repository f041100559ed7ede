// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! The config is built once at startup and carried in `AppState`; no module
//! reads the environment after that point.

use std::env;
use std::path::PathBuf;

/// Fallback session-signing secret for local development.
///
/// Deploying without `SESSION_SECRET` set means every instance signs tokens
/// with this publicly known value; `from_env` logs a warning when it is used.
const DEV_SESSION_SECRET: &[u8] = b"quantboard-dev-secret-do-not-deploy";

/// Administrators seeded into the registry when `BOOTSTRAP_ADMINS` is unset.
const DEFAULT_BOOTSTRAP_ADMINS: &[&str] = &["admin@quantboard.dev"];

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL for CORS and cookie security
    pub frontend_url: String,
    /// Base URL of the external backtest/optimisation engine
    pub backend_url: String,
    /// Google OAuth client ID (expected token audience)
    pub google_client_id: String,
    /// Session token signing key (raw bytes)
    pub session_secret: Vec<u8>,
    /// Explicitly configured data directory; takes priority over all fallbacks
    pub data_dir: Option<PathBuf>,
    /// Admin emails guaranteed to exist in the registry
    pub bootstrap_admins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret.trim().to_string().into_bytes(),
            _ => {
                tracing::warn!(
                    "SESSION_SECRET not set; using the built-in development secret. \
                     Session tokens are NOT secure in this configuration."
                );
                DEV_SESSION_SECRET.to_vec()
            }
        };

        let bootstrap_admins = match env::var("BOOTSTRAP_ADMINS") {
            Ok(list) => list
                .split(',')
                .map(|e| e.trim().to_lowercase())
                .filter(|e| e.contains('@'))
                .collect(),
            Err(_) => DEFAULT_BOOTSTRAP_ADMINS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            session_secret,
            data_dir: env::var("DATA_DIR").ok().map(PathBuf::from),
            bootstrap_admins,
        })
    }

    /// Whether session cookies should carry the `Secure` attribute.
    ///
    /// Derived from the frontend scheme: an https frontend implies a
    /// production deployment behind TLS.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            backend_url: "http://localhost:8000".to_string(),
            google_client_id: "test-client-id.apps.googleusercontent.com".to_string(),
            session_secret: b"test_session_key_32_bytes_long!!".to_vec(),
            data_dir: None,
            bootstrap_admins: vec!["admin@quantboard.dev".to_string()],
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
