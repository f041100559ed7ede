// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use quantboard::config::Config;
use quantboard::db::JsonStore;
use quantboard::routes::create_router;
use quantboard::services::{
    AdminRegistry, BacktestClient, IdentityError, IdentityVerifier, UserProfileStore,
    VerifiedIdentity,
};
use quantboard::{session, time_utils, AppState};
use std::sync::Arc;
use tempfile::TempDir;

/// Identity verifier with canned test credentials.
pub struct StubVerifier;

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, IdentityError> {
        match credential {
            "cred-admin" => Ok(VerifiedIdentity {
                subject: "admin-sub".to_string(),
                email: Some("admin@quantboard.dev".to_string()),
                name: Some("Admin".to_string()),
                picture: None,
            }),
            "cred-user" => Ok(VerifiedIdentity {
                subject: "u1".to_string(),
                email: Some("a@b.com".to_string()),
                name: Some("Ada".to_string()),
                picture: None,
            }),
            _ => Err(IdentityError::Rejected("unknown test credential".to_string())),
        }
    }
}

/// Create a test app backed by a temp data directory and the stub verifier.
/// Returns the router, the shared state, and the temp dir guard.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, TempDir) {
    let tmp = TempDir::new().expect("temp dir");

    let mut config = Config::test_default();
    config.data_dir = Some(tmp.path().to_path_buf());

    let store = JsonStore::new(&config);
    let admins = AdminRegistry::new(store.clone(), config.bootstrap_admins.clone());
    let users = UserProfileStore::new(store);
    let backtest = BacktestClient::new(config.backend_url.clone()).expect("backtest client");

    let state = Arc::new(AppState {
        config,
        admins,
        users,
        identity: Arc::new(StubVerifier),
        backtest,
    });

    (create_router(state.clone()), state, tmp)
}

/// Build a `Cookie` header value holding a freshly issued session.
#[allow(dead_code)]
pub fn session_cookie_for(state: &AppState, sub: &str, email: Option<&str>) -> String {
    let issued = session::issue(
        sub,
        email.map(|s| s.to_string()),
        None,
        None,
        &state.config.session_secret,
        time_utils::unix_now(),
    )
    .expect("issue session");

    format!("{}={}", session::SESSION_COOKIE, issued.token)
}
