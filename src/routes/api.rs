// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::Result;
use crate::models::admin::AdminEntry;
use crate::models::user::ProviderFields;
use crate::session::SessionClaims;
use crate::AppState;

/// Routes requiring a valid session; `require_auth` is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/profile", get(get_profile).put(put_profile))
        .route("/api/backtest", post(run_backtest))
}

/// Routes additionally requiring admin rights; `ensure_admin` is applied in
/// routes/mod.rs.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/admins", get(list_admins).post(add_admin))
}

fn provider_fields(claims: &SessionClaims) -> ProviderFields {
    ProviderFields {
        email: claims.email.clone(),
        name: claims.name.clone(),
        picture: claims.picture.clone(),
    }
}

// ─── Session ─────────────────────────────────────────────────

/// Decoded session claims for the current request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub expires_at: i64,
}

async fn get_me(Extension(claims): Extension<SessionClaims>) -> Json<MeResponse> {
    Json(MeResponse {
        sub: claims.sub,
        email: claims.email,
        name: claims.name,
        picture: claims.picture,
        expires_at: claims.exp,
    })
}

// ─── User Profile ────────────────────────────────────────────

/// Get (and on first access create) the current user's profile.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<crate::models::UserProfile>> {
    let profile = state
        .users
        .get_or_create(&claims.sub, &provider_fields(&claims))
        .await?;
    Ok(Json(profile))
}

/// Update the current user's preferences.
///
/// The body is raw JSON; its `preferences` member is normalized field-by-field
/// before anything is persisted. A missing or malformed member resets the
/// document to its defaults rather than failing the request.
async fn put_profile(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<SessionClaims>,
    Json(body): Json<Value>,
) -> Result<Json<crate::models::UserProfile>> {
    let raw_preferences = body.get("preferences").unwrap_or(&Value::Null);

    let profile = state
        .users
        .update(&claims.sub, &provider_fields(&claims), raw_preferences)
        .await?;
    Ok(Json(profile))
}

// ─── Backtest Proxy ──────────────────────────────────────────

/// Forward a backtest request to the external numeric engine.
async fn run_backtest(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<SessionClaims>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    tracing::info!(subject = %claims.sub, "Proxying backtest request");
    let result = state.backtest.run(&body).await?;
    Ok(Json(result))
}

// ─── Admin Registry ──────────────────────────────────────────

/// List administrators (re-seeds any missing bootstrap admin).
async fn list_admins(State(state): State<Arc<AppState>>) -> Result<Json<Vec<AdminEntry>>> {
    let admins = state.admins.bootstrap_and_read().await?;
    Ok(Json(admins))
}

/// Request body for granting admin rights.
#[derive(Deserialize)]
pub struct AddAdminRequest {
    pub email: String,
}

/// Grant admin rights; 400 on a malformed email, 409 on a duplicate.
async fn add_admin(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<SessionClaims>,
    Json(body): Json<AddAdminRequest>,
) -> Result<Json<Vec<AdminEntry>>> {
    let admins = state
        .admins
        .add(&body.email, claims.email.as_deref())
        .await?;

    tracing::info!(email = %body.email, granted_by = ?claims.email, "Admin added");
    Ok(Json(admins))
}
