// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login and logout routes.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::user::ProviderFields;
use crate::services::identity::IdentityError;
use crate::session;
use crate::time_utils::unix_now;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/google", post(login))
        .route("/auth/logout", post(logout))
}

/// Login request: the opaque credential from Google Sign-In.
#[derive(Deserialize)]
pub struct LoginRequest {
    credential: String,
}

/// Verify the provider credential, establish the profile, set the session
/// cookie, and return the profile.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let identity = state
        .identity
        .verify(&body.credential)
        .await
        .map_err(|err| match err {
            IdentityError::Rejected(reason) => {
                tracing::warn!(reason = %reason, "Login credential rejected");
                AppError::Unauthorized
            }
            IdentityError::Unavailable(reason) => {
                AppError::Internal(anyhow::anyhow!("identity provider unavailable: {reason}"))
            }
        })?;

    let issued = session::issue(
        identity.subject.clone(),
        identity.email.clone(),
        identity.name.clone(),
        identity.picture.clone(),
        &state.config.session_secret,
        unix_now(),
    )?;

    let fields = ProviderFields {
        email: identity.email,
        name: identity.name,
        picture: identity.picture,
    };
    let profile = state.users.get_or_create(&identity.subject, &fields).await?;

    tracing::info!(subject = %identity.subject, "Session issued");

    let jar = jar.add(session::session_cookie(
        issued.token,
        state.config.secure_cookies(),
    ));

    Ok((jar, Json(profile)))
}

/// Clear the session cookie. The server keeps no revocation list; the token
/// simply ages out after its 7-day TTL.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.add(session::clear_session_cookie(state.config.secure_cookies()));
    (jar, StatusCode::NO_CONTENT)
}
