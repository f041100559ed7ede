// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication middleware.

use crate::error::AppError;
use crate::session::{self, SessionClaims, SESSION_COOKIE};
use crate::time_utils::unix_now;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Extract and verify the session cookie, or fail with 401.
fn session_from_jar(state: &AppState, jar: &CookieJar) -> Result<SessionClaims, AppError> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(AppError::Unauthorized)?;

    session::verify(cookie.value(), &state.config.session_secret, unix_now())
        .ok_or(AppError::InvalidToken)
}

/// Middleware that requires a valid session.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = session_from_jar(&state, &jar)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Middleware that requires a valid session belonging to an administrator.
///
/// 401 for a missing/invalid token, 403 when the session has no email or the
/// email is not in the registry. Side-effect-free besides the registry read.
pub async fn ensure_admin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = session_from_jar(&state, &jar)?;

    let email = claims
        .email
        .as_deref()
        .ok_or_else(|| AppError::Forbidden("no email on record".to_string()))?;

    if !state.admins.is_admin(email).await? {
        return Err(AppError::Forbidden("admin access required".to_string()));
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
