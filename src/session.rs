// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed session tokens and the session cookie.
//!
//! A token is `base64url(payload) + "." + base64url(tag)` where the payload is
//! the JSON-serialized claims and the tag is HMAC-SHA256 over the payload bytes.
//! Verification never reports which check failed; callers only see valid/invalid.

use axum_extra::extract::cookie::{Cookie, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "qb_session";

/// Session lifetime: 7 days.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Decoded session claims carried by a signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (identity-provider user id)
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// A freshly issued session token plus its decoded claims.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub claims: SessionClaims,
}

/// Create a signed session token for a verified identity.
pub fn issue(
    sub: impl Into<String>,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
    secret: &[u8],
    now: i64,
) -> anyhow::Result<IssuedSession> {
    let claims = SessionClaims {
        sub: sub.into(),
        email,
        name,
        picture,
        iat: now,
        exp: now + SESSION_TTL_SECS,
    };

    let payload = serde_json::to_vec(&claims)?;
    let tag = sign(&payload, secret)?;

    let token = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(&payload),
        URL_SAFE_NO_PAD.encode(tag)
    );

    Ok(IssuedSession { token, claims })
}

/// Verify a session token and return its claims, or `None` if the token is
/// malformed, tampered with, or expired.
pub fn verify(token: &str, secret: &[u8], now: i64) -> Option<SessionClaims> {
    let (payload_b64, tag_b64) = token.split_once('.')?;
    if payload_b64.is_empty() || tag_b64.is_empty() {
        return None;
    }

    let payload = URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
    let supplied_tag = URL_SAFE_NO_PAD.decode(tag_b64).ok()?;

    let expected_tag = sign(&payload, secret).ok()?;

    // Constant-time comparison; ct_eq also rejects length mismatches.
    if !bool::from(expected_tag.as_slice().ct_eq(&supplied_tag)) {
        return None;
    }

    let claims: SessionClaims = serde_json::from_slice(&payload).ok()?;
    if claims.sub.is_empty() || now > claims.exp {
        return None;
    }

    Some(claims)
}

fn sign(payload: &[u8], secret: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| anyhow::anyhow!("HMAC init failed: {}", e))?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Build the session cookie set on login.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS))
        .build()
}

/// Build the removal cookie set on logout: empty value, already expired.
///
/// Attributes must match `session_cookie` or browsers keep the original.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .build()
}
