// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity-provider credential verification.
//!
//! The core treats the provider as a black box: one call per login that either
//! yields the subject's identity or fails. The production implementation asks
//! Google's tokeninfo endpoint to validate the ID token; tests plug in a stub
//! through the `IdentityVerifier` trait.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Identity returned for a valid provider credential.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Identity verification error categories.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The credential is invalid (bad token, wrong audience, missing subject).
    #[error("identity credential rejected: {0}")]
    Rejected(String),
    /// The provider could not be reached; the client may retry.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Seam between the auth routes and the identity provider.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, IdentityError>;
}

/// Verifier backed by Google's tokeninfo endpoint.
pub struct GoogleIdentityVerifier {
    http_client: reqwest::Client,
    expected_audience: String,
}

/// Relevant subset of the tokeninfo response.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleIdentityVerifier {
    pub fn new(expected_audience: impl Into<String>) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .context("failed building identity HTTP client")?;

        Ok(Self {
            http_client,
            expected_audience: expected_audience.into(),
        })
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, IdentityError> {
        let response = self
            .http_client
            .get(TOKENINFO_URL)
            .query(&[("id_token", credential)])
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            // tokeninfo answers 4xx for any invalid token; no detail needed.
            return Err(IdentityError::Rejected(format!(
                "tokeninfo returned {}",
                response.status()
            )));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| IdentityError::Rejected(format!("malformed tokeninfo response: {e}")))?;

        if info.aud != self.expected_audience {
            return Err(IdentityError::Rejected("audience mismatch".to_string()));
        }
        if info.sub.is_empty() {
            return Err(IdentityError::Rejected("missing subject".to_string()));
        }

        Ok(VerifiedIdentity {
            subject: info.sub,
            email: info.email,
            name: info.name,
            picture: info.picture,
        })
    }
}
