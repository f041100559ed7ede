// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Thin client for the external backtest/optimisation engine.
//!
//! All numerics live in the engine; this service only relays JSON.

use std::time::Duration;

use anyhow::Context;
use serde_json::Value;

use crate::error::{AppError, Result};

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for the numeric engine configured via `BACKEND_URL`.
#[derive(Debug, Clone)]
pub struct BacktestClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl BacktestClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .context("failed building backtest HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Forward a backtest request body verbatim and relay the JSON response.
    pub async fn run(&self, payload: &Value) -> Result<Value> {
        let url = format!("{}/backtest", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::BacktestEngine(format!("engine unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::BacktestEngine(format!(
                "engine returned {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::BacktestEngine(format!("malformed engine response: {e}")))
    }
}
