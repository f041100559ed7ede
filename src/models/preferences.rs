// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User preferences document and its normalization.
//!
//! Preferences arrive from the browser as raw JSON and are never trusted:
//! every field is re-validated independently and replaced by its typed default
//! when structurally invalid. Normalization never fails a request; the worst
//! outcome for a bad sub-document is falling back to the default.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Watch-list seeded into new profiles.
pub const DEFAULT_WATCHLIST: &[&str] = &["CDR.WA", "PKN.WA", "PKOBP"];

/// Benchmark symbols seeded into a fresh portfolio draft.
const DEFAULT_BENCHMARKS: &[&str] = &["WIG20"];

const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;
const DEFAULT_TOP_N: u64 = 5;

/// User preferences: watch-list, saved scoring templates, and the in-progress
/// scoring and portfolio drafts.
///
/// Deserialization routes through [`Preferences::normalize`] (see the manual
/// `Deserialize` impl below), so a stored document with a structurally invalid
/// sub-part heals to defaults instead of failing the parse of every sibling
/// record in the same file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub watchlist: Vec<String>,
    pub score_templates: Vec<ScoreTemplate>,
    pub score_draft: ScoreDraft,
    pub portfolio_draft: PortfolioDraft,
}

/// A saved, named scoring template. Invariant: `rules` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTemplate {
    pub name: String,
    pub rules: Vec<ScoreRule>,
}

/// One ranking rule: weight a metric in ascending or descending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRule {
    pub metric: String,
    pub weight: f64,
    pub direction: RuleDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleDirection {
    Asc,
    Desc,
}

/// The in-progress scoring draft; unlike a saved template it may be empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDraft {
    pub name: String,
    pub rules: Vec<ScoreRule>,
}

/// The in-progress portfolio draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDraft {
    /// Manual symbol/weight rows, or a score-template-driven selection.
    pub mode: PortfolioMode,
    /// Manual rows (used in `Manual` mode)
    pub positions: Vec<PortfolioPosition>,
    /// Name of the scoring template driving selection (used in `Score` mode)
    pub score_template: String,
    /// How many top-scored symbols to hold; must be positive.
    pub top_n: u64,
    pub rebalance: RebalanceFrequency,
    /// Starting cash; must be positive.
    pub initial_capital: f64,
    /// Transaction fee, percent per trade
    pub fee_pct: f64,
    /// Minimum drift before a rebalance trade, percent
    pub rebalance_threshold_pct: f64,
    /// Comparison symbols charted against the portfolio
    pub benchmarks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortfolioMode {
    Manual,
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebalanceFrequency {
    Monthly,
    Quarterly,
    Yearly,
}

/// One manual portfolio row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPosition {
    pub symbol: String,
    pub weight: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            watchlist: DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect(),
            score_templates: Vec::new(),
            score_draft: ScoreDraft::default(),
            portfolio_draft: PortfolioDraft::default(),
        }
    }
}

impl Default for PortfolioDraft {
    fn default() -> Self {
        Self {
            mode: PortfolioMode::Manual,
            positions: Vec::new(),
            score_template: String::new(),
            top_n: DEFAULT_TOP_N,
            rebalance: RebalanceFrequency::Quarterly,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            fee_pct: 0.0,
            rebalance_threshold_pct: 0.0,
            benchmarks: DEFAULT_BENCHMARKS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Preferences {
    /// Build a fully typed, fully defaulted document from untrusted JSON.
    ///
    /// Anything that is not an object yields the default document; within an
    /// object each field is normalized independently.
    pub fn normalize(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            watchlist: normalize_symbols(obj.get("watchlist"), DEFAULT_WATCHLIST),
            score_templates: normalize_templates(obj.get("scoreTemplates")),
            score_draft: normalize_draft(obj.get("scoreDraft")),
            portfolio_draft: normalize_portfolio(obj.get("portfolioDraft")),
        }
    }

    /// Re-normalize an already-typed document (self-healing on read paths).
    pub fn renormalize(&self) -> Self {
        match serde_json::to_value(self) {
            Ok(value) => Self::normalize(&value),
            Err(_) => Self::default(),
        }
    }
}

impl<'de> Deserialize<'de> for Preferences {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Never reject stored or submitted preferences: a wrong-typed field
        // (legacy data, external edits) defaults per-field via normalize.
        let value = Value::deserialize(deserializer)?;
        Ok(Self::normalize(&value))
    }
}

/// Normalize a symbol list: trim, upper-case, drop empties, de-duplicate
/// keeping first occurrence. A missing or non-array field gets the default.
fn normalize_symbols(value: Option<&Value>, default: &[&str]) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return default.iter().map(|s| s.to_string()).collect();
    };

    let mut out = Vec::new();
    for item in items {
        let Some(raw) = item.as_str() else { continue };
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() || out.contains(&symbol) {
            continue;
        }
        out.push(symbol);
    }
    out
}

fn normalize_templates(value: Option<&Value>) -> Vec<ScoreTemplate> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let name = trimmed_string(obj.get("name"));
            if name.is_empty() {
                return None;
            }
            let rules = normalize_rules(obj.get("rules"));
            // A template without rules scores nothing; drop it.
            if rules.is_empty() {
                return None;
            }
            Some(ScoreTemplate { name, rules })
        })
        .collect()
}

fn normalize_rules(value: Option<&Value>) -> Vec<ScoreRule> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let metric = trimmed_string(obj.get("metric"));
            if metric.is_empty() {
                return None;
            }
            Some(ScoreRule {
                metric,
                weight: finite_or(obj.get("weight"), 0.0),
                direction: match obj.get("direction").and_then(Value::as_str) {
                    Some("asc") => RuleDirection::Asc,
                    _ => RuleDirection::Desc,
                },
            })
        })
        .collect()
}

fn normalize_draft(value: Option<&Value>) -> ScoreDraft {
    let Some(obj) = value.and_then(Value::as_object) else {
        return ScoreDraft::default();
    };

    ScoreDraft {
        name: trimmed_string(obj.get("name")),
        rules: normalize_rules(obj.get("rules")),
    }
}

fn normalize_portfolio(value: Option<&Value>) -> PortfolioDraft {
    let Some(obj) = value.and_then(Value::as_object) else {
        return PortfolioDraft::default();
    };

    let positions = match obj.get("positions").and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .filter_map(|item| {
                let row = item.as_object()?;
                let symbol = trimmed_string(row.get("symbol")).to_uppercase();
                if symbol.is_empty() {
                    return None;
                }
                Some(PortfolioPosition {
                    symbol,
                    weight: finite_or(row.get("weight"), 0.0),
                })
            })
            .collect(),
        None => Vec::new(),
    };

    PortfolioDraft {
        mode: match obj.get("mode").and_then(Value::as_str) {
            Some("score") => PortfolioMode::Score,
            _ => PortfolioMode::Manual,
        },
        positions,
        score_template: trimmed_string(obj.get("scoreTemplate")),
        top_n: positive_count(obj.get("topN"), DEFAULT_TOP_N),
        rebalance: match obj.get("rebalance").and_then(Value::as_str) {
            Some("monthly") => RebalanceFrequency::Monthly,
            Some("yearly") => RebalanceFrequency::Yearly,
            _ => RebalanceFrequency::Quarterly,
        },
        initial_capital: positive_or(obj.get("initialCapital"), DEFAULT_INITIAL_CAPITAL),
        fee_pct: finite_or(obj.get("feePct"), 0.0),
        rebalance_threshold_pct: finite_or(obj.get("rebalanceThresholdPct"), 0.0),
        benchmarks: normalize_symbols(obj.get("benchmarks"), DEFAULT_BENCHMARKS),
    }
}

fn trimmed_string(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn finite_or(value: Option<&Value>, default: f64) -> f64 {
    match value.and_then(Value::as_f64) {
        Some(n) if n.is_finite() => n,
        _ => default,
    }
}

fn positive_or(value: Option<&Value>, default: f64) -> f64 {
    match value.and_then(Value::as_f64) {
        Some(n) if n.is_finite() && n > 0.0 => n,
        _ => default,
    }
}

fn positive_count(value: Option<&Value>, default: u64) -> u64 {
    match value.and_then(Value::as_u64) {
        Some(n) if n > 0 => n,
        _ => default,
    }
}
