// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Run and Comparison Results
//!
//! Outcome records produced by the model service. A [`ScenarioResult`] is
//! created once per run and never mutated afterwards; a [`ComparisonResult`]
//! pairs two of them with per-metric deltas.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Audit-friendly run output shared by CLI and MCP adapters

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::model::{InputSet, OutputSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input layer that supplied a field's effective value.
///
/// Variants are declared lowest precedence first so that `Ord` matches the
/// resolution order: `Base < Scenario < Session < Call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideLayer {
    Base,
    Scenario,
    Session,
    Call,
}

impl std::fmt::Display for OverrideLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Base => "base",
            Self::Scenario => "scenario",
            Self::Session => "session",
            Self::Call => "call",
        };
        f.write_str(label)
    }
}

/// Field -> source layer for every field of an effective input set.
pub type AppliedLayers = IndexMap<String, OverrideLayer>;

/// The result of running one scenario through the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub run_id: RunId,
    pub scenario_name: String,

    /// The complete effective input set actually fed to the model
    pub inputs_used: InputSet,

    pub outputs: OutputSet,

    /// Source layer of every effective input
    pub applied: AppliedLayers,

    pub run_at: DateTime<Utc>,
}

impl ScenarioResult {
    /// Entries whose value did not come from the base inputs.
    pub fn overrides_applied(&self) -> impl Iterator<Item = (&str, OverrideLayer)> {
        self.applied
            .iter()
            .filter(|(_, layer)| **layer != OverrideLayer::Base)
            .map(|(field, layer)| (field.as_str(), *layer))
    }

    pub fn source_of(&self, field: &str) -> Option<OverrideLayer> {
        self.applied.get(field).copied()
    }
}

/// Per-metric difference between scenario A and scenario B.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDifference {
    pub a: f64,
    pub b: f64,

    /// `b - a`
    pub delta: f64,

    /// `delta / a * 100`; `None` when `a` is exactly zero
    pub pct_change: Option<f64>,
}

impl MetricDifference {
    pub fn between(a: f64, b: f64) -> Self {
        let delta = b - a;
        let pct_change = if a == 0.0 { None } else { Some(delta / a * 100.0) };
        Self { a, b, delta, pct_change }
    }
}

/// Side-by-side comparison of two scenario results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub scenario_a: ScenarioResult,
    pub scenario_b: ScenarioResult,

    /// Compared output fields, in comparison order
    pub metrics: Vec<String>,

    pub differences: IndexMap<String, MetricDifference>,
}

impl ComparisonResult {
    /// Compare every output present in both results, optionally restricted to
    /// `metrics`. Order follows the filter when given, otherwise the output
    /// order of `scenario_a`.
    pub fn compute(
        scenario_a: ScenarioResult,
        scenario_b: ScenarioResult,
        metrics: Option<&[String]>,
    ) -> Self {
        let candidates: Vec<String> = match metrics {
            Some(filter) if !filter.is_empty() => filter.to_vec(),
            _ => scenario_a.outputs.keys().map(str::to_string).collect(),
        };

        let mut differences = IndexMap::new();
        for metric in candidates {
            if differences.contains_key(&metric) {
                continue;
            }
            if let (Some(a), Some(b)) = (
                scenario_a.outputs.get(&metric),
                scenario_b.outputs.get(&metric),
            ) {
                differences.insert(metric, MetricDifference::between(a, b));
            }
        }

        Self {
            metrics: differences.keys().cloned().collect(),
            scenario_a,
            scenario_b,
            differences,
        }
    }
}
