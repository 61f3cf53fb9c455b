// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Model Description Types
//!
//! Value objects describing a scenario-driven model: its schema, the named
//! scenarios it ships with, and the keyed numeric sets that flow into and out
//! of the black-box model function.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Immutable-by-convention data shared by every adapter

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping from field name to numeric value.
///
/// Used for complete base inputs, partial override layers, effective inputs
/// and model outputs alike. Iteration follows insertion order; re-inserting an
/// existing key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSet(IndexMap<String, f64>);

/// Outputs share the same shape as inputs.
pub type OutputSet = InputSet;

impl InputSet {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Upsert a value, returning the previous one for that field.
    pub fn insert(&mut self, field: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(field.into(), value)
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        self.0.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for InputSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for InputSet {
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// A single model input variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,

    /// Logical grouping, e.g. "rates", "credit", "portfolio"
    pub group: String,

    pub description: String,

    pub units: String,

    /// Lower end of the typical range. Advisory only, never enforced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typical_min: Option<f64>,

    /// Upper end of the typical range. Advisory only, never enforced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typical_max: Option<f64>,
}

impl InputField {
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        units: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            description: description.into(),
            units: units.into(),
            typical_min: None,
            typical_max: None,
        }
    }

    pub fn with_typical_range(mut self, min: f64, max: f64) -> Self {
        self.typical_min = Some(min);
        self.typical_max = Some(max);
        self
    }
}

/// A single model output metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputField {
    pub name: String,
    pub description: String,
    pub units: String,

    /// How a reader should interpret movements in this metric
    pub interpretation: String,

    /// Value below which the result is concerning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub good_threshold: Option<f64>,

    /// Value below which the result is critical
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bad_threshold: Option<f64>,
}

impl OutputField {
    pub fn new(
        name: impl Into<String>,
        units: impl Into<String>,
        description: impl Into<String>,
        interpretation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            units: units.into(),
            interpretation: interpretation.into(),
            good_threshold: None,
            bad_threshold: None,
        }
    }

    pub fn with_thresholds(mut self, good: f64, bad: f64) -> Self {
        self.good_threshold = Some(good);
        self.bad_threshold = Some(bad);
        self
    }
}

/// Full description of a model's inputs, outputs, assumptions and caveats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    pub description: String,
    pub inputs: Vec<InputField>,
    pub outputs: Vec<OutputField>,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default)]
    pub caveats: Vec<String>,
}

impl ModelSchema {
    pub fn input(&self, name: &str) -> Option<&InputField> {
        self.inputs.iter().find(|f| f.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&OutputField> {
        self.outputs.iter().find(|f| f.name == name)
    }

    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|f| f.name.as_str())
    }
}

/// A named stress scenario: a partial override set layered over base inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    pub name: String,
    pub description: String,
    pub stress_rationale: String,
    #[serde(default)]
    pub overrides: InputSet,
}

impl ScenarioDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        stress_rationale: impl Into<String>,
        overrides: InputSet,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            stress_rationale: stress_rationale.into(),
            overrides,
        }
    }

    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            stress_rationale: self.stress_rationale.clone(),
        }
    }
}

/// Listing entry for a scenario; carries metadata only, never overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub description: String,
    pub stress_rationale: String,
}
