// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Override Resolution Engine
//!
//! Merges four input layers into one effective input set and owns the
//! session-level override state.
//!
//! ## Precedence
//!
//! ```text
//! call  >  session  >  scenario  >  base
//! ```
//!
//! Resolution starts from the complete base inputs and applies each partial
//! layer in ascending precedence. Present keys overwrite, absent keys are
//! untouched, so no base field can be dropped. The applied record keeps the
//! last (highest-precedence) layer that wrote each field.
//!
//! ## Permissive merging
//!
//! Override keys are not checked against the schema: unknown fields are merged
//! and reported like any other, and typical-range bounds are never enforced.
//! What the model does with an unknown key is up to the model.

use tracing::debug;

use crate::domain::model::InputSet;
use crate::domain::result::{AppliedLayers, OverrideLayer};

/// Output of a resolution pass
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInputs {
    pub effective: InputSet,
    pub applied: AppliedLayers,
}

/// Owns session override state and resolves input layers.
///
/// One engine per model service instance. Not internally synchronized;
/// callers that share a service across tasks must serialize access.
#[derive(Debug, Clone, Default)]
pub struct OverrideEngine {
    session: InputSet,
}

impl OverrideEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge all four layers. `base` must already be complete.
    pub fn resolve_layers(
        base: &InputSet,
        scenario: &InputSet,
        session: &InputSet,
        call: &InputSet,
    ) -> ResolvedInputs {
        let mut effective = base.clone();
        let mut applied: AppliedLayers = base
            .keys()
            .map(|field| (field.to_string(), OverrideLayer::Base))
            .collect();

        for (layer, overrides) in [
            (OverrideLayer::Scenario, scenario),
            (OverrideLayer::Session, session),
            (OverrideLayer::Call, call),
        ] {
            for (field, value) in overrides.iter() {
                effective.insert(field, value);
                applied.insert(field.to_string(), layer);
            }
        }

        debug!(
            fields = effective.len(),
            overridden = applied.values().filter(|l| **l != OverrideLayer::Base).count(),
            "Resolved effective inputs"
        );

        ResolvedInputs { effective, applied }
    }

    /// Resolve against this engine's current session overrides.
    pub fn resolve(&self, base: &InputSet, scenario: &InputSet, call: &InputSet) -> ResolvedInputs {
        Self::resolve_layers(base, scenario, &self.session, call)
    }

    /// Upsert one session override, returning the value it replaced.
    pub fn set_session_override(&mut self, field: impl Into<String>, value: f64) -> Option<f64> {
        self.session.insert(field, value)
    }

    /// Clear all session overrides, returning how many were active.
    pub fn clear_session_overrides(&mut self) -> usize {
        let cleared = self.session.len();
        self.session.clear();
        cleared
    }

    pub fn session_overrides(&self) -> &InputSet {
        &self.session
    }
}
