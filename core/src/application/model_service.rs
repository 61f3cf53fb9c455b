// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Model Service
//!
//! The single entry point used by every front end. Owns the session state
//! (override engine and latest-result cache) and delegates catalog lookups to
//! a [`ModelRepository`] and model execution to a [`ScenarioRunner`].
//!
//! The service applies no numeric logic of its own; the runner call is the
//! only place the black-box model executes.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Orchestrate repository, override engine and runner
//! - **Concurrency:** Synchronous, `&mut self` for session-mutating calls.
//!   Front ends that share one instance must serialize access.

use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::model::{InputSet, ModelSchema, ScenarioSummary};
use crate::domain::overrides::OverrideEngine;
use crate::domain::repository::{ModelRepository, RepositoryError, RunnerError, ScenarioRunner};
use crate::domain::result::{ComparisonResult, RunId, ScenarioResult};

/// Errors surfaced by the model service.
///
/// Both variants carry the collaborator error untouched. An unknown
/// scenario arrives as `Repository(RepositoryError::ScenarioNotFound { .. })`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    ModelExecution(#[from] RunnerError),
}

/// Acknowledgement returned by [`ModelService::override_input`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideAck {
    pub field: String,
    pub value: f64,
    /// Session value this override replaced, if any
    pub previous: Option<f64>,
    pub message: String,
}

/// Acknowledgement returned by [`ModelService::reset_overrides`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetAck {
    pub cleared: usize,
    pub message: String,
}

pub struct ModelService {
    repository: Arc<dyn ModelRepository>,
    runner: Arc<dyn ScenarioRunner>,
    engine: OverrideEngine,
    last_results: IndexMap<String, ScenarioResult>,
}

impl ModelService {
    pub fn new(repository: Arc<dyn ModelRepository>, runner: Arc<dyn ScenarioRunner>) -> Self {
        Self {
            repository,
            runner,
            engine: OverrideEngine::new(),
            last_results: IndexMap::new(),
        }
    }

    /// Scenario metadata in catalog order. Overrides are not included.
    pub fn list_scenarios(&self) -> Vec<ScenarioSummary> {
        self.repository
            .list_scenarios()
            .into_iter()
            .map(|s| s.summary())
            .collect()
    }

    pub fn get_schema(&self) -> &ModelSchema {
        self.repository.schema()
    }

    /// Run a named scenario.
    ///
    /// Effective inputs resolve as call > session > scenario > base. An
    /// unknown name fails before the runner is touched; runner errors are
    /// returned as-is.
    pub fn run_scenario(
        &mut self,
        name: &str,
        call_overrides: &InputSet,
    ) -> Result<ScenarioResult, ServiceError> {
        let result = self.execute(name, call_overrides)?;
        self.record(&result);
        Ok(result)
    }

    /// Resolve and execute without touching the result cache.
    fn execute(&self, name: &str, call_overrides: &InputSet) -> Result<ScenarioResult, ServiceError> {
        let scenario = self.repository.get_scenario(name)?;
        let resolved = self.engine.resolve(
            self.repository.base_inputs(),
            &scenario.overrides,
            call_overrides,
        );

        debug!(scenario = %name, "Executing model");
        let outputs = self.runner.execute(&resolved.effective)?;

        let result = ScenarioResult {
            run_id: RunId::new(),
            scenario_name: scenario.name.clone(),
            inputs_used: resolved.effective,
            outputs,
            applied: resolved.applied,
            run_at: Utc::now(),
        };

        info!(
            scenario = %name,
            run_id = %result.run_id,
            overrides = result.overrides_applied().count(),
            "Scenario run completed"
        );

        Ok(result)
    }

    fn record(&mut self, result: &ScenarioResult) {
        self.last_results.shift_remove(&result.scenario_name);
        self.last_results.insert(result.scenario_name.clone(), result.clone());
    }

    /// Run both scenarios and diff their outputs. Session overrides apply to
    /// both sides equally.
    ///
    /// Both names are looked up before anything executes, and the result
    /// cache is only updated once both runs succeed.
    pub fn compare_scenarios(
        &mut self,
        name_a: &str,
        name_b: &str,
        call_overrides_a: &InputSet,
        call_overrides_b: &InputSet,
        metrics: Option<&[String]>,
    ) -> Result<ComparisonResult, ServiceError> {
        self.repository.get_scenario(name_a)?;
        self.repository.get_scenario(name_b)?;

        let result_a = self.execute(name_a, call_overrides_a)?;
        let result_b = self.execute(name_b, call_overrides_b)?;
        self.record(&result_a);
        self.record(&result_b);

        let comparison = ComparisonResult::compute(result_a, result_b, metrics);
        info!(
            scenario_a = %name_a,
            scenario_b = %name_b,
            metrics = comparison.metrics.len(),
            "Scenario comparison completed"
        );
        Ok(comparison)
    }

    /// Set a session override. Applies to every later run until reset.
    pub fn override_input(&mut self, field: &str, value: f64) -> OverrideAck {
        let previous = self.engine.set_session_override(field, value);
        info!(field = %field, value, ?previous, "Session override applied");

        OverrideAck {
            field: field.to_string(),
            value,
            previous,
            message: format!("Override applied: {} = {}", field, value),
        }
    }

    pub fn reset_overrides(&mut self) -> ResetAck {
        let cleared = self.engine.clear_session_overrides();
        info!(cleared, "Session overrides cleared");

        ResetAck {
            cleared,
            message: format!(
                "Cleared {} override(s). All inputs restored to model defaults.",
                cleared
            ),
        }
    }

    pub fn active_overrides(&self) -> &InputSet {
        self.engine.session_overrides()
    }

    /// Most recent result per scenario name run in this session, oldest first
    pub fn current_results(&self) -> &IndexMap<String, ScenarioResult> {
        &self.last_results
    }

    /// The most recently completed run, if any
    pub fn latest_result(&self) -> Option<&ScenarioResult> {
        self.last_results.values().last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{InputField, OutputField, OutputSet, ScenarioDefinition};
    use crate::domain::result::OverrideLayer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedRepository {
        schema: ModelSchema,
        base: InputSet,
        scenarios: Vec<ScenarioDefinition>,
    }

    impl ModelRepository for FixedRepository {
        fn schema(&self) -> &ModelSchema {
            &self.schema
        }

        fn base_inputs(&self) -> &InputSet {
            &self.base
        }

        fn get_scenario(&self, name: &str) -> Result<&ScenarioDefinition, RepositoryError> {
            self.scenarios
                .iter()
                .find(|s| s.name == name)
                .ok_or_else(|| RepositoryError::ScenarioNotFound {
                    name: name.to_string(),
                    available: self.scenarios.iter().map(|s| s.name.clone()).collect(),
                })
        }

        fn list_scenarios(&self) -> Vec<&ScenarioDefinition> {
            self.scenarios.iter().collect()
        }
    }

    /// Sums known inputs, rejects negative rates and counts invocations
    #[derive(Default)]
    struct SummingRunner {
        calls: AtomicUsize,
    }

    impl ScenarioRunner for SummingRunner {
        fn execute(&self, inputs: &InputSet) -> Result<OutputSet, RunnerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let rate = inputs.get("rate").ok_or_else(|| RunnerError::MissingInput("rate".into()))?;
            if rate < 0.0 {
                return Err(RunnerError::ModelExecution(format!("negative rate {}", rate)));
            }
            let spread = inputs
                .get("spread_ig")
                .ok_or_else(|| RunnerError::MissingInput("spread_ig".into()))?;
            Ok(OutputSet::from([("total_yield", rate + spread), ("zero", 0.0)]))
        }
    }

    fn service() -> (ModelService, Arc<SummingRunner>) {
        let repository = FixedRepository {
            schema: ModelSchema {
                name: "Test".to_string(),
                description: String::new(),
                inputs: vec![
                    InputField::new("rate", "rates", "%", "Rate"),
                    InputField::new("spread_ig", "credit", "%", "IG spread"),
                ],
                outputs: vec![OutputField::new("total_yield", "%", "Yield", "Higher is better")],
                assumptions: vec![],
                caveats: vec![],
            },
            base: InputSet::from([("rate", 4.25), ("spread_ig", 1.20)]),
            scenarios: vec![
                ScenarioDefinition::new("base_case", "No stress", "", InputSet::new()),
                ScenarioDefinition::new(
                    "credit_stress",
                    "Spreads widen",
                    "",
                    InputSet::from([("spread_ig", 3.00)]),
                ),
            ],
        };
        let runner = Arc::new(SummingRunner::default());
        (ModelService::new(Arc::new(repository), runner.clone()), runner)
    }

    #[test]
    fn test_base_case_uses_base_inputs() {
        let (mut svc, _) = service();
        let result = svc.run_scenario("base_case", &InputSet::new()).unwrap();
        assert_eq!(result.inputs_used, InputSet::from([("rate", 4.25), ("spread_ig", 1.20)]));
        assert_eq!(result.overrides_applied().count(), 0);
    }

    #[test]
    fn test_layered_run() {
        let (mut svc, _) = service();
        svc.override_input("rate", 5.00);
        let result = svc
            .run_scenario("credit_stress", &InputSet::from([("spread_ig", 2.50)]))
            .unwrap();

        assert_eq!(result.inputs_used, InputSet::from([("rate", 5.00), ("spread_ig", 2.50)]));
        assert_eq!(result.source_of("rate"), Some(OverrideLayer::Session));
        assert_eq!(result.source_of("spread_ig"), Some(OverrideLayer::Call));
        assert_eq!(result.outputs.get("total_yield"), Some(7.5));
    }

    #[test]
    fn test_unknown_scenario_never_reaches_runner() {
        let (mut svc, runner) = service();
        let err = svc.run_scenario("does_not_exist", &InputSet::new()).unwrap_err();

        assert!(matches!(err, ServiceError::Repository(RepositoryError::ScenarioNotFound { .. })));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
        assert!(svc.current_results().is_empty());
    }

    #[test]
    fn test_override_and_reset_acks() {
        let (mut svc, _) = service();
        let ack = svc.override_input("rate", 6.0);
        assert_eq!(ack.previous, None);
        let ack = svc.override_input("rate", 7.0);
        assert_eq!(ack.previous, Some(6.0));
        assert_eq!(svc.active_overrides().get("rate"), Some(7.0));

        let reset = svc.reset_overrides();
        assert_eq!(reset.cleared, 1);
        assert!(reset.message.starts_with("Cleared 1 override(s)"));
        assert!(svc.active_overrides().is_empty());
        assert_eq!(svc.reset_overrides().cleared, 0);
    }

    #[test]
    fn test_compare_applies_session_to_both_sides() {
        let (mut svc, runner) = service();
        svc.override_input("rate", 5.0);

        let comparison = svc
            .compare_scenarios("base_case", "credit_stress", &InputSet::new(), &InputSet::new(), None)
            .unwrap();

        assert_eq!(runner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(comparison.scenario_a.inputs_used.get("rate"), Some(5.0));
        assert_eq!(comparison.scenario_b.inputs_used.get("rate"), Some(5.0));

        let diff = comparison.differences["total_yield"];
        assert!((diff.delta - 1.8).abs() < 1e-12);
        assert_eq!(comparison.differences["zero"].pct_change, None);
        assert_eq!(svc.current_results().len(), 2);
    }

    #[test]
    fn test_compare_fails_fast_on_unknown_second_scenario() {
        let (mut svc, runner) = service();
        let err = svc
            .compare_scenarios("base_case", "nope", &InputSet::new(), &InputSet::new(), None)
            .unwrap_err();

        assert!(err.to_string().contains("Unknown scenario 'nope'"));
        assert!(matches!(err, ServiceError::Repository(RepositoryError::ScenarioNotFound { .. })));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
        assert!(svc.current_results().is_empty());
    }

    #[test]
    fn test_compare_runner_failure_leaves_cache_untouched() {
        let (mut svc, runner) = service();
        let earlier = svc.run_scenario("credit_stress", &InputSet::new()).unwrap();

        let err = svc
            .compare_scenarios(
                "credit_stress",
                "base_case",
                &InputSet::new(),
                &InputSet::from([("rate", -1.0)]),
                None,
            )
            .unwrap_err();

        assert!(matches!(err, ServiceError::ModelExecution(RunnerError::ModelExecution(_))));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 3);
        assert_eq!(svc.current_results().len(), 1);
        assert_eq!(svc.current_results()["credit_stress"].run_id, earlier.run_id);
    }

    #[test]
    fn test_latest_result_is_most_recent_run() {
        let (mut svc, _) = service();
        assert!(svc.latest_result().is_none());
        svc.run_scenario("credit_stress", &InputSet::new()).unwrap();
        svc.run_scenario("base_case", &InputSet::new()).unwrap();
        svc.run_scenario("credit_stress", &InputSet::new()).unwrap();

        assert_eq!(svc.latest_result().unwrap().scenario_name, "credit_stress");
        let order: Vec<&String> = svc.current_results().keys().collect();
        assert_eq!(order, vec!["base_case", "credit_stress"]);
    }
}
