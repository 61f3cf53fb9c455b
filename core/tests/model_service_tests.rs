// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Integration tests for the model service against the public API.
//!
//! Covers:
//! - Layer precedence through the full run path (call > session > scenario > base)
//! - Session lifecycle: upsert, reset, zero residue
//! - Side-effect-free failure on unknown scenarios
//! - Runner errors surfacing unchanged
//! - Comparison sign antisymmetry and undefined percentage deltas

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use explicator_core::application::model_service::{ModelService, ServiceError};
use explicator_core::domain::model::{InputField, InputSet, ModelSchema, OutputField, OutputSet, ScenarioDefinition};
use explicator_core::domain::repository::{RepositoryError, RunnerError, ScenarioRunner};
use explicator_core::domain::result::OverrideLayer;
use explicator_core::infrastructure::models::{build_service, ModelKind};
use explicator_core::infrastructure::repositories::InMemoryModelRepository;

/// Echoes known inputs as outputs and counts invocations.
struct EchoRunner {
    calls: AtomicUsize,
    fail_on_rate_above: Option<f64>,
}

impl EchoRunner {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on_rate_above: None,
        }
    }
}

impl ScenarioRunner for EchoRunner {
    fn execute(&self, inputs: &InputSet) -> Result<OutputSet, RunnerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rate = inputs.get("rate").unwrap_or_default();
        if let Some(limit) = self.fail_on_rate_above {
            if rate > limit {
                return Err(RunnerError::ModelExecution(format!("rate {rate} out of domain")));
            }
        }
        let spread = inputs.get("spread_ig").unwrap_or_default();
        Ok(OutputSet::from([
            ("rate_out", rate),
            ("spread_out", spread),
            ("zero_base", if spread > 1.2 { 1.0 } else { 0.0 }),
        ]))
    }
}

fn repository() -> InMemoryModelRepository {
    let schema = ModelSchema {
        name: "Echo".to_string(),
        description: "Echo model".to_string(),
        inputs: vec![
            InputField::new("rate", "rates", "%", "Rate").with_typical_range(0.0, 10.0),
            InputField::new("spread_ig", "credit", "%", "IG spread"),
        ],
        outputs: vec![
            OutputField::new("rate_out", "%", "Rate", ""),
            OutputField::new("spread_out", "%", "Spread", ""),
            OutputField::new("zero_base", "", "Flag", ""),
        ],
        assumptions: vec![],
        caveats: vec![],
    };
    InMemoryModelRepository::new(
        schema,
        InputSet::from([("rate", 4.25), ("spread_ig", 1.20)]),
        vec![
            ScenarioDefinition::new("base_case", "No stress", "Baseline", InputSet::new()),
            ScenarioDefinition::new(
                "credit_stress",
                "Spreads widen",
                "GFC-style",
                InputSet::from([("spread_ig", 3.00)]),
            ),
        ],
    )
    .unwrap()
}

fn service_with(runner: Arc<EchoRunner>) -> ModelService {
    ModelService::new(Arc::new(repository()), runner)
}

#[test]
fn test_documented_precedence_example() {
    let mut service = service_with(Arc::new(EchoRunner::new()));
    service.override_input("rate", 5.00);

    let result = service
        .run_scenario("credit_stress", &InputSet::from([("spread_ig", 2.50)]))
        .unwrap();

    assert_eq!(result.inputs_used, InputSet::from([("rate", 5.00), ("spread_ig", 2.50)]));
    assert_eq!(result.source_of("rate"), Some(OverrideLayer::Session));
    assert_eq!(result.source_of("spread_ig"), Some(OverrideLayer::Call));
    assert_eq!(result.scenario_name, "credit_stress");
}

#[test]
fn test_call_beats_session_for_same_field() {
    let mut service = service_with(Arc::new(EchoRunner::new()));
    service.override_input("rate", 9.0);

    let result = service
        .run_scenario("base_case", &InputSet::from([("rate", 1.0)]))
        .unwrap();

    assert_eq!(result.inputs_used.get("rate"), Some(1.0));
    assert_eq!(result.source_of("rate"), Some(OverrideLayer::Call));
}

#[test]
fn test_base_case_reproduces_base_inputs() {
    let mut service = service_with(Arc::new(EchoRunner::new()));
    let result = service.run_scenario("base_case", &InputSet::new()).unwrap();

    assert_eq!(result.inputs_used, InputSet::from([("rate", 4.25), ("spread_ig", 1.20)]));
    assert!(result.applied.values().all(|l| *l == OverrideLayer::Base));
}

#[test]
fn test_reset_restores_scenario_only_result() {
    let mut service = service_with(Arc::new(EchoRunner::new()));
    let before = service.run_scenario("credit_stress", &InputSet::new()).unwrap();

    service.override_input("rate", 7.0);
    service.override_input("spread_ig", 0.1);
    let ack = service.reset_overrides();
    assert_eq!(ack.cleared, 2);

    let after = service.run_scenario("credit_stress", &InputSet::new()).unwrap();
    assert_eq!(after.inputs_used, before.inputs_used);
    assert_eq!(after.applied, before.applied);
    assert_eq!(after.outputs, before.outputs);
    assert_ne!(after.run_id, before.run_id);
}

#[test]
fn test_unknown_scenario_is_side_effect_free() {
    let runner = Arc::new(EchoRunner::new());
    let mut service = service_with(runner.clone());

    let err = service.run_scenario("does_not_exist", &InputSet::new()).unwrap_err();
    match err {
        ServiceError::Repository(RepositoryError::ScenarioNotFound { name, available }) => {
            assert_eq!(name, "does_not_exist");
            assert_eq!(available, vec!["base_case".to_string(), "credit_stress".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    assert!(service.current_results().is_empty());
}

#[test]
fn test_runner_error_propagates_unchanged() {
    let runner = Arc::new(EchoRunner {
        calls: AtomicUsize::new(0),
        fail_on_rate_above: Some(10.0),
    });
    let mut service = service_with(runner);

    let err = service
        .run_scenario("base_case", &InputSet::from([("rate", 11.0)]))
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::ModelExecution(RunnerError::ModelExecution("rate 11 out of domain".to_string()))
    );
}

#[test]
fn test_unknown_override_field_is_reported_and_harmless() {
    let mut service = service_with(Arc::new(EchoRunner::new()));
    let baseline = service.run_scenario("base_case", &InputSet::new()).unwrap();

    service.override_input("not_a_field", 42.0);
    let result = service.run_scenario("base_case", &InputSet::new()).unwrap();

    assert_eq!(result.source_of("not_a_field"), Some(OverrideLayer::Session));
    assert_eq!(result.inputs_used.get("not_a_field"), Some(42.0));
    assert_eq!(result.outputs, baseline.outputs);
}

#[test]
fn test_compare_is_antisymmetric_in_sign() {
    let mut service = service_with(Arc::new(EchoRunner::new()));
    let empty = InputSet::new();

    let ab = service
        .compare_scenarios("base_case", "credit_stress", &empty, &empty, None)
        .unwrap();
    let ba = service
        .compare_scenarios("credit_stress", "base_case", &empty, &empty, None)
        .unwrap();

    assert_eq!(ab.metrics, ba.metrics);
    for metric in &ab.metrics {
        assert_eq!(ab.differences[metric].delta, -ba.differences[metric].delta, "{metric}");
    }

    // zero_base is 0.0 in base_case and 1.0 under credit_stress
    assert_eq!(ab.differences["zero_base"].pct_change, None);
    assert_eq!(ba.differences["zero_base"].pct_change, Some(-100.0));
    assert_eq!(ab.differences["rate_out"].pct_change, Some(0.0));
}

#[test]
fn test_compare_call_overrides_are_per_side() {
    let mut service = service_with(Arc::new(EchoRunner::new()));

    let comparison = service
        .compare_scenarios(
            "base_case",
            "base_case",
            &InputSet::from([("rate", 4.0)]),
            &InputSet::from([("rate", 5.0)]),
            Some(&["rate_out".to_string()]),
        )
        .unwrap();

    assert_eq!(comparison.metrics, vec!["rate_out".to_string()]);
    let diff = comparison.differences["rate_out"];
    assert_eq!((diff.a, diff.b, diff.delta), (4.0, 5.0, 1.0));
    assert_eq!(diff.pct_change, Some(25.0));
}

#[test]
fn test_bond_portfolio_stress_ordering() {
    let mut service = build_service(ModelKind::BondPortfolio).unwrap();
    let empty = InputSet::new();

    let nav = |service: &mut ModelService, name: &str| {
        service
            .run_scenario(name, &empty)
            .unwrap()
            .outputs
            .get("portfolio_nav")
            .unwrap()
    };

    let base = nav(&mut service, "base_case");
    let up = nav(&mut service, "rates_shock_up");
    let down = nav(&mut service, "rates_shock_down");
    let credit = nav(&mut service, "credit_stress");
    let stagflation = nav(&mut service, "stagflation");

    assert_eq!(base, 100.0);
    assert!(up < base && down > base);
    assert!(credit < base);
    assert!(stagflation < up, "stagflation should hurt more than a rates shock alone");
    assert_eq!(service.current_results().len(), 5);
}
