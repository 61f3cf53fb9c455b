// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Tool Dispatcher
//!
//! Routes a tool name plus JSON arguments to the [`ModelService`]. Shared by
//! every AI-facing adapter; provider identity never reaches this module.
//!
//! [`ToolDispatcher::dispatch`] never fails. Unknown tools, malformed
//! arguments and service errors all come back as `{"error": "..."}` so the
//! calling assistant can relay them. [`ToolDispatcher::try_dispatch`] keeps
//! the typed error for adapters that need to flag failures out of band.
//!
//! [`tool_definitions`] is the single source of truth for tool names,
//! descriptions and input schemas.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Provider-agnostic tool routing

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::application::model_service::{ModelService, ServiceError};
use crate::domain::model::InputSet;

pub const RUN_SCENARIO: &str = "run_scenario";
pub const COMPARE_SCENARIOS: &str = "compare_scenarios";
pub const OVERRIDE_INPUT: &str = "override_input";
pub const RESET_OVERRIDES: &str = "reset_overrides";
pub const GET_AVAILABLE_SCENARIOS: &str = "get_available_scenarios";
pub const GET_MODEL_SCHEMA: &str = "get_model_schema";

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Unknown tool '{0}'.")]
    UnknownTool(String),

    #[error("Invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Tool metadata published to assistants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunScenarioArgs {
    name: String,
    #[serde(default)]
    overrides: Option<InputSet>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CompareScenariosArgs {
    scenario_a: String,
    scenario_b: String,
    #[serde(default)]
    overrides_a: Option<InputSet>,
    #[serde(default)]
    overrides_b: Option<InputSet>,
    #[serde(default)]
    metrics: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct OverrideInputArgs {
    field: String,
    value: f64,
    /// Grouping hint from the assistant; informational only
    #[serde(default)]
    source: Option<String>,
}

pub struct ToolDispatcher {
    service: ModelService,
}

impl ToolDispatcher {
    pub fn new(service: ModelService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ModelService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut ModelService {
        &mut self.service
    }

    /// Execute a tool. Always returns a JSON value.
    pub fn dispatch(&mut self, name: &str, arguments: Value) -> Value {
        match self.try_dispatch(name, arguments) {
            Ok(value) => value,
            Err(e) => json!({ "error": e.to_string() }),
        }
    }

    pub fn try_dispatch(&mut self, name: &str, arguments: Value) -> Result<Value, DispatchError> {
        debug!(tool = %name, "Dispatching tool call");
        let result = self.route(name, arguments);
        if let Err(e) = &result {
            warn!(tool = %name, error = %e, "Tool call failed");
        }
        result
    }

    fn route(&mut self, name: &str, arguments: Value) -> Result<Value, DispatchError> {
        match name {
            RUN_SCENARIO => {
                let args: RunScenarioArgs = parse_args(name, arguments)?;
                let overrides = args.overrides.unwrap_or_default();
                let result = self.service.run_scenario(&args.name, &overrides)?;
                Ok(serde_json::to_value(result)?)
            }
            COMPARE_SCENARIOS => {
                let args: CompareScenariosArgs = parse_args(name, arguments)?;
                let comparison = self.service.compare_scenarios(
                    &args.scenario_a,
                    &args.scenario_b,
                    &args.overrides_a.unwrap_or_default(),
                    &args.overrides_b.unwrap_or_default(),
                    args.metrics.as_deref(),
                )?;
                Ok(serde_json::to_value(comparison)?)
            }
            OVERRIDE_INPUT => {
                let args: OverrideInputArgs = parse_args(name, arguments)?;
                let ack = self.service.override_input(&args.field, args.value);
                let mut value = serde_json::to_value(ack)?;
                if let (Some(source), Some(obj)) = (args.source, value.as_object_mut()) {
                    obj.insert("source".to_string(), Value::String(source));
                }
                Ok(value)
            }
            RESET_OVERRIDES => Ok(serde_json::to_value(self.service.reset_overrides())?),
            GET_AVAILABLE_SCENARIOS => Ok(json!({ "scenarios": self.service.list_scenarios() })),
            GET_MODEL_SCHEMA => Ok(serde_json::to_value(self.service.get_schema())?),
            other => Err(DispatchError::UnknownTool(other.to_string())),
        }
    }
}

/// Null or missing arguments are treated as an empty object.
fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, DispatchError> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| DispatchError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

fn overrides_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "description": description,
        "additionalProperties": { "type": "number" }
    })
}

fn no_arguments() -> Value {
    json!({ "type": "object", "properties": {}, "required": [] })
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: RUN_SCENARIO,
            description: "Run a named scenario through the model, optionally applying additional \
                input overrides for this run only. Returns the effective inputs, every model \
                output, and the layer each input came from.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "The name of the scenario to run." },
                    "overrides": overrides_schema(
                        "Optional map of input field names to numeric values for this run only. \
                         These do not persist between calls."
                    )
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: COMPARE_SCENARIOS,
            description: "Run two named scenarios and return a side-by-side comparison of their \
                outputs, including absolute and percentage differences. Optionally restrict the \
                comparison to specific output metrics.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "scenario_a": { "type": "string", "description": "Name of the first (reference) scenario." },
                    "scenario_b": { "type": "string", "description": "Name of the second scenario." },
                    "overrides_a": overrides_schema("Optional one-off overrides for scenario_a."),
                    "overrides_b": overrides_schema("Optional one-off overrides for scenario_b."),
                    "metrics": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Optional list of output field names to compare. If omitted, all shared outputs are compared."
                    }
                },
                "required": ["scenario_a", "scenario_b"]
            }),
        },
        ToolDefinition {
            name: OVERRIDE_INPUT,
            description: "Apply a persistent session-level override to a model input. The \
                override applies to every subsequent scenario run until reset_overrides is called.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "field": { "type": "string", "description": "The input field name." },
                    "value": { "type": "number", "description": "The numeric value to apply." },
                    "source": { "type": "string", "description": "Optional input group label, e.g. 'rates' or 'credit'." }
                },
                "required": ["field", "value"]
            }),
        },
        ToolDefinition {
            name: RESET_OVERRIDES,
            description: "Clear all active session-level input overrides, restoring every input \
                to its model default.",
            input_schema: no_arguments(),
        },
        ToolDefinition {
            name: GET_AVAILABLE_SCENARIOS,
            description: "List all configured scenarios with their names, descriptions and \
                stress rationale.",
            input_schema: no_arguments(),
        },
        ToolDefinition {
            name: GET_MODEL_SCHEMA,
            description: "Describe the model: every input with units and typical range, every \
                output with its interpretation, plus assumptions and caveats.",
            input_schema: no_arguments(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::models::{build_service, ModelKind};

    fn dispatcher() -> ToolDispatcher {
        ToolDispatcher::new(build_service(ModelKind::BondPortfolio).unwrap())
    }

    #[test]
    fn test_definitions_cover_every_routed_tool() {
        let mut d = dispatcher();
        for def in tool_definitions() {
            let result = d.try_dispatch(def.name, json!({}));
            if let Err(DispatchError::UnknownTool(name)) = result {
                panic!("tool {name} is published but not routed");
            }
            assert_eq!(def.input_schema["type"], "object");
        }
    }

    #[test]
    fn test_unknown_tool_returns_error_payload() {
        let value = dispatcher().dispatch("delete_everything", json!({}));
        assert_eq!(value["error"], "Unknown tool 'delete_everything'.");
    }

    #[test]
    fn test_missing_required_argument() {
        let value = dispatcher().dispatch(RUN_SCENARIO, json!({}));
        let message = value["error"].as_str().unwrap();
        assert!(message.starts_with("Invalid arguments for 'run_scenario'"));
    }

    #[test]
    fn test_non_numeric_override_is_rejected() {
        let value = dispatcher().dispatch(
            RUN_SCENARIO,
            json!({ "name": "base_case", "overrides": { "yield_10y": "high" } }),
        );
        assert!(value.get("error").is_some());
    }

    #[test]
    fn test_unknown_scenario_payload() {
        let value = dispatcher().dispatch(RUN_SCENARIO, json!({ "name": "does_not_exist" }));
        let message = value["error"].as_str().unwrap();
        assert!(message.starts_with("Unknown scenario 'does_not_exist'. Available: base_case"));
    }

    #[test]
    fn test_run_with_call_overrides() {
        let value = dispatcher().dispatch(
            RUN_SCENARIO,
            json!({ "name": "base_case", "overrides": { "yield_10y": 5.0 } }),
        );
        assert_eq!(value["inputs_used"]["yield_10y"], 5.0);
        assert_eq!(value["applied"]["yield_10y"], "call");
        assert_eq!(value["applied"]["yield_2y"], "base");
    }

    #[test]
    fn test_override_then_reset() {
        let mut d = dispatcher();
        let ack = d.dispatch(
            OVERRIDE_INPUT,
            json!({ "source": "rates", "field": "yield_10y", "value": 5.5 }),
        );
        assert_eq!(ack["field"], "yield_10y");
        assert_eq!(ack["source"], "rates");
        assert!(ack["previous"].is_null());

        let run = d.dispatch(RUN_SCENARIO, json!({ "name": "base_case" }));
        assert_eq!(run["applied"]["yield_10y"], "session");

        let reset = d.dispatch(RESET_OVERRIDES, Value::Null);
        assert_eq!(reset["cleared"], 1);
        assert!(d.service().active_overrides().is_empty());
    }

    #[test]
    fn test_compare_with_metric_filter() {
        let value = dispatcher().dispatch(
            COMPARE_SCENARIOS,
            json!({
                "scenario_a": "base_case",
                "scenario_b": "rates_shock_up",
                "metrics": ["nav", "dv01"]
            }),
        );
        assert_eq!(value["metrics"], json!(["nav", "dv01"]));
        assert!(value["differences"]["nav"]["delta"].as_f64().unwrap() < 0.0);
    }

    #[test]
    fn test_listing_has_no_overrides() {
        let value = dispatcher().dispatch(GET_AVAILABLE_SCENARIOS, json!({}));
        let scenarios = value["scenarios"].as_array().unwrap();
        assert_eq!(scenarios.len(), 5);
        assert!(scenarios.iter().all(|s| s.get("overrides").is_none()));
    }
}
