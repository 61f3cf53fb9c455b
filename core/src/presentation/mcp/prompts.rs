// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Reusable prompt templates built from the current session state.
//!
//! Prompts never run the model. When the results they need are missing they
//! return instructions telling the assistant which tool to call first.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::error::{McpError, McpResult};
use super::protocol::{PromptArgument, PromptDescriptor};
use crate::application::model_service::ModelService;
use crate::domain::model::OutputSet;
use crate::domain::result::ComparisonResult;

pub const EXPLAIN_SCENARIO_RESULT: &str = "explain_scenario_result";
pub const COMPARE_SCENARIOS_NARRATIVE: &str = "compare_scenarios_narrative";
pub const SUMMARISE_RISK: &str = "summarise_risk";
pub const EXPLAIN_INPUT_SENSITIVITY: &str = "explain_input_sensitivity";

pub fn prompt_definitions() -> Vec<PromptDescriptor> {
    vec![
        PromptDescriptor {
            name: EXPLAIN_SCENARIO_RESULT,
            description: "Explain what drove the result of a scenario in plain English.",
            arguments: vec![PromptArgument {
                name: "scenario_name",
                description: "Scenario whose latest result should be explained.",
                required: true,
            }],
        },
        PromptDescriptor {
            name: COMPARE_SCENARIOS_NARRATIVE,
            description: "Narrate the key differences between two scenario outcomes.",
            arguments: vec![
                PromptArgument {
                    name: "scenario_a",
                    description: "Reference scenario.",
                    required: true,
                },
                PromptArgument {
                    name: "scenario_b",
                    description: "Scenario compared against the reference.",
                    required: true,
                },
            ],
        },
        PromptDescriptor {
            name: SUMMARISE_RISK,
            description: "Summarise risk exposures across every scenario run this session.",
            arguments: vec![],
        },
        PromptDescriptor {
            name: EXPLAIN_INPUT_SENSITIVITY,
            description: "Explain how sensitive the model is to one input field.",
            arguments: vec![PromptArgument {
                name: "input_field",
                description: "Name of the input field.",
                required: true,
            }],
        },
    ]
}

fn required_arg<'a>(args: &'a Map<String, Value>, prompt: &str, name: &str) -> McpResult<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| McpError::InvalidParams(format!("Prompt '{}' requires argument '{}'", prompt, name)))
}

fn pretty<T: serde::Serialize + ?Sized>(value: &T) -> McpResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render a prompt's text.
pub fn render_prompt(name: &str, args: &Map<String, Value>, service: &ModelService) -> McpResult<String> {
    let model_name = &service.get_schema().name;

    match name {
        EXPLAIN_SCENARIO_RESULT => {
            let scenario = required_arg(args, name, "scenario_name")?;
            let Some(result) = service.current_results().get(scenario) else {
                return Ok(format!(
                    "No result found for scenario '{}'. Run it first using the run_scenario tool.",
                    scenario
                ));
            };
            let overrides: Map<String, Value> = result
                .overrides_applied()
                .map(|(field, layer)| (field.to_string(), Value::String(layer.to_string())))
                .collect();

            Ok(format!(
                "You are an analyst. Explain the following scenario result in plain English \
                 to a non-technical stakeholder.\n\n\
                 Model: {}\nScenario: {}\n\n\
                 Inputs used:\n{}\n\n\
                 Overrides applied (field -> layer):\n{}\n\n\
                 Outputs:\n{}\n\n\
                 Focus on: what drove the key outputs, what risks this scenario reveals, \
                 and what a decision maker should take away from this result.",
                model_name,
                scenario,
                pretty(&result.inputs_used)?,
                pretty(&overrides)?,
                pretty(&result.outputs)?,
            ))
        }
        COMPARE_SCENARIOS_NARRATIVE => {
            let scenario_a = required_arg(args, name, "scenario_a")?;
            let scenario_b = required_arg(args, name, "scenario_b")?;
            let results = service.current_results();
            let (Some(a), Some(b)) = (results.get(scenario_a), results.get(scenario_b)) else {
                return Ok(format!(
                    "Results for '{}' and '{}' are not both available. Run them first using \
                     the compare_scenarios tool.",
                    scenario_a, scenario_b
                ));
            };
            let comparison = ComparisonResult::compute(a.clone(), b.clone(), None);

            Ok(format!(
                "You are an analyst. Compare these two scenario outcomes and narrate the key \
                 differences for a senior committee.\n\n\
                 Model: {}\nComparing: '{}' vs '{}'\n\n\
                 Differences (b - a):\n{}\n\n\
                 Focus on: the most significant differences, which scenario is more \
                 stressful and why, and what factors are driving the divergence.",
                model_name,
                scenario_a,
                scenario_b,
                pretty(&comparison.differences)?,
            ))
        }
        SUMMARISE_RISK => {
            let results = service.current_results();
            if results.is_empty() {
                return Ok("No scenarios have been run yet. Use the run_scenario tool to execute \
                     one or more scenarios before requesting a risk summary."
                    .to_string());
            }
            let outputs: IndexMap<&str, &OutputSet> = results
                .iter()
                .map(|(name, r)| (name.as_str(), &r.outputs))
                .collect();

            Ok(format!(
                "You are a chief risk officer. Summarise the current risk exposures based on \
                 the scenario results below.\n\n\
                 Model: {}\n\
                 Active overrides:\n{}\n\n\
                 Scenario outputs:\n{}\n\n\
                 Focus on: overall risk level, which scenarios are most severe, key drivers \
                 of risk, and any concentrations or tail risks to flag.",
                model_name,
                pretty(service.active_overrides())?,
                pretty(&outputs)?,
            ))
        }
        EXPLAIN_INPUT_SENSITIVITY => {
            let field = required_arg(args, name, "input_field")?;
            let details = match service.get_schema().input(field) {
                Some(info) => pretty(info)?,
                None => format!("Field '{}' not found in schema.", field),
            };

            Ok(format!(
                "You are a quantitative analyst. Explain how sensitive this model is to the \
                 following input, and what happens when it moves.\n\n\
                 Model: {}\nInput field: {}\nField details:\n{}\n\n\
                 Explain: the meaning of this input, what drives it in practice, how the \
                 outputs are exposed to it, and what a one standard deviation move might \
                 mean for outcomes.",
                model_name, field, details,
            ))
        }
        other => Err(McpError::InvalidParams(format!("Unknown prompt '{}'", other))),
    }
}
