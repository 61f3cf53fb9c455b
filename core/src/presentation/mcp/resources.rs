// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Read-only MCP resources exposing model metadata and session state as JSON.

use serde_json::json;

use super::error::{McpError, McpResult};
use super::protocol::ResourceDescriptor;
use crate::application::model_service::ModelService;

pub const SCHEMA_URI: &str = "model://schema";
pub const SCENARIOS_URI: &str = "model://scenarios";
pub const LATEST_RESULTS_URI: &str = "model://results/latest";
pub const CURRENT_OVERRIDES_URI: &str = "model://overrides/current";

const JSON_MIME: &str = "application/json";

pub fn resource_definitions() -> Vec<ResourceDescriptor> {
    vec![
        ResourceDescriptor {
            uri: SCHEMA_URI,
            name: "Model schema",
            description: "Every model input and output with units, typical ranges and \
                interpretation guidance, plus assumptions and caveats.",
            mime_type: JSON_MIME,
        },
        ResourceDescriptor {
            uri: SCENARIOS_URI,
            name: "Scenarios",
            description: "Scenario definitions, including what each is designed to stress-test.",
            mime_type: JSON_MIME,
        },
        ResourceDescriptor {
            uri: LATEST_RESULTS_URI,
            name: "Latest results",
            description: "Most recent run result for each scenario executed this session.",
            mime_type: JSON_MIME,
        },
        ResourceDescriptor {
            uri: CURRENT_OVERRIDES_URI,
            name: "Active overrides",
            description: "Session-level input overrides currently in effect.",
            mime_type: JSON_MIME,
        },
    ]
}

/// Render a resource as pretty JSON text.
pub fn read_resource(uri: &str, service: &ModelService) -> McpResult<String> {
    let text = match uri {
        SCHEMA_URI => serde_json::to_string_pretty(service.get_schema())?,
        SCENARIOS_URI => serde_json::to_string_pretty(&service.list_scenarios())?,
        LATEST_RESULTS_URI => serde_json::to_string_pretty(service.current_results())?,
        CURRENT_OVERRIDES_URI => serde_json::to_string_pretty(service.active_overrides())?,
        other => return Err(McpError::InvalidParams(format!("Unknown resource '{}'", other))),
    };
    Ok(text)
}

/// `resources/read` result body
pub fn read_result(uri: &str, service: &ModelService) -> McpResult<serde_json::Value> {
    let text = read_resource(uri, service)?;
    Ok(json!({
        "contents": [{ "uri": uri, "mimeType": JSON_MIME, "text": text }]
    }))
}
