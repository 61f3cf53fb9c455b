// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Explicator CLI

pub mod config;
pub mod mcp;
pub mod scenario;

pub use self::config::ConfigCommand;
pub use self::scenario::{CompareArgs, OverrideArgs, RunArgs};

use anyhow::{Context, Result};

use explicator_core::application::model_service::ModelService;
use explicator_core::domain::config::ExplicatorConfig;
use explicator_core::infrastructure::models;

/// Wire the model selected by configuration.
pub fn build_service(config: &ExplicatorConfig) -> Result<ModelService> {
    let kind = config.model_kind()?;
    models::build_service(kind).with_context(|| format!("Failed to build model '{}'", kind))
}

/// Parse a `FIELD=VALUE` override.
pub fn parse_assignment(raw: &str) -> Result<(String, f64), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", raw))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    if !value.is_finite() {
        return Err(format!("'{}' is not a finite number", value));
    }
    Ok((field.to_string(), value))
}
