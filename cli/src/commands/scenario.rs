// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Scenario commands
//!
//! Commands: scenarios, run, compare, schema, override, reset
//!
//! Each invocation gets a fresh service, so session overrides set by
//! `override` only last for that process.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use explicator_core::application::model_service::ModelService;
use explicator_core::domain::model::InputSet;

use super::parse_assignment;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scenario name
    pub name: String,

    /// One-off input override for this run
    #[arg(short = 'o', long = "override", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub overrides: Vec<(String, f64)>,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Reference scenario
    pub scenario_a: String,

    /// Scenario compared against the reference
    pub scenario_b: String,

    /// One-off override applied to scenario A only
    #[arg(long = "override-a", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub overrides_a: Vec<(String, f64)>,

    /// One-off override applied to scenario B only
    #[arg(long = "override-b", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub overrides_b: Vec<(String, f64)>,

    /// Restrict the comparison to these output metrics
    #[arg(short = 'm', long = "metric", value_name = "METRIC")]
    pub metrics: Vec<String>,
}

#[derive(Args, Debug)]
pub struct OverrideArgs {
    /// Input field name
    pub field: String,

    /// New value
    #[arg(allow_negative_numbers = true)]
    pub value: f64,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to render result")?;
    println!("{}", text);
    Ok(())
}

fn to_input_set(pairs: Vec<(String, f64)>) -> InputSet {
    pairs.into_iter().collect()
}

pub fn list(service: &ModelService) -> Result<()> {
    print_json(&service.list_scenarios())
}

pub fn schema(service: &ModelService) -> Result<()> {
    print_json(service.get_schema())
}

pub fn run(service: &mut ModelService, args: RunArgs) -> Result<()> {
    let overrides = to_input_set(args.overrides);
    let result = service.run_scenario(&args.name, &overrides)?;
    print_json(&result)
}

pub fn compare(service: &mut ModelService, args: CompareArgs) -> Result<()> {
    let metrics = (!args.metrics.is_empty()).then_some(args.metrics);
    let comparison = service.compare_scenarios(
        &args.scenario_a,
        &args.scenario_b,
        &to_input_set(args.overrides_a),
        &to_input_set(args.overrides_b),
        metrics.as_deref(),
    )?;
    print_json(&comparison)
}

pub fn override_input(service: &mut ModelService, args: OverrideArgs) -> Result<()> {
    let ack = service.override_input(&args.field, args.value);
    if service.get_schema().input(&args.field).is_none() {
        eprintln!(
            "{}",
            format!("'{}' is not a schema input; it will be passed through unchanged", args.field).yellow()
        );
    }
    eprintln!("{}", ack.message.green());
    print_json(service.active_overrides())
}

pub fn reset(service: &mut ModelService) -> Result<()> {
    let ack = service.reset_overrides();
    println!("{}", ack.message);
    Ok(())
}
