// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Collaborator Interfaces
//!
//! Contracts for the two collaborators the model service consumes:
//!
//! | Trait | Responsibility | Implementations |
//! |-------|----------------|-----------------|
//! | `ModelRepository` | Schema, base inputs and scenario catalog (read-only) | `InMemoryModelRepository` |
//! | `ScenarioRunner` | Executes the black-box model on a resolved input set | `FunctionalScenarioRunner` |
//!
//! Interfaces are defined in the domain layer and implemented in
//! `crate::infrastructure`, so alternative catalogs or model backends plug in
//! without touching the service.

use crate::domain::model::{InputSet, ModelSchema, OutputSet, ScenarioDefinition};

/// Read-only access to a model's schema and scenario catalog
pub trait ModelRepository: Send + Sync {
    /// The fixed model schema
    fn schema(&self) -> &ModelSchema;

    /// Complete default inputs; contains every schema input field
    fn base_inputs(&self) -> &InputSet;

    /// Look up a scenario by name
    fn get_scenario(&self, name: &str) -> Result<&ScenarioDefinition, RepositoryError>;

    /// All scenarios in catalog insertion order
    fn list_scenarios(&self) -> Vec<&ScenarioDefinition>;
}

/// Executes the model function against a fully resolved input set
pub trait ScenarioRunner: Send + Sync {
    fn execute(&self, inputs: &InputSet) -> Result<OutputSet, RunnerError>;
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    #[error("Unknown scenario '{name}'. Available: {}", .available.join(", "))]
    ScenarioNotFound { name: String, available: Vec<String> },

    #[error("Duplicate scenario name: {0}")]
    DuplicateScenario(String),

    #[error("Base inputs missing schema fields: {}", .0.join(", "))]
    IncompleteBaseInputs(Vec<String>),
}

/// Errors raised by the model function itself
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunnerError {
    #[error("Model execution failed: {0}")]
    ModelExecution(String),

    #[error("Model input missing: {0}")]
    MissingInput(String),
}
