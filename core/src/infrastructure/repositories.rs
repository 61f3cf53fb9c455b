// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementation of the [`ModelRepository`] contract defined
//! in the domain layer.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Hold a model's static schema and scenario catalog
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! The catalog is validated once at construction and is read-only afterwards,
//! so no locking is needed.

use indexmap::IndexMap;

use crate::domain::model::{InputSet, ModelSchema, ScenarioDefinition};
use crate::domain::repository::{ModelRepository, RepositoryError};

#[derive(Debug, Clone)]
pub struct InMemoryModelRepository {
    schema: ModelSchema,
    base_inputs: InputSet,
    scenarios: IndexMap<String, ScenarioDefinition>,
}

impl InMemoryModelRepository {
    /// Build a catalog.
    ///
    /// Fails when `base_inputs` lacks any schema input field or when two
    /// scenarios share a name. Scenario order is preserved.
    pub fn new(
        schema: ModelSchema,
        base_inputs: InputSet,
        scenarios: impl IntoIterator<Item = ScenarioDefinition>,
    ) -> Result<Self, RepositoryError> {
        let missing: Vec<String> = schema
            .input_names()
            .filter(|name| !base_inputs.contains(name))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(RepositoryError::IncompleteBaseInputs(missing));
        }

        let mut catalog = IndexMap::new();
        for scenario in scenarios {
            if catalog.contains_key(&scenario.name) {
                return Err(RepositoryError::DuplicateScenario(scenario.name));
            }
            catalog.insert(scenario.name.clone(), scenario);
        }

        Ok(Self {
            schema,
            base_inputs,
            scenarios: catalog,
        })
    }
}

impl ModelRepository for InMemoryModelRepository {
    fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    fn base_inputs(&self) -> &InputSet {
        &self.base_inputs
    }

    fn get_scenario(&self, name: &str) -> Result<&ScenarioDefinition, RepositoryError> {
        self.scenarios
            .get(name)
            .ok_or_else(|| RepositoryError::ScenarioNotFound {
                name: name.to_string(),
                available: self.scenarios.keys().cloned().collect(),
            })
    }

    fn list_scenarios(&self) -> Vec<&ScenarioDefinition> {
        self.scenarios.values().collect()
    }
}
