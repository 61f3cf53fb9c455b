// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Placeholder model served when no real model is configured.

use crate::domain::model::{InputSet, ModelSchema, OutputField, OutputSet, ScenarioDefinition};
use crate::domain::repository::RepositoryError;
use crate::infrastructure::repositories::InMemoryModelRepository;
use crate::infrastructure::runners::FunctionalScenarioRunner;

pub fn schema() -> ModelSchema {
    ModelSchema {
        name: "Stub Model".to_string(),
        description: "No model configured. Select one with the `model` setting.".to_string(),
        inputs: vec![],
        outputs: vec![OutputField::new(
            "stub",
            "flag",
            "Always 1.0; marks output from the placeholder model.",
            "Carries no information.",
        )],
        assumptions: vec!["This is a stub.".to_string()],
        caveats: vec!["Not a real model.".to_string()],
    }
}

pub fn build_repository() -> Result<InMemoryModelRepository, RepositoryError> {
    InMemoryModelRepository::new(
        schema(),
        InputSet::new(),
        vec![ScenarioDefinition::new(
            "base",
            "Stub base case.",
            "No stress applied.",
            InputSet::new(),
        )],
    )
}

pub fn build_runner() -> FunctionalScenarioRunner {
    FunctionalScenarioRunner::new(|_| Ok(OutputSet::from([("stub", 1.0)])))
}
