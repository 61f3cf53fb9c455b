// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Scenario runner backed by a plain Rust function or closure.

use crate::domain::model::{InputSet, OutputSet};
use crate::domain::repository::{RunnerError, ScenarioRunner};

pub type ModelFn = dyn Fn(&InputSet) -> Result<OutputSet, RunnerError> + Send + Sync;

pub struct FunctionalScenarioRunner {
    model: Box<ModelFn>,
}

impl FunctionalScenarioRunner {
    pub fn new<F>(model: F) -> Self
    where
        F: Fn(&InputSet) -> Result<OutputSet, RunnerError> + Send + Sync + 'static,
    {
        Self {
            model: Box::new(model),
        }
    }
}

impl ScenarioRunner for FunctionalScenarioRunner {
    fn execute(&self, inputs: &InputSet) -> Result<OutputSet, RunnerError> {
        (self.model)(inputs)
    }
}

/// Fetch a required input, failing with [`RunnerError::MissingInput`].
pub fn require(inputs: &InputSet, field: &str) -> Result<f64, RunnerError> {
    inputs
        .get(field)
        .ok_or_else(|| RunnerError::MissingInput(field.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_propagates_model_errors() {
        let runner = FunctionalScenarioRunner::new(|inputs| {
            let x = require(inputs, "x")?;
            if x < 0.0 {
                return Err(RunnerError::ModelExecution("negative x".to_string()));
            }
            Ok(OutputSet::from([("double", x * 2.0)]))
        });

        let ok = runner.execute(&InputSet::from([("x", 2.0)])).unwrap();
        assert_eq!(ok.get("double"), Some(4.0));

        assert_eq!(
            runner.execute(&InputSet::new()),
            Err(RunnerError::MissingInput("x".to_string()))
        );
        assert_eq!(
            runner.execute(&InputSet::from([("x", -1.0)])),
            Err(RunnerError::ModelExecution("negative x".to_string()))
        );
    }
}
