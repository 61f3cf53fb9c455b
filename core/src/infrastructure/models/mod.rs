// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Bundled Models
//!
//! Repository/runner wiring for the models shipped with the library, selected
//! by [`ModelKind`] from configuration.

pub mod bond_portfolio;
pub mod stub;

use std::sync::Arc;

use crate::application::model_service::ModelService;
use crate::domain::repository::RepositoryError;

pub use crate::domain::config::ModelKind;

/// Wire a fresh service (empty session state) for a bundled model.
pub fn build_service(kind: ModelKind) -> Result<ModelService, RepositoryError> {
    let service = match kind {
        ModelKind::BondPortfolio => ModelService::new(
            Arc::new(bond_portfolio::build_repository()?),
            Arc::new(bond_portfolio::build_runner()),
        ),
        ModelKind::Stub => ModelService::new(
            Arc::new(stub::build_repository()?),
            Arc::new(stub::build_runner()),
        ),
    };
    tracing::debug!(model = %kind, "Model service wired");
    Ok(service)
}
