// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Explicator Core
//!
//! Lets an AI assistant drive a scenario-driven numerical model through a
//! small, uniform set of operations: list scenarios, run one with ad-hoc
//! overrides, compare two, manage session overrides, describe the schema.
//!
//! # Architecture
//!
//! - **Domain:** data model, collaborator traits, override resolution, config
//! - **Application:** [`ModelService`](application::model_service::ModelService)
//!   and the provider-agnostic tool dispatcher
//! - **Infrastructure:** in-memory catalog, function-backed runner, bundled models
//! - **Presentation:** MCP stdio server
//!
//! ```no_run
//! use explicator_core::domain::model::InputSet;
//! use explicator_core::infrastructure::models::{build_service, ModelKind};
//!
//! let mut service = build_service(ModelKind::BondPortfolio)?;
//! service.override_input("yield_10y", 5.0);
//! let result = service.run_scenario("credit_stress", &InputSet::from([("credit_spread_ig", 2.5)]))?;
//! println!("{}", result.outputs.get("portfolio_nav").unwrap_or_default());
//! # Ok::<(), explicator_core::application::model_service::ServiceError>(())
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
