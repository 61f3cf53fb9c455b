// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod config;
pub mod model;
pub mod overrides;
pub mod repository;
pub mod result;
