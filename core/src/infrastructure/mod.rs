// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod models;
pub mod repositories;
pub mod runners;
