// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod model_service;
pub mod tool_dispatcher;
