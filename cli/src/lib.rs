// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Explicator CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Command handlers shared by the `explicator` binary

pub mod commands;
