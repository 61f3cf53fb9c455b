// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! # MCP Server
//!
//! Model Context Protocol front end for AI assistants.
//!
//! ```text
//! AI assistant
//!      ↓ JSON-RPC 2.0, one message per line on stdin
//! McpServer ── tools/*     → ToolDispatcher → ModelService
//!           ── resources/* → schema, scenarios, latest results, overrides
//!           ── prompts/*   → templates over session state
//!      ↓ one response per line on stdout
//! ```
//!
//! Logs must go to stderr; stdout carries protocol traffic only.

pub mod error;
pub mod prompts;
pub mod protocol;
pub mod resources;
pub mod server;

pub use error::{McpError, McpResult};
pub use server::McpServer;
