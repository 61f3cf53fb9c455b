// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! `explicator mcp`: serve the configured model to an AI assistant over stdio.

use anyhow::{Context, Result};
use tracing::info;

use explicator_core::domain::config::ExplicatorConfig;
use explicator_core::presentation::mcp::McpServer;

use super::build_service;

pub async fn serve(config: &ExplicatorConfig) -> Result<()> {
    let service = build_service(config)?;
    info!(
        model = %service.get_schema().name,
        server = %config.mcp.server_name,
        "Starting MCP server"
    );

    let mut server = McpServer::new(config.mcp.clone(), service);
    server
        .serve_stdio()
        .await
        .context("MCP server terminated with an error")
}
