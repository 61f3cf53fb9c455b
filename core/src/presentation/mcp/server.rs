// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! MCP server: request routing and the newline-delimited stdio loop.
//!
//! One server owns one [`ToolDispatcher`] (and therefore one model service).
//! Messages are handled strictly one at a time, so session state is never
//! touched concurrently.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use super::error::{McpError, McpResult};
use super::prompts::{prompt_definitions, render_prompt};
use super::protocol::{
    methods, JsonRpcRequest, JsonRpcResponse, PromptGetParams, ResourceReadParams, ToolCallParams,
    JSONRPC_VERSION, PROTOCOL_VERSION,
};
use super::resources::{read_result, resource_definitions};
use crate::application::model_service::ModelService;
use crate::application::tool_dispatcher::{tool_definitions, ToolDispatcher};
use crate::domain::config::McpConfig;

pub struct McpServer {
    config: McpConfig,
    dispatcher: ToolDispatcher,
    initialized: bool,
}

impl McpServer {
    pub fn new(config: McpConfig, service: ModelService) -> Self {
        Self {
            config,
            dispatcher: ToolDispatcher::new(service),
            initialized: false,
        }
    }

    pub fn service(&self) -> &ModelService {
        self.dispatcher.service()
    }

    /// Whether the client has sent `notifications/initialized`
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Serve on the process's stdin/stdout until stdin closes.
    pub async fn serve_stdio(&mut self) -> McpResult<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Read one JSON-RPC message per line and write one response per line.
    pub async fn serve<R, W>(&mut self, reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(server = %self.config.server_name, "MCP server listening on stdio");
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_message(&line) {
                let mut payload = serde_json::to_vec(&response)?;
                payload.push(b'\n');
                writer.write_all(&payload).await?;
                writer.flush().await?;
            }
        }

        info!("stdin closed, MCP server stopping");
        Ok(())
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub fn handle_message(&mut self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Unparseable JSON-RPC message");
                return Some(JsonRpcResponse::failure(Value::Null, McpError::Parse(e).to_rpc_error()));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                let err = McpError::InvalidRequest(e.to_string());
                return Some(JsonRpcResponse::failure(id, err.to_rpc_error()));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            let err = McpError::InvalidRequest(format!("Unsupported jsonrpc version '{}'", request.jsonrpc));
            return Some(JsonRpcResponse::failure(id, err.to_rpc_error()));
        }

        if request.is_notification() {
            self.handle_notification(&request.method);
            return None;
        }

        debug!(method = %request.method, "Handling request");
        let response = match self.handle_request(&request.method, request.params) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                warn!(method = %request.method, error = %e, "Request failed");
                JsonRpcResponse::failure(id, e.to_rpc_error())
            }
        };
        Some(response)
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            methods::INITIALIZED => {
                self.initialized = true;
                info!("Client initialized");
            }
            methods::CANCELLED => debug!("Ignoring cancellation; requests complete synchronously"),
            other => debug!(method = %other, "Ignoring unknown notification"),
        }
    }

    fn handle_request(&mut self, method: &str, params: Option<Value>) -> McpResult<Value> {
        match method {
            methods::INITIALIZE => Ok(self.initialize(params)),
            methods::PING => Ok(json!({})),
            methods::TOOLS_LIST => Ok(json!({ "tools": tool_definitions() })),
            methods::TOOLS_CALL => {
                let params: ToolCallParams = parse_params(params)?;
                Ok(self.call_tool(params))
            }
            methods::RESOURCES_LIST => Ok(json!({ "resources": resource_definitions() })),
            methods::RESOURCES_READ => {
                let params: ResourceReadParams = parse_params(params)?;
                read_result(&params.uri, self.dispatcher.service())
            }
            methods::PROMPTS_LIST => Ok(json!({ "prompts": prompt_definitions() })),
            methods::PROMPTS_GET => {
                let params: PromptGetParams = parse_params(params)?;
                let args = params.arguments.unwrap_or_default();
                let text = render_prompt(&params.name, &args, self.dispatcher.service())?;
                Ok(json!({
                    "messages": [{
                        "role": "user",
                        "content": { "type": "text", "text": text }
                    }]
                }))
            }
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    fn initialize(&self, params: Option<Value>) -> Value {
        let protocol_version = params
            .as_ref()
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION)
            .to_string();
        let schema = self.dispatcher.service().get_schema();

        json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false },
                "prompts": { "listChanged": false }
            },
            "serverInfo": {
                "name": self.config.server_name,
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": format!(
                "Scenario tools for '{}'. Read model://schema before interpreting results.",
                schema.name
            )
        })
    }

    /// Tool failures are reported in-band with `isError`, not as JSON-RPC errors.
    fn call_tool(&mut self, params: ToolCallParams) -> Value {
        let arguments = params.arguments.unwrap_or_else(|| Value::Object(Map::new()));
        let (payload, is_error) = match self.dispatcher.try_dispatch(&params.name, arguments) {
            Ok(value) => (value, false),
            Err(e) => (json!({ "error": e.to_string() }), true),
        };
        let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());

        json!({
            "content": [{ "type": "text", "text": text }],
            "isError": is_error
        })
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> McpResult<T> {
    let params = params.unwrap_or_else(|| Value::Object(Map::new()));
    serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))
}
