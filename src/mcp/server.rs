//! MCP Server implementation
//!
//! Dispatches JSON-RPC messages to the tool handler. The stdio transport
//! lives here; the HTTP transport in [`crate::http`] reuses
//! [`McpServer::handle_message`].

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::Result;
use crate::jira::client::JiraClient;
use crate::mcp::tools::ToolHandler;
use crate::mcp::types::*;

/// MCP Server info
pub const SERVER_NAME: &str = "jira-mcp-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for Jira
pub struct McpServer {
    /// Tool handler
    tool_handler: ToolHandler,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(jira_client: Arc<JiraClient>) -> Self {
        Self {
            tool_handler: ToolHandler::new(jira_client),
        }
    }

    /// Run the server on stdio
    pub async fn run_stdio(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            match self.handle_message(&line).await {
                Ok(Some(response)) => {
                    let mut response_str = serde_json::to_string(&response)?;
                    response_str.push('\n');
                    stdout.write_all(response_str.as_bytes()).await?;
                    stdout.flush().await?;
                }
                Ok(None) => {
                    // Notification, no response needed
                }
                Err(e) => {
                    tracing::error!("Error handling message: {}", e);
                }
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle an incoming JSON-RPC message
    pub async fn handle_message(&self, message: &str) -> Result<Option<JsonRpcResponse>> {
        let value: Value = match serde_json::from_str(message) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Unparseable JSON-RPC message: {}", e);
                return Ok(Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(e.to_string()),
                )));
            }
        };

        let request: JsonRpcRequest = match JsonRpcRequest::deserialize(&value) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!("Invalid JSON-RPC request: {}", e);
                let id = value
                    .get("id")
                    .and_then(|id| RequestId::deserialize(id).ok());
                return Ok(Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_request(e.to_string()),
                )));
            }
        };

        tracing::debug!("Received {}", request.method);

        let response = match request.method.as_str() {
            methods::INITIALIZE => {
                JsonRpcResponse::success(request.id.clone(), self.handle_initialize()?)
            }
            methods::INITIALIZED => {
                tracing::info!("Client initialized");
                return Ok(None);
            }
            methods::PING => JsonRpcResponse::success(request.id.clone(), serde_json::json!({})),
            methods::LIST_TOOLS => {
                JsonRpcResponse::success(request.id.clone(), self.handle_list_tools()?)
            }
            methods::CALL_TOOL => {
                let result = self.handle_call_tool(&request).await;
                JsonRpcResponse::success(request.id.clone(), result)
            }
            _ => JsonRpcResponse::error(
                request.id.clone(),
                JsonRpcError::method_not_found(&request.method),
            ),
        };

        if request.is_notification() {
            return Ok(None);
        }
        Ok(Some(response))
    }

    fn handle_initialize(&self) -> Result<Value> {
        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {}),
            },
        };

        Ok(serde_json::to_value(result)?)
    }

    fn handle_list_tools(&self) -> Result<Value> {
        let result = ListToolsResult {
            tools: self.tool_handler.list_tools(),
        };

        Ok(serde_json::to_value(result)?)
    }

    async fn handle_call_tool(&self, request: &JsonRpcRequest) -> Value {
        let result = match request.params.as_ref() {
            Some(p) => match serde_json::from_value::<CallToolParams>(p.clone()) {
                Ok(params) => self.tool_handler.call_tool(&params.name, params.arguments).await,
                Err(e) => CallToolResult::error(format!("Invalid tool parameters: {}", e)),
            },
            None => CallToolResult::error("Missing tool parameters"),
        };

        serde_json::to_value(result).unwrap_or_else(|e| {
            serde_json::json!({
                "content": [{"type": "text", "text": format!("Error: {}", e)}],
                "isError": true
            })
        })
    }
}
