//! Network-serving mode
//!
//! `GET /` reports that the server is up; `POST /mcp` accepts one JSON-RPC
//! message per request and answers with its response.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::error::{JiraMcpError, McpError, Result};
use crate::mcp::server::McpServer;
use crate::mcp::types::{JsonRpcError, JsonRpcResponse};

/// Build the HTTP router
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/mcp", post(mcp_message))
        .with_state(server)
}

/// Serve until the process is stopped
pub async fn serve(server: Arc<McpServer>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        JiraMcpError::Mcp(McpError::TransportError {
            message: format!("Failed to bind {}: {}", addr, e),
        })
    })?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router(server)).await.map_err(|e| {
        JiraMcpError::Mcp(McpError::TransportError {
            message: e.to_string(),
        })
    })
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({"message": "Jira MCP Server", "status": "running"}))
}

async fn mcp_message(State(server): State<Arc<McpServer>>, body: String) -> Response {
    match server.handle_message(&body).await {
        Ok(Some(response)) => Json(response).into_response(),
        Ok(None) => StatusCode::ACCEPTED.into_response(),
        Err(e) => {
            tracing::error!("Error handling message: {}", e);
            let response = JsonRpcResponse::error(None, JsonRpcError::internal_error(e.to_string()));
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}
