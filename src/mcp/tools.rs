//! MCP Tool definitions and handlers
//!
//! Defines all available tools and their implementations.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::McpError;
use crate::jira::client::JiraClient;
use crate::mcp::types::{CallToolResult, Tool};

/// Tool handler
pub struct ToolHandler {
    jira_client: Arc<JiraClient>,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(jira_client: Arc<JiraClient>) -> Self {
        Self { jira_client }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        vec![
            tool_def("get_epic_name_field_id", "Retrieve the custom field ID for the Epic Name field in Jira", empty_schema()),
            tool_def("get_project_info", "Get information about the configured project", empty_schema()),
            tool_def("download_attachments", "Download attachments from a Jira issue and save them to the scratch directory", download_attachments_schema()),
            tool_def("upload_attachment", "Upload a file from the scratch directory to a Jira issue", upload_attachment_schema()),
            tool_def("list_tmp_files", "List all files in the scratch directory", empty_schema()),
        ]
    }

    /// Call a tool by name
    pub async fn call_tool(&self, name: &str, args: Value) -> CallToolResult {
        tracing::debug!("Calling tool {}", name);
        match name {
            "get_epic_name_field_id" => self.handle_get_epic_name_field_id().await,
            "get_project_info" => self.handle_get_project_info().await,
            "download_attachments" => self.handle_download_attachments(args).await,
            "upload_attachment" => self.handle_upload_attachment(args).await,
            "list_tmp_files" => self.handle_list_tmp_files().await,
            _ => {
                tracing::warn!("Unknown tool requested: {}", name);
                CallToolResult::error(
                    McpError::UnknownTool {
                        name: name.to_string(),
                    }
                    .to_string(),
                )
            }
        }
    }

    // ==================== Tool Handlers ====================

    async fn handle_get_epic_name_field_id(&self) -> CallToolResult {
        match self.jira_client.get_epic_name_field_id().await {
            Ok(id) => CallToolResult::text(id),
            Err(e) => {
                tracing::error!("Error fetching Epic Name field ID: {}", e);
                CallToolResult::error(e.to_string())
            }
        }
    }

    async fn handle_get_project_info(&self) -> CallToolResult {
        match self.jira_client.get_project_info().await {
            Ok(info) => CallToolResult::json(&info),
            Err(e) => {
                tracing::error!(
                    "Error fetching project info for {}: {}",
                    self.configured_project(),
                    e
                );
                CallToolResult::error(e.to_string())
            }
        }
    }

    async fn handle_download_attachments(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            #[serde(default, alias = "issueKey")]
            issue_key: Option<String>,
        }

        let args: Args = match parse_args(args) {
            Ok(a) => a,
            Err(result) => return result,
        };

        match self
            .jira_client
            .download_attachments(args.issue_key.as_deref())
            .await
        {
            Ok(result) => CallToolResult::json(&result),
            Err(e) => {
                tracing::error!(
                    "Error downloading attachments for {}: {}",
                    self.issue_label(args.issue_key.as_deref()),
                    e
                );
                CallToolResult::error(e.to_string())
            }
        }
    }

    async fn handle_upload_attachment(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            filename: String,
            #[serde(default, alias = "issueKey")]
            issue_key: Option<String>,
        }

        let args: Args = match parse_args(args) {
            Ok(a) => a,
            Err(result) => return result,
        };

        match self
            .jira_client
            .upload_attachment(&args.filename, args.issue_key.as_deref())
            .await
        {
            Ok(result) => CallToolResult::json(&result),
            Err(e) => {
                tracing::error!(
                    "Error uploading {} to {}: {}",
                    args.filename,
                    self.issue_label(args.issue_key.as_deref()),
                    e
                );
                CallToolResult::error(e.to_string())
            }
        }
    }

    async fn handle_list_tmp_files(&self) -> CallToolResult {
        match self.jira_client.list_tmp_files().await {
            Ok(listing) => CallToolResult::json(&listing),
            Err(e) => {
                tracing::error!("Error listing tmp files: {}", e);
                CallToolResult::error(e.to_string())
            }
        }
    }

    fn configured_project(&self) -> &str {
        self.jira_client
            .config()
            .project_key
            .as_deref()
            .unwrap_or("<unset>")
    }

    /// Issue key for log lines, falling back to the configured default
    fn issue_label<'a>(&'a self, issue_key: Option<&'a str>) -> &'a str {
        issue_key
            .filter(|k| !k.trim().is_empty())
            .or(self.jira_client.config().default_issue_key.as_deref())
            .unwrap_or("<no issue>")
    }
}

fn parse_args<T: for<'de> Deserialize<'de>>(args: Value) -> Result<T, CallToolResult> {
    // Clients may send `null` or omit arguments for tools without required fields
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|e| {
        let err = McpError::InvalidArguments {
            message: e.to_string(),
        };
        tracing::warn!("{}", err);
        CallToolResult::error(err.to_string())
    })
}

// ==================== Schema Definitions ====================

fn tool_def(name: &str, description: &str, input_schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema,
    }
}

fn empty_schema() -> Value {
    json!({"type": "object", "properties": {}})
}

fn download_attachments_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "issue_key": {
                "type": "string",
                "description": "Key of the Jira issue, e.g. 'DA-4'. Defaults to ISSUE_KEY from the environment"
            }
        }
    })
}

fn upload_attachment_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "filename": {
                "type": "string",
                "description": "Name of the file in the scratch directory"
            },
            "issue_key": {
                "type": "string",
                "description": "Key of the Jira issue. Defaults to ISSUE_KEY from the environment"
            }
        },
        "required": ["filename"]
    })
}
