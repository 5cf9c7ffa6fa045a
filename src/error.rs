//! Error types for the Jira MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the Jira MCP Server
#[derive(Error, Debug)]
pub enum JiraMcpError {
    /// Jira API errors
    #[error("Jira API error: {0}")]
    Jira(#[from] JiraApiError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Jira API errors
#[derive(Error, Debug)]
pub enum JiraApiError {
    #[error("Issue not found: {issue_key}")]
    IssueNotFound { issue_key: String },

    #[error("Project not found: {project_key}")]
    ProjectNotFound { project_key: String },

    #[error("API request failed: {message}")]
    RequestFailed { message: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}")]
    MissingEnvVar { var: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid parameter: {name} - {message}")]
    InvalidParameter { name: String, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid tool arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Transport error: {message}")]
    TransportError { message: String },
}

/// Result type alias for Jira MCP operations
pub type Result<T> = std::result::Result<T, JiraMcpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::MissingEnvVar {
            var: "JIRA_URL".to_string(),
        };
        assert!(err.to_string().contains("JIRA_URL"));
    }

    #[test]
    fn test_error_conversion() {
        let err: JiraMcpError = ValidationError::MissingField {
            field: "issue_key".to_string(),
        }
        .into();
        assert!(matches!(err, JiraMcpError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation error: Missing required field: issue_key"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err: JiraMcpError = JiraApiError::IssueNotFound {
            issue_key: "DA-4".to_string(),
        }
        .into();
        assert!(err.to_string().contains("DA-4"));
    }
}
