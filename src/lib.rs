//! Jira MCP Server Library
//!
//! A Model Context Protocol (MCP) server for Jira integration.
//! Provides tools for project lookup and attachment transfer via the Jira REST API.

pub mod config;
pub mod error;
pub mod http;
pub mod jira;
pub mod mcp;

pub use config::Config;
pub use error::{JiraMcpError, Result};
