//! Jira API module
//!
//! Contains types, the scratch directory, and the client for the Jira REST API.

pub mod client;
pub mod scratch;
pub mod types;
