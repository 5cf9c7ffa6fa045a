//! Jira API type definitions
//!
//! Wire types mirror the Jira REST API v3 responses; result types are what
//! the tools hand back to the caller.

use serde::{Deserialize, Serialize};

/// An entry of `GET /rest/api/3/field`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Field ID, e.g. `customfield_10011`
    pub id: String,

    /// Display name
    pub name: String,
}

/// A Jira project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub key: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A Jira issue, reduced to what the attachment tools read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub key: String,

    #[serde(default)]
    pub fields: IssueFields,
}

/// Issue fields
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IssueFields {
    /// Attachments; absent or null when the field is hidden
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attachment: Vec<Attachment>,
}

/// Attachment metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub filename: String,

    /// Absolute URL of the attachment bytes
    pub content: String,

    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default)]
    pub mime_type: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Result of `get_project_info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub project_key: String,
    pub project_name: String,
    pub project_id: String,
    pub project_type: Option<String>,
    pub description: String,
}

/// Result of `download_attachments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadResult {
    pub downloaded_files: Vec<String>,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
}

/// Result of `upload_attachment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub uploaded_file: String,
    pub message: String,
    pub issue_key: String,
    pub project_key: String,
}

/// Result of `list_tmp_files`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScratchListing {
    pub files: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    pub message: String,
}
