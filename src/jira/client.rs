//! Jira API client
//!
//! One method per tool. Every request uses basic auth with the configured
//! username and API token; requests within a call are issued sequentially.

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};

use crate::config::jira::{API_PREFIX, EPIC_NAME_FALLBACK_ID, EPIC_NAME_FIELD, NO_DESCRIPTION};
use crate::config::Config;
use crate::error::{JiraApiError, JiraMcpError, Result, ValidationError};
use crate::jira::scratch::{sanitize_filename, ScratchDir};
use crate::jira::types::*;

/// Jira API client
pub struct JiraClient {
    /// HTTP client
    http_client: reqwest::Client,

    /// Server configuration
    config: Config,

    /// Attachment staging directory
    scratch: ScratchDir,
}

impl JiraClient {
    /// Create a new Jira client
    pub fn new(config: Config) -> Self {
        let scratch = ScratchDir::new(config.scratch_dir.clone());
        Self {
            http_client: reqwest::Client::new(),
            config,
            scratch,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn api_url(&self, path: &str) -> Result<String> {
        Ok(format!("{}{}{}", self.config.base_url()?, API_PREFIX, path))
    }

    /// Attach basic auth to a request
    fn authed(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let (username, token) = self.config.credentials()?;
        Ok(request.basic_auth(username, Some(token)))
    }

    async fn get_json(&self, url: &str) -> Result<Response> {
        let request = self
            .authed(self.http_client.get(url))?
            .header("Accept", "application/json");
        Ok(request.send().await?)
    }

    // ==================== Issue Keys ====================

    /// Pick the explicit issue key or fall back to `ISSUE_KEY`
    ///
    /// Keys outside the configured project are allowed but logged.
    pub fn resolve_issue_key(&self, issue_key: Option<&str>) -> Result<String> {
        let issue_key = match issue_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => key.to_string(),
            None => {
                let key = self.config.default_issue_key.clone().ok_or_else(|| {
                    JiraMcpError::Validation(ValidationError::MissingField {
                        field: "issue_key".to_string(),
                    })
                })?;
                tracing::info!("No issue_key provided, using environment ISSUE_KEY: {}", key);
                key
            }
        };

        let project_key = self.config.project_key()?;
        if !issue_key.starts_with(&format!("{}-", project_key)) {
            tracing::warn!(
                "Issue key {} does not belong to configured project {}",
                issue_key,
                project_key
            );
        }

        Ok(issue_key)
    }

    // ==================== Fields ====================

    /// List all fields visible to the user
    pub async fn list_fields(&self) -> Result<Vec<Field>> {
        let url = self.api_url("/field")?;
        let response = self.get_json(&url).await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(request_failed("Failed to list fields", response).await)
        }
    }

    /// ID of the "Epic Name" custom field, or the Jira Cloud default
    pub async fn get_epic_name_field_id(&self) -> Result<String> {
        let fields = self.list_fields().await?;

        match fields.into_iter().find(|f| f.name == EPIC_NAME_FIELD) {
            Some(field) => Ok(field.id),
            None => {
                tracing::debug!(
                    "No {:?} field found, falling back to {}",
                    EPIC_NAME_FIELD,
                    EPIC_NAME_FALLBACK_ID
                );
                Ok(EPIC_NAME_FALLBACK_ID.to_string())
            }
        }
    }

    // ==================== Projects ====================

    /// Get a project by key
    pub async fn get_project(&self, project_key: &str) -> Result<Project> {
        let url = self.api_url(&format!("/project/{}", urlencoding::encode(project_key)))?;
        let response = self.get_json(&url).await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else if response.status() == StatusCode::NOT_FOUND {
            Err(JiraMcpError::Jira(JiraApiError::ProjectNotFound {
                project_key: project_key.to_string(),
            }))
        } else {
            Err(request_failed("Failed to get project", response).await)
        }
    }

    /// Summary of the configured project
    pub async fn get_project_info(&self) -> Result<ProjectInfo> {
        let project_key = self.config.project_key()?;
        let project = self.get_project(project_key).await?;

        Ok(ProjectInfo {
            project_key: project_key.to_string(),
            project_name: project.name,
            project_id: project.id,
            project_type: project.project_type_key,
            description: project
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        })
    }

    // ==================== Issues ====================

    /// Get an issue by key
    pub async fn get_issue(&self, issue_key: &str) -> Result<Issue> {
        let url = self.api_url(&format!("/issue/{}", urlencoding::encode(issue_key)))?;
        let response = self.get_json(&url).await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else if response.status() == StatusCode::NOT_FOUND {
            Err(JiraMcpError::Jira(JiraApiError::IssueNotFound {
                issue_key: issue_key.to_string(),
            }))
        } else {
            Err(request_failed("Failed to get issue", response).await)
        }
    }

    // ==================== Attachments ====================

    /// Download the bytes behind an attachment's content URL
    pub async fn fetch_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>> {
        let response = self.authed(self.http_client.get(&attachment.content))?.send().await?;

        if response.status().is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            let context = format!("Failed to download attachment {}", attachment.filename);
            Err(request_failed(&context, response).await)
        }
    }

    /// Save every attachment of an issue into the scratch directory
    pub async fn download_attachments(&self, issue_key: Option<&str>) -> Result<DownloadResult> {
        let issue_key = self.resolve_issue_key(issue_key)?;
        let issue = self.get_issue(&issue_key).await?;

        self.scratch.ensure().await?;

        let attachments = issue.fields.attachment;
        if attachments.is_empty() {
            tracing::info!("No attachments found for issue {}", issue_key);
            return Ok(DownloadResult {
                downloaded_files: Vec::new(),
                message: format!("No attachments found for issue {}", issue_key),
                issue_key: None,
                project_key: None,
            });
        }

        let mut saved_files = Vec::with_capacity(attachments.len());
        for attachment in &attachments {
            let bytes = self.fetch_attachment(attachment).await?;
            let path = self.scratch.write(&attachment.filename, &bytes).await?;
            tracing::debug!("Downloaded attachment: {}", path.display());
            saved_files.push(path.display().to_string());
        }

        Ok(DownloadResult {
            message: format!(
                "Successfully downloaded {} attachments from issue {}",
                saved_files.len(),
                issue_key
            ),
            downloaded_files: saved_files,
            project_key: Some(self.config.project_key()?.to_string()),
            issue_key: Some(issue_key),
        })
    }

    /// Upload a scratch-directory file to an issue
    pub async fn upload_attachment(
        &self,
        filename: &str,
        issue_key: Option<&str>,
    ) -> Result<UploadResult> {
        let issue_key = self.resolve_issue_key(issue_key)?;
        let filename = sanitize_filename(filename)?.to_string();
        let bytes = self.scratch.read(&filename).await?;

        let url = self.api_url(&format!(
            "/issue/{}/attachments",
            urlencoding::encode(&issue_key)
        ))?;
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.clone()));

        let response = self
            .authed(self.http_client.post(&url))?
            .header("X-Atlassian-Token", "no-check")
            .multipart(form)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(JiraMcpError::Jira(JiraApiError::IssueNotFound { issue_key }));
        }
        if !response.status().is_success() {
            return Err(request_failed("Failed to upload attachment", response).await);
        }

        tracing::debug!("Uploaded attachment: {} to {}", filename, issue_key);
        Ok(UploadResult {
            message: format!("Successfully uploaded {} to issue {}", filename, issue_key),
            uploaded_file: filename,
            project_key: self.config.project_key()?.to_string(),
            issue_key,
        })
    }

    /// List the scratch directory
    pub async fn list_tmp_files(&self) -> Result<ScratchListing> {
        self.scratch.list_files().await
    }
}

async fn request_failed(context: &str, response: Response) -> JiraMcpError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    JiraMcpError::Jira(JiraApiError::RequestFailed {
        message: format!("{} ({}): {}", context, status, text),
    })
}
