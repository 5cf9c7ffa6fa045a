//! Configuration management for the Jira MCP Server
//!
//! Reads Jira credentials, the configured project, and local paths from
//! environment variables. Loading never fails: unset values are reported by
//! the operation that needs them.

use std::path::PathBuf;

use crate::error::{ConfigError, JiraMcpError, Result};

/// Environment variable names
pub mod env {
    pub const JIRA_URL: &str = "JIRA_URL";
    pub const JIRA_USERNAME: &str = "JIRA_USERNAME";
    pub const JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
    pub const PROJECT_KEY: &str = "PROJECT_KEY";
    pub const ISSUE_KEY: &str = "ISSUE_KEY";
    pub const SCRATCH_DIR: &str = "JIRA_SCRATCH_DIR";
    pub const PORT: &str = "PORT";
}

/// Default scratch directory, relative to the working directory
pub const DEFAULT_SCRATCH_DIR: &str = "tmp";

/// Default listen port for network-serving mode
pub const DEFAULT_PORT: u16 = 8000;

/// Configuration for the Jira MCP Server
#[derive(Clone)]
pub struct Config {
    /// Jira site base URL, without trailing slash
    pub jira_url: Option<String>,

    /// Atlassian account used for basic auth
    pub username: Option<String>,

    /// API token used for basic auth
    pub api_token: Option<String>,

    /// Configured project key
    pub project_key: Option<String>,

    /// Issue used when a tool call omits `issue_key`
    pub default_issue_key: Option<String>,

    /// Directory holding downloaded and to-be-uploaded attachments
    pub scratch_dir: PathBuf,

    /// Listen port for network-serving mode
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match non_empty(env::PORT) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid {} value {:?}", env::PORT, raw);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            jira_url: non_empty(env::JIRA_URL).map(|u| u.trim().trim_end_matches('/').to_string()),
            username: non_empty(env::JIRA_USERNAME),
            api_token: non_empty(env::JIRA_API_TOKEN),
            project_key: non_empty(env::PROJECT_KEY).map(|k| k.trim().to_string()),
            default_issue_key: non_empty(env::ISSUE_KEY).map(|k| k.trim().to_string()),
            scratch_dir: non_empty(env::SCRATCH_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRATCH_DIR)),
            port,
        }
    }

    /// Names of Jira variables that are not set
    pub fn missing_vars(&self) -> Vec<&'static str> {
        [
            (env::JIRA_URL, self.jira_url.is_none()),
            (env::JIRA_USERNAME, self.username.is_none()),
            (env::JIRA_API_TOKEN, self.api_token.is_none()),
            (env::PROJECT_KEY, self.project_key.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }

    /// Jira base URL
    pub fn base_url(&self) -> Result<&str> {
        let url = require(self.jira_url.as_deref(), env::JIRA_URL)?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(JiraMcpError::Config(ConfigError::InvalidConfig {
                message: format!("{} must start with http:// or https://, got {}", env::JIRA_URL, url),
            }));
        }
        Ok(url)
    }

    /// Basic-auth username and API token
    pub fn credentials(&self) -> Result<(&str, &str)> {
        Ok((
            require(self.username.as_deref(), env::JIRA_USERNAME)?,
            require(self.api_token.as_deref(), env::JIRA_API_TOKEN)?,
        ))
    }

    /// Configured project key
    pub fn project_key(&self) -> Result<&str> {
        require(self.project_key.as_deref(), env::PROJECT_KEY)
    }
}

fn require<'a>(value: Option<&'a str>, var: &str) -> Result<&'a str> {
    value.ok_or_else(|| {
        JiraMcpError::Config(ConfigError::MissingEnvVar {
            var: var.to_string(),
        })
    })
}

// Hand-written so the API token never reaches the logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jira_url", &self.jira_url)
            .field("username", &self.username)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("project_key", &self.project_key)
            .field("default_issue_key", &self.default_issue_key)
            .field("scratch_dir", &self.scratch_dir)
            .field("port", &self.port)
            .finish()
    }
}

/// Jira REST API constants
pub mod jira {
    /// REST API v3 path prefix
    pub const API_PREFIX: &str = "/rest/api/3";

    /// Field name searched for by the epic lookup
    pub const EPIC_NAME_FIELD: &str = "Epic Name";

    /// Field id returned when no "Epic Name" field exists
    pub const EPIC_NAME_FALLBACK_ID: &str = "customfield_10011";

    /// Project description used when Jira returns none
    pub const NO_DESCRIPTION: &str = "No description available";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.scratch_dir, PathBuf::from("tmp"));
        assert_eq!(config.port, 8000);
        assert_eq!(config.missing_vars().len(), 4);
    }

    #[test]
    fn test_full_config() {
        let config = config_from(&[
            ("JIRA_URL", "https://example.atlassian.net/"),
            ("JIRA_USERNAME", "bot@example.com"),
            ("JIRA_API_TOKEN", "secret"),
            ("PROJECT_KEY", "DA"),
            ("ISSUE_KEY", "DA-4"),
            ("JIRA_SCRATCH_DIR", "/var/tmp/jira"),
            ("PORT", "9090"),
        ]);

        assert_eq!(config.base_url().unwrap(), "https://example.atlassian.net");
        assert_eq!(config.credentials().unwrap(), ("bot@example.com", "secret"));
        assert_eq!(config.project_key().unwrap(), "DA");
        assert_eq!(config.default_issue_key.as_deref(), Some("DA-4"));
        assert_eq!(config.scratch_dir, PathBuf::from("/var/tmp/jira"));
        assert_eq!(config.port, 9090);
        assert!(config.missing_vars().is_empty());
    }

    #[test]
    fn test_missing_var_error() {
        let config = config_from(&[("JIRA_URL", "https://example.atlassian.net")]);
        let err = config.credentials().unwrap_err();
        assert!(err.to_string().contains("JIRA_USERNAME"));
        assert_eq!(
            config.missing_vars(),
            vec!["JIRA_USERNAME", "JIRA_API_TOKEN", "PROJECT_KEY"]
        );
    }

    #[test]
    fn test_blank_values_are_missing() {
        let config = config_from(&[("PROJECT_KEY", "  "), ("PORT", "not-a-port")]);
        assert!(config.project_key().is_err());
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_invalid_base_url() {
        let config = config_from(&[("JIRA_URL", "example.atlassian.net")]);
        assert!(matches!(
            config.base_url(),
            Err(JiraMcpError::Config(ConfigError::InvalidConfig { .. }))
        ));
    }

    #[test]
    fn test_debug_hides_token() {
        let config = config_from(&[("JIRA_API_TOKEN", "super-secret")]);
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
    }
}
