//! Configuration settings for Styre.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub jira: JiraSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Root directory the filesystem tools resolve relative paths against.
    pub workspace_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            workspace_dir: ".".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind the HTTP transport to.
    pub host: String,
    /// Port to bind the HTTP transport to.
    pub port: u16,
    /// Origins allowed to reach the HTTP transport. Requests without an
    /// Origin header (non-browser clients) are always allowed.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl ServerSettings {
    /// Effective origin allow-list. The ALLOWED_ORIGINS environment
    /// variable (comma-separated) overrides the configured list.
    pub fn allowed_origins(&self) -> Vec<String> {
        match std::env::var("ALLOWED_ORIGINS") {
            Ok(list) if !list.trim().is_empty() => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => self.allowed_origins.clone(),
        }
    }
}

/// Jira connection settings. Every field falls back to its environment
/// variable so secrets can stay out of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct JiraSettings {
    /// Jira host, e.g. "mycompany.atlassian.net" (env: JIRA_HOST).
    pub host: Option<String>,
    /// Jira account username/email (env: JIRA_USERNAME).
    pub username: Option<String>,
    /// Jira API token (env: JIRA_API_TOKEN). Prefer the env variable.
    pub api_token: Option<String>,
}


impl JiraSettings {
    pub fn host(&self) -> Option<String> {
        self.host.clone().or_else(|| std::env::var("JIRA_HOST").ok())
    }

    pub fn username(&self) -> Option<String> {
        self.username
            .clone()
            .or_else(|| std::env::var("JIRA_USERNAME").ok())
    }

    pub fn api_token(&self) -> Option<String> {
        self.api_token
            .clone()
            .or_else(|| std::env::var("JIRA_API_TOKEN").ok())
    }

    /// Whether enough configuration is present to build a client.
    pub fn is_configured(&self) -> bool {
        self.host().is_some() && self.username().is_some() && self.api_token().is_some()
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::StyreError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("styre")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded workspace directory path.
    pub fn workspace_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.workspace_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.allowed_origins.len(), 2);
        assert_eq!(settings.general.workspace_dir, ".");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [server]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.general.log_level, "info");
    }

    #[test]
    fn test_jira_settings_from_toml() {
        let settings: Settings = toml::from_str(
            r#"
            [jira]
            host = "example.atlassian.net"
            username = "pm@example.com"
            "#,
        )
        .unwrap();
        assert_eq!(
            settings.jira.host.as_deref(),
            Some("example.atlassian.net")
        );
        assert!(settings.jira.api_token.is_none());
    }
}
