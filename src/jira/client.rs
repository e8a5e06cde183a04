//! Jira REST client.
//!
//! A thin pass-through over the Jira REST API (apiVersion 2 and the
//! agile 1.0 board endpoints). Responses are relayed as raw JSON; Styre
//! does not model Jira's domain objects.

use crate::config::JiraSettings;
use crate::error::{Result, StyreError};
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

/// Timeout for Jira API requests.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the Jira REST API.
pub struct JiraClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    api_token: String,
}

impl JiraClient {
    /// Build a client from settings. Fails if host, username, or API
    /// token is missing from both the config and the environment.
    pub fn from_settings(settings: &JiraSettings) -> Result<Self> {
        let host = settings
            .host()
            .ok_or_else(|| StyreError::Config("jira.host is not set (JIRA_HOST)".to_string()))?;
        let username = settings.username().ok_or_else(|| {
            StyreError::Config("jira.username is not set (JIRA_USERNAME)".to_string())
        })?;
        let api_token = settings.api_token().ok_or_else(|| {
            StyreError::Config("jira.api_token is not set (JIRA_API_TOKEN)".to_string())
        })?;

        let base_url = Url::parse(&format!("https://{}/", host))
            .map_err(|e| StyreError::Config(format!("Invalid Jira host {}: {}", host, e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url,
            username,
            api_token,
        })
    }

    /// List all agile boards.
    pub async fn list_boards(&self) -> Result<Value> {
        self.get("rest/agile/1.0/board").await
    }

    /// List the issues on a board.
    pub async fn board_issues(&self, board_id: u64) -> Result<Value> {
        self.get(&format!("rest/agile/1.0/board/{}/issue", board_id))
            .await
    }

    /// Create a new issue.
    pub async fn create_issue(
        &self,
        project_id: &str,
        summary: &str,
        description: &str,
        issue_type: &str,
    ) -> Result<Value> {
        let body = issue_fields(project_id, summary, description, issue_type);
        self.post("rest/api/2/issue", &body).await
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let url = self.url(path)?;
        let response = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(&self.api_token))
            .send()
            .await?;
        Self::into_json(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path)?;
        let response = self
            .http
            .post(url)
            .basic_auth(&self.username, Some(&self.api_token))
            .json(body)
            .send()
            .await?;
        Self::into_json(response).await
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| StyreError::Internal(format!("Invalid Jira API path {}: {}", path, e)))
    }

    async fn into_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StyreError::Jira(format!(
                "{}: {}",
                status,
                truncate(&body, 500)
            )));
        }
        Ok(response.json().await?)
    }
}

/// Request body for issue creation.
fn issue_fields(project_id: &str, summary: &str, description: &str, issue_type: &str) -> Value {
    json!({
        "fields": {
            "project": {
                "id": project_id
            },
            "summary": summary,
            "description": description,
            "issuetype": {
                "name": issue_type
            }
        }
    })
}

/// Truncate text with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len])
    }
}
