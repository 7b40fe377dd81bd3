use crate::config::settings::JiraConfig;
use crate::errors::{RelayError, Result};
use crate::models::ticket::CreateIssueRequest;
use anyhow::Context;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

#[derive(Clone)]
pub struct JiraClient {
    client: Client,
    url: String,
    email: String,
    api_token: String,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: config.url.clone(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// Issues exactly one POST to the configured endpoint and returns the decoded reply.
    pub async fn create_issue(&self, request: &CreateIssueRequest) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == 401 || status == 403 {
            return Err(RelayError::JiraAuthFailed(status.as_u16()));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RelayError::JiraApiError(status.as_u16(), text));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| RelayError::InvalidJiraResponse(e.to_string()))
    }
}
