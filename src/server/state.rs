use crate::api::jira::JiraClient;
use crate::config::settings::Settings;
use std::sync::Arc;

/// Read-only state shared by every relay request.
pub struct RelayState {
    pub jira: JiraClient,
    pub project_key: String,
    pub issue_type_id: String,
    pub trigger: String,
}

pub type SharedState = Arc<RelayState>;

impl RelayState {
    /// Validates the Jira settings before anything is served.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<SharedState> {
        settings.jira.validate()?;

        Ok(Arc::new(Self {
            jira: JiraClient::new(&settings.jira)?,
            project_key: settings.jira.project_key.clone(),
            issue_type_id: settings.jira.issue_type_id.clone(),
            trigger: settings.relay.trigger.clone(),
        }))
    }
}
