use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    // Configuration errors
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // Jira errors
    #[error("Jira authentication failed ({0})")]
    JiraAuthFailed(u16),

    #[error("Jira API error ({0}): {1}")]
    JiraApiError(u16, String),

    #[error("Jira returned an unreadable response: {0}")]
    InvalidJiraResponse(String),

    // Network errors
    #[error("Network error: {0}")]
    NetworkError(String),
}

impl RelayError {
    /// HTTP status reported by Jira, when the failure came from a response.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            RelayError::JiraAuthFailed(status) | RelayError::JiraApiError(status, _) => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Steps an operator can take to fix the error, printed by the CLI.
    pub fn hints(&self) -> &'static [&'static str] {
        match self {
            RelayError::MissingConfig(_) => &[
                "Export URL, EMAIL and API_TOKEN before starting the relay",
                "Or set them in the config file: jira-relay config set jira.url <url>",
                "Check what is loaded: jira-relay config show",
            ],
            RelayError::ConfigInvalid(_) => &[
                "Check your config file: jira-relay config path",
                "URL must be the full create-issue endpoint, e.g. https://example.atlassian.net/rest/api/3/issue",
            ],
            RelayError::JiraAuthFailed(_) => &[
                "Generate a new token: https://id.atlassian.com/manage-profile/security/api-tokens",
                "Make sure EMAIL is the account that owns API_TOKEN",
            ],
            RelayError::NetworkError(_) => &[
                "Check that the relay host can reach the Jira URL",
                "Raise jira.timeout_secs if Jira is slow to answer",
            ],
            RelayError::JiraApiError(..) | RelayError::InvalidJiraResponse(_) => &[],
        }
    }
}

/// Only transport failures arrive here; `JiraClient` maps response statuses itself.
impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::NetworkError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_lists_every_name() {
        let err = RelayError::MissingConfig(vec!["URL", "API_TOKEN"]);
        assert_eq!(err.to_string(), "Missing required configuration: URL, API_TOKEN");
        assert!(!err.hints().is_empty());
    }

    #[test]
    fn test_upstream_status() {
        assert_eq!(RelayError::JiraAuthFailed(401).upstream_status(), Some(401));
        assert_eq!(
            RelayError::JiraApiError(500, "boom".to_string()).upstream_status(),
            Some(500)
        );
        assert_eq!(
            RelayError::NetworkError("refused".to_string()).upstream_status(),
            None
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = RelayError::JiraApiError(400, "summary is required".to_string());
        assert_eq!(err.to_string(), "Jira API error (400): summary is required");
    }
}
