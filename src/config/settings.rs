use crate::errors::RelayError;
use anyhow::{Context, Result};
use ::config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROJECT_KEY: &str = "AB";
pub const DEFAULT_ISSUE_TYPE_ID: &str = "10006";
pub const DEFAULT_TRIGGER: &str = "/jira";

/// Environment variables that override file values, and the key each one sets.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("URL", "jira.url"),
    ("EMAIL", "jira.email"),
    ("API_TOKEN", "jira.api_token"),
    ("PROJECT_KEY", "jira.project_key"),
    ("ISSUE_TYPE_ID", "jira.issue_type_id"),
];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub jira: JiraConfig,
    pub server: ServerConfig,
    pub relay: RelayConfig,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct JiraConfig {
    /// Full create-issue endpoint, e.g. `https://example.atlassian.net/rest/api/3/issue`.
    pub url: String,
    pub email: String,
    pub api_token: String,
    pub project_key: String,
    pub issue_type_id: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub greeter_port: u16,
    pub relay_port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    /// Comment body that must match exactly for a ticket to be created.
    pub trigger: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jira: JiraConfig {
                url: String::new(),
                email: String::new(),
                api_token: String::new(),
                project_key: DEFAULT_PROJECT_KEY.to_string(),
                issue_type_id: DEFAULT_ISSUE_TYPE_ID.to_string(),
                timeout_secs: 30,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                greeter_port: 5000,
                relay_port: 8080,
            },
            relay: RelayConfig {
                trigger: DEFAULT_TRIGGER.to_string(),
            },
        }
    }
}

impl Settings {
    /// Loads defaults, then the optional TOML file, then the process environment.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    pub fn load_with<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            );

        for (var, key) in ENV_OVERRIDES {
            let value = lookup(var).filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        let settings = builder
            .build()
            .with_context(|| format!("Failed to read config file {}", path.display()))?
            .try_deserialize::<Settings>()
            .context("Failed to parse configuration")?;

        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(path, config_str)
            .context("Failed to write config file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Sets a `section.field` key, e.g. `jira.email` or `server.relay_port`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let Some((section, field)) = key.split_once('.') else {
            anyhow::bail!("Invalid key format. Use format: section.field (e.g., jira.email)");
        };

        let parse_port = |value: &str| {
            value
                .parse::<u16>()
                .with_context(|| format!("'{}' is not a valid port", value))
        };

        match (section, field) {
            ("jira", "url") => self.jira.url = value.to_string(),
            ("jira", "email") => self.jira.email = value.to_string(),
            ("jira", "api_token") | ("jira", "token") => self.jira.api_token = value.to_string(),
            ("jira", "project_key") => self.jira.project_key = value.to_string(),
            ("jira", "issue_type_id") => self.jira.issue_type_id = value.to_string(),
            ("jira", "timeout_secs") => {
                self.jira.timeout_secs = value
                    .parse::<u64>()
                    .with_context(|| format!("'{}' is not a number of seconds", value))?
            }
            ("server", "host") => self.server.host = value.to_string(),
            ("server", "greeter_port") => self.server.greeter_port = parse_port(value)?,
            ("server", "relay_port") => self.server.relay_port = parse_port(value)?,
            ("relay", "trigger") => self.relay.trigger = value.to_string(),
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }

        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".jira-relay"))
    }
}

impl JiraConfig {
    /// Fails fast on anything the relay cannot run without.
    pub fn validate(&self) -> crate::errors::Result<()> {
        let missing: Vec<&'static str> = [
            ("URL", &self.url),
            ("EMAIL", &self.email),
            ("API_TOKEN", &self.api_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(RelayError::MissingConfig(missing));
        }

        let url = reqwest::Url::parse(&self.url)
            .map_err(|e| RelayError::ConfigInvalid(format!("URL '{}': {}", self.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RelayError::ConfigInvalid(format!(
                "URL '{}' must use http or https",
                self.url
            )));
        }

        if self.project_key.trim().is_empty() || self.issue_type_id.trim().is_empty() {
            return Err(RelayError::ConfigInvalid(
                "project_key and issue_type_id must not be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(RelayError::ConfigInvalid(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn masked_token(&self) -> String {
        let token = &self.api_token;
        if token.len() <= 8 || !token.is_ascii() {
            return "********".to_string();
        }
        format!("{}***{}", &token[..4], &token[token.len() - 4..])
    }
}

impl fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraConfig")
            .field("url", &self.url)
            .field("email", &self.email)
            .field("api_token", &self.masked_token())
            .field("project_key", &self.project_key)
            .field("issue_type_id", &self.issue_type_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
