use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod errors;
mod models;
mod server;

use crate::config::settings::Settings;
use crate::errors::RelayError;

#[derive(Parser)]
#[command(name = "jira-relay")]
#[command(version)]
#[command(about = "Greeter and comment-to-Jira ticket relay services", long_about = None)]
struct Cli {
    /// for debugging purposes
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.jira-relay/config.toml)
    #[arg(long = "config", global = true, env = "JIRA_RELAY_CONFIG")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the static greeting on /
    Greeter {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Serve POST /createjira, creating a Jira ticket for each /jira comment
    Relay {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Display current configuration (with masked secrets)
    Show,

    /// Set a specific configuration value
    Set {
        /// Configuration key (e.g., jira.email, jira.url, server.relay_port)
        key: String,
        /// New value
        value: String,
    },

    /// Check that the relay has everything it needs to start
    Validate,

    /// Get the path to the config file
    Path,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("\n{} {}", "Error:".red().bold(), e);
        if let Some(relay_err) = e.downcast_ref::<RelayError>() {
            let hints = relay_err.hints();
            if !hints.is_empty() {
                eprintln!("\n   To fix:");
                for (i, hint) in hints.iter().enumerate() {
                    eprintln!("   {}. {}", i + 1, hint.dimmed());
                }
            }
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "jira_relay=debug,tower_http=debug"
    } else {
        "jira_relay=info,tower_http=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_target(true)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Greeter { host, port } => handle_greeter(cli.config_file, host, port).await,
        Commands::Relay { host, port } => {
            handle_relay(&resolve_config_path(cli.config_file)?, host, port).await
        }
        Commands::Config { action } => {
            handle_config(&resolve_config_path(cli.config_file)?, action)
        }
    }
}

fn resolve_config_path(config_file: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match config_file {
        Some(path) => Ok(path),
        None => Settings::default_path(),
    }
}

/// The greeter only needs host and port, so any settings problem falls back to defaults.
fn greeter_settings(config_file: Option<PathBuf>) -> Settings {
    match resolve_config_path(config_file).and_then(|path| Settings::load(&path)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(
                event = "settings_fallback",
                error = %format!("{:#}", e),
                "Could not load settings, using defaults"
            );
            Settings::default()
        }
    }
}

async fn handle_greeter(
    config_file: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let settings = greeter_settings(config_file);
    let host = host.unwrap_or(settings.server.host);
    let port = port.unwrap_or(settings.server.greeter_port);

    tracing::info!(
        event = "application_starting",
        service = "greeter",
        version = env!("CARGO_PKG_VERSION"),
        "Starting greeter"
    );

    server::serve("greeter", &host, port, server::greeter_router()).await
}

async fn handle_relay(
    config_path: &std::path::Path,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let settings = Settings::load(config_path)?;
    let state = server::state::RelayState::from_settings(&settings)?;
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.relay_port);

    tracing::info!(
        event = "application_starting",
        service = "relay",
        version = env!("CARGO_PKG_VERSION"),
        jira_url = %settings.jira.url,
        project_key = %settings.jira.project_key,
        trigger = %settings.relay.trigger,
        "Starting ticket relay"
    );

    server::serve("relay", &host, port, server::relay_router(state)).await
}

fn handle_config(config_path: &std::path::Path, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = Settings::load(config_path)?;

            println!("{}", "Current Configuration".cyan().bold());
            println!();

            println!("{}", "[jira]".bold());
            println!("  {} {}", "url:".dimmed(), display_or_unset(&settings.jira.url));
            println!("  {} {}", "email:".dimmed(), display_or_unset(&settings.jira.email));
            let token = if settings.jira.api_token.is_empty() {
                "<unset>".red()
            } else {
                settings.jira.masked_token().yellow()
            };
            println!("  {} {}", "api_token:".dimmed(), token);
            println!("  {} {}", "project_key:".dimmed(), settings.jira.project_key.bright_white());
            println!("  {} {}", "issue_type_id:".dimmed(), settings.jira.issue_type_id.bright_white());
            println!("  {} {}", "timeout_secs:".dimmed(), settings.jira.timeout_secs.to_string().bright_white());

            println!();
            println!("{}", "[server]".bold());
            println!("  {} {}", "host:".dimmed(), settings.server.host.bright_white());
            println!("  {} {}", "greeter_port:".dimmed(), settings.server.greeter_port.to_string().bright_white());
            println!("  {} {}", "relay_port:".dimmed(), settings.server.relay_port.to_string().bright_white());

            println!();
            println!("{}", "[relay]".bold());
            println!("  {} {}", "trigger:".dimmed(), settings.relay.trigger.bright_white());

            Ok(())
        }

        ConfigAction::Set { key, value } => {
            // Read the file alone so environment overrides are not persisted.
            let mut settings = Settings::load_with(config_path, |_| None)?;
            settings.set(&key, &value)?;
            settings.save(config_path)?;

            let shown = if key.ends_with("token") { "********" } else { value.as_str() };
            println!("{}", format!("✓ Updated {} to: {}", key, shown).green().bold());
            println!();
            println!("{}", "Configuration saved successfully!".green());

            Ok(())
        }

        ConfigAction::Validate => {
            println!("{}", "Validating configuration...".cyan().bold());
            println!();

            let settings = Settings::load(config_path)?;
            settings.jira.validate()?;

            println!("{}", "✓ Relay configuration is complete".green().bold());
            Ok(())
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

fn display_or_unset(value: &str) -> ColoredString {
    if value.is_empty() {
        "<unset>".red()
    } else {
        value.bright_white()
    }
}
