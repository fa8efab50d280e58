//! Nala CLI - Voice assistant dashboard from the terminal
//!
//! Edit the assistant's prompt and model, save (provision) it, and toggle calls.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Password;

use api::{DashboardResponse, NalaClient, UpdateConfigRequest};
use config::Config;

#[derive(Parser)]
#[command(name = "nala")]
#[command(about = "Nala CLI - Voice assistant dashboard", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store session token
    Login {
        /// Session token (will prompt if not provided)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show current configuration
    Config,

    /// Show the dashboard state
    Show,

    /// Edit the configuration draft
    Edit {
        #[command(flatten)]
        fields: ConfigFields,
    },

    /// Provision the LLM and agent, then persist the configuration
    Save {
        #[command(flatten)]
        fields: ConfigFields,
    },

    /// Voice call operations
    Call {
        #[command(subcommand)]
        action: CallAction,
    },
}

#[derive(clap::Args)]
struct ConfigFields {
    /// Assistant instructions
    #[arg(short, long)]
    prompt: Option<String>,
    /// First thing the assistant says
    #[arg(short, long)]
    begin_message: Option<String>,
    /// Model: gpt-4o, gpt-3.5-turbo
    #[arg(short, long)]
    model: Option<String>,
}

impl From<ConfigFields> for UpdateConfigRequest {
    fn from(fields: ConfigFields) -> Self {
        Self {
            general_prompt: fields.prompt,
            begin_message: fields.begin_message,
            model: fields.model,
        }
    }
}

#[derive(Subcommand)]
enum CallAction {
    /// Start the call, or stop it if active
    Toggle,
    /// Show call status and the pending session
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { token } => cmd_login(token).await,
        Commands::Logout => cmd_logout().await,
        Commands::Config => cmd_config(),
        Commands::Show => cmd_show().await,
        Commands::Edit { fields } => cmd_edit(fields.into()).await,
        Commands::Save { fields } => cmd_save(fields.into()).await,
        Commands::Call { action } => cmd_call(action).await,
    }
}

fn client_from(config: &Config) -> Result<NalaClient> {
    let token = config
        .token
        .as_ref()
        .context("Not logged in. Run 'nala login' first.")?;
    Ok(NalaClient::new(&config.base_url, token))
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(token: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let token = match token {
        Some(t) => t,
        None => Password::new()
            .with_prompt("Session token")
            .interact()
            .context("Failed to read session token")?,
    };

    let client = NalaClient::new(&config.base_url, &token);
    print!("Verifying session... ");

    match client.dashboard().await {
        Ok(_) => println!("{}", "OK".green()),
        Err(e) => {
            println!("{}", "Failed".red());
            bail!("Could not sign in to Nala API: {}", e);
        }
    }

    config.set_token(token);
    config.save()?;

    println!("{} Token saved to {:?}", "✓".green(), Config::config_path()?);
    Ok(())
}

async fn cmd_logout() -> Result<()> {
    let mut config = Config::load()?;

    if let Ok(client) = client_from(&config) {
        if let Err(e) = client.sign_out().await {
            println!("{} Server sign-out failed: {}", "!".yellow(), e);
        }
    }

    config.clear_token();
    config.save()?;
    println!("{} Signed out", "✓".green());
    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  Token: {}",
        if config.token.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );

    Ok(())
}

async fn cmd_show() -> Result<()> {
    let config = Config::load()?;
    let dashboard = client_from(&config)?.dashboard().await?;
    print_dashboard(&dashboard);
    Ok(())
}

async fn cmd_edit(request: UpdateConfigRequest) -> Result<()> {
    if request.is_empty() {
        bail!("Nothing to edit. Pass --prompt, --begin-message or --model.");
    }

    let config = Config::load()?;
    let dashboard = client_from(&config)?.update_config(&request).await?;

    println!("{} Draft updated (run 'nala save' to apply)", "✓".green());
    print_dashboard(&dashboard);
    Ok(())
}

async fn cmd_save(request: UpdateConfigRequest) -> Result<()> {
    let config = Config::load()?;
    let client = client_from(&config)?;

    println!("{}", "Provisioning LLM and agent...".dimmed());
    let dashboard = client.save(&request).await?;

    print_dashboard(&dashboard);
    Ok(())
}

async fn cmd_call(action: CallAction) -> Result<()> {
    let config = Config::load()?;
    let client = client_from(&config)?;

    match action {
        CallAction::Toggle => {
            let toggled = client.toggle_call().await?;
            match toggled.outcome.as_str() {
                "started" => println!(
                    "{} Call started ({})",
                    "✓".green(),
                    toggled.call_id.as_deref().unwrap_or("-").cyan()
                ),
                "stopped" => println!("{} Call stopped", "✓".green()),
                _ => {
                    println!("{} No agent yet.", "!".yellow());
                    println!("  Run 'nala save' to provision one first.");
                }
            }
            println!("  Status: {}", status_colored(&toggled.call_status));
        }

        CallAction::Status => {
            let call = client.call_state().await?;
            println!("Status: {}", status_colored(&call.call_status));
            match call.session {
                Some(session) => println!(
                    "  Session: {} @ {} Hz",
                    session.call_id.cyan(),
                    session.sample_rate
                ),
                None => println!("  {}", "No pending session".dimmed()),
            }
        }
    }

    Ok(())
}

fn status_colored(status: &str) -> colored::ColoredString {
    match status {
        "active" => status.green(),
        "inactive" => status.yellow(),
        _ => status.dimmed(),
    }
}

fn print_dashboard(dashboard: &DashboardResponse) {
    let cfg = &dashboard.config;

    println!("{}", "Assistant:".bold());
    println!("  Model: {}", cfg.model.cyan());
    println!("  Prompt: {}", truncate_string(&cfg.general_prompt, 80));
    println!("  Begin message: {}", truncate_string(&cfg.begin_message, 80));
    println!(
        "  Agent: {}",
        cfg.agent_id.as_deref().unwrap_or("not provisioned").dimmed()
    );
    if let Some(llm_id) = &cfg.llm_id {
        println!("  LLM: {}", llm_id.dimmed());
    }
    println!("  Provisioning: {}", dashboard.provisioning.dimmed());
    println!("  Call: {}", status_colored(&dashboard.call_status));

    if let Some(notification) = &dashboard.notification {
        let title = if notification.level == "success" {
            notification.title.green()
        } else {
            notification.title.red()
        };
        match &notification.description {
            Some(description) => println!("\n{} {}", title, description.dimmed()),
            None => println!("\n{}", title),
        }
    }
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_edit_flags() {
        let cli = Cli::try_parse_from(["nala", "edit", "--model", "gpt-3.5-turbo", "-p", "Be brief."])
            .unwrap();

        match cli.command {
            Commands::Edit { fields } => {
                let request = UpdateConfigRequest::from(fields);
                assert_eq!(request.model.as_deref(), Some("gpt-3.5-turbo"));
                assert_eq!(request.general_prompt.as_deref(), Some("Be brief."));
                assert!(request.begin_message.is_none());
            }
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn test_cli_parses_call_toggle() {
        let cli = Cli::try_parse_from(["nala", "call", "toggle"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Call {
                action: CallAction::Toggle
            }
        ));
    }

    #[test]
    fn test_truncate_string_by_chars() {
        assert_eq!(truncate_string("héllo", 10), "héllo");
        assert_eq!(truncate_string("héllo wörld", 5), "héllo...");
    }
}
