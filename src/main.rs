use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use papertrade::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for papertrade::AppCommand {
    fn from(cmd: Commands) -> papertrade::AppCommand {
        match cmd {
            Commands::Register { username, email } => {
                papertrade::AppCommand::Register { username, email }
            }
            Commands::Login { username } => papertrade::AppCommand::Login { username },
            Commands::Logout => papertrade::AppCommand::Logout,
            Commands::Dashboard => papertrade::AppCommand::Dashboard,
            Commands::Quote { query } => papertrade::AppCommand::Quote { query },
            Commands::Buy { ticker, quantity } => papertrade::AppCommand::Buy { ticker, quantity },
            Commands::Sell { ticker, quantity } => {
                papertrade::AppCommand::Sell { ticker, quantity }
            }
            Commands::Analysis => papertrade::AppCommand::Analysis,
            Commands::Advice => papertrade::AppCommand::Advice,
            Commands::Budget { amount } => papertrade::AppCommand::Budget { amount },
            Commands::Reset => papertrade::AppCommand::Reset,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Create a new account
    Register { username: String, email: String },
    /// Log in and store a session token
    Login { username: String },
    /// Forget the stored session
    Logout,
    /// Show budget, holdings and transaction history
    Dashboard,
    /// Search for a stock and show its live quote
    Quote { query: String },
    /// Buy shares at the live market price
    Buy { ticker: String, quantity: u32 },
    /// Sell shares at the live market price
    Sell { ticker: String, quantity: u32 },
    /// Portfolio valuation with live prices, fetched at most once per day
    Analysis,
    /// AI-generated portfolio commentary
    Advice,
    /// Set the virtual budget
    Budget { amount: f64 },
    /// Reset the account to its initial state
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => papertrade::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = papertrade::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
backend:
  base_url: "http://127.0.0.1:8000"

quotes:
  base_url: "https://eodhistoricaldata.com"
  api_token: ""
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
