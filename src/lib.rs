pub mod api;
pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::core::config::AppConfig;
use crate::core::pricecache::PriceCache;
use crate::core::session::Session;
use crate::providers::eodhd::EodhdProvider;
use crate::store::disk::JsonFileStore;

pub enum AppCommand {
    Register { username: String, email: String },
    Login { username: String },
    Logout,
    Dashboard,
    Quote { query: String },
    Buy { ticker: String, quantity: u32 },
    Sell { ticker: String, quantity: u32 },
    Analysis,
    Advice,
    Budget { amount: f64 },
    Reset,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Paper trading terminal starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Register { username, email } => {
            cli::account::register(&config, &username, &email).await
        }
        AppCommand::Login { username } => cli::account::login(&config, &username).await,
        AppCommand::Logout => cli::account::logout(&config),
        AppCommand::Quote { query } => {
            let provider = EodhdProvider::new(&config.quotes.base_url, &config.quotes.api_token)?;
            cli::quote::run(&provider, &query).await
        }
        command => {
            // Everything below talks to the backend on the user's behalf.
            let session = Session::load(&config.session_path()?)?
                .context("Not logged in. Run `papertrade login <username>` first.")?;
            let api = ApiClient::new(&config.backend.base_url, Some(session.token.clone()))?;

            match command {
                AppCommand::Dashboard => cli::dashboard::run(&api).await,
                AppCommand::Buy { ticker, quantity } => {
                    let provider =
                        EodhdProvider::new(&config.quotes.base_url, &config.quotes.api_token)?;
                    cli::trade::buy(&api, &provider, &ticker, quantity).await
                }
                AppCommand::Sell { ticker, quantity } => {
                    let provider =
                        EodhdProvider::new(&config.quotes.base_url, &config.quotes.api_token)?;
                    cli::trade::sell(&api, &provider, &ticker, quantity).await
                }
                AppCommand::Analysis => {
                    let provider =
                        EodhdProvider::new(&config.quotes.base_url, &config.quotes.api_token)?;
                    let store =
                        JsonFileStore::new(config.price_cache_path(&session.username)?);
                    let cache = PriceCache::new(Arc::new(store), Arc::new(provider));
                    cli::analysis::run(&api, &cache).await
                }
                AppCommand::Advice => cli::advice::run(&api).await,
                AppCommand::Budget { amount } => cli::account::budget(&api, amount).await,
                AppCommand::Reset => cli::account::reset(&api).await,
                AppCommand::Register { .. }
                | AppCommand::Login { .. }
                | AppCommand::Logout
                | AppCommand::Quote { .. } => unreachable!("Handled above"),
            }
        }
    }
}
