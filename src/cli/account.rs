use crate::api::ApiClient;
use crate::core::config::AppConfig;
use crate::core::session::Session;
use anyhow::{Context, Result};
use console::style;

fn prompt_password(prompt: &str) -> Result<String> {
    let term = console::Term::stdout();
    term.write_str(prompt)
        .context("Failed to write to terminal")?;
    term.read_secure_line().context("Failed to read password")
}

pub async fn register(config: &AppConfig, username: &str, email: &str) -> Result<()> {
    let password = prompt_password("Choose a password: ")?;
    let api = ApiClient::new(&config.backend.base_url, None)?;
    let account = api.register(username, email, &password).await?;
    println!(
        "Account {} created with a starting budget of {:.2}. Log in with `papertrade login {}`.",
        style(&account.username).bold(),
        account.budget,
        account.username
    );
    Ok(())
}

pub async fn login(config: &AppConfig, username: &str) -> Result<()> {
    let password = prompt_password("Password: ")?;
    let api = ApiClient::new(&config.backend.base_url, None)?;
    let token = api.login(username, &password).await?;

    let session = Session {
        username: username.to_string(),
        token,
    };
    session.save(&config.session_path()?)?;
    println!("Logged in as {}.", style(username).bold());
    Ok(())
}

pub fn logout(config: &AppConfig) -> Result<()> {
    Session::clear(&config.session_path()?)?;
    println!("Logged out.");
    Ok(())
}

pub async fn budget(api: &ApiClient, amount: f64) -> Result<()> {
    let account = api.update_budget(amount).await?;
    println!(
        "Budget updated to {}.",
        style(format!("{:.2}", account.budget)).green().bold()
    );
    Ok(())
}

pub async fn reset(api: &ApiClient) -> Result<()> {
    let term = console::Term::stdout();
    term.write_str("This wipes all holdings and transactions and restores the starting budget. Type 'reset' to confirm: ")
        .context("Failed to write to terminal")?;
    let answer = term.read_line().context("Failed to read confirmation")?;
    if answer.trim() != "reset" {
        println!("Cancelled.");
        return Ok(());
    }

    let account = api.reset().await?;
    println!(
        "Account reset. Budget restored to {:.2}.",
        account.budget
    );
    Ok(())
}
