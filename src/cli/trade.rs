use super::ui;
use crate::api::ApiClient;
use crate::core::quote::{QuoteProvider, best_match};
use anyhow::{Context, Result, anyhow, bail};
use console::style;

/// Resolves a user-supplied ticker to a full `<CODE>.<EXCHANGE>` symbol,
/// searching when no exchange suffix was given.
async fn resolve_symbol(provider: &dyn QuoteProvider, ticker: &str) -> Result<String> {
    if ticker.contains('.') {
        return Ok(ticker.to_uppercase());
    }
    let matches = provider.search(ticker).await?;
    best_match(&matches)
        .map(|m| m.symbol())
        .ok_or_else(|| anyhow!("No stocks found for \"{ticker}\""))
}

fn confirm(prompt: &str) -> Result<bool> {
    let term = console::Term::stdout();
    term.write_str(&format!("{prompt} [y/N] "))
        .context("Failed to write to terminal")?;
    let answer = term.read_line().context("Failed to read confirmation")?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

pub async fn buy(
    api: &ApiClient,
    provider: &dyn QuoteProvider,
    ticker: &str,
    quantity: u32,
) -> Result<()> {
    if quantity == 0 {
        bail!("Quantity must be positive");
    }
    let symbol = resolve_symbol(provider, ticker).await?;

    let spinner = ui::new_spinner("Fetching live price...");
    let quote = provider.fetch_quote(&symbol).await;
    spinner.finish_and_clear();
    let quote = quote.with_context(|| format!("Could not fetch live price for {symbol}"))?;

    let total = quote.price * f64::from(quantity);
    println!(
        "Market price for {}: {:.2} (total for {} share(s): {:.2})",
        symbol, quote.price, quantity, total
    );
    if !confirm("Place buy order?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let account = api.buy(&symbol, quantity, quote.price).await?;
    println!(
        "Bought {} share(s) of {}. Remaining budget: {}",
        quantity,
        symbol,
        style(format!("{:.2}", account.budget)).green().bold()
    );
    Ok(())
}

pub async fn sell(
    api: &ApiClient,
    provider: &dyn QuoteProvider,
    ticker: &str,
    quantity: u32,
) -> Result<()> {
    if quantity == 0 {
        bail!("Quantity must be positive");
    }
    let symbol = resolve_symbol(provider, ticker).await?;

    let spinner = ui::new_spinner("Fetching live price...");
    let quote = provider.fetch_quote(&symbol).await;
    spinner.finish_and_clear();
    let quote = quote.with_context(|| format!("Could not fetch live price for {symbol}"))?;

    let total = quote.price * f64::from(quantity);
    println!(
        "Market price for {}: {:.2} (proceeds for {} share(s): {:.2})",
        symbol, quote.price, quantity, total
    );
    if !confirm("Place sell order?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let receipt = api.sell(&symbol, quantity, quote.price).await?;
    println!(
        "Sold {} share(s) of {}. Realized P/L: {}",
        quantity,
        symbol,
        ui::signed_text(receipt.profit_or_loss)
    );
    if let Some(budget) = receipt.budget {
        println!(
            "New budget: {}",
            style(format!("{budget:.2}")).green().bold()
        );
    }
    Ok(())
}
