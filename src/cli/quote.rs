use super::ui;
use crate::core::quote::{Quote, QuoteProvider, best_match};
use anyhow::{Result, bail};
use comfy_table::Cell;

pub async fn run(provider: &dyn QuoteProvider, query: &str) -> Result<()> {
    let matches = provider.search(query).await?;
    let Some(hit) = best_match(&matches) else {
        bail!("No stocks found for \"{query}\"");
    };

    let spinner = ui::new_spinner("Fetching live quote...");
    let quote = provider.fetch_quote(&hit.symbol()).await;
    spinner.finish_and_clear();

    let quote = quote?;
    println!("{}", render(&hit.name, &quote));
    Ok(())
}

pub fn render(name: &str, quote: &Quote) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Price"),
        ui::header_cell("Change"),
        ui::header_cell("Change (%)"),
        ui::header_cell("Volume"),
    ]);
    table.add_row(vec![
        Cell::new(&quote.symbol),
        ui::money_cell(quote.price),
        ui::format_optional_cell(quote.change, |c| format!("{c:+.2}")),
        ui::format_optional_cell(quote.change_pct, |c| format!("{c:+.2}%")),
        ui::format_optional_cell(quote.volume, |v| v.to_string()),
    ]);

    format!(
        "{}\n\n{}",
        ui::style_text(name, ui::StyleType::Title),
        table
    )
}
