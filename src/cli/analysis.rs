use super::ui;
use crate::api::ApiClient;
use crate::core::pricecache::PriceCache;
use crate::core::valuation::{ValuationResult, evaluate};
use anyhow::Result;
use comfy_table::Cell;

pub async fn run(api: &ApiClient, cache: &PriceCache) -> Result<()> {
    let account = api.dashboard().await?;

    let spinner = ui::new_spinner("Fetching live market data...");
    let prices = cache.resolve_prices(&account.holdings).await;
    spinner.finish_and_clear();

    match evaluate(&account.holdings, &account.transactions, &prices) {
        Some(valuation) => println!("{}", render(&valuation)),
        None => println!(
            "You have no holdings or transactions to analyze. \
             Buy your first stock with `papertrade buy`."
        ),
    }
    Ok(())
}

/// Renders the valuation as an overview block, a holdings table and the
/// top movers. Pure string assembly, kept separate from `run` for tests.
pub fn render(valuation: &ValuationResult) -> String {
    let mut output = format!(
        "{}\n\n",
        ui::style_text("Portfolio Overview", ui::StyleType::Title)
    );

    output.push_str(&format!(
        "Current Value: {}\nUnrealized P/L: {}\nRealized P/L: {}\nTotal P/L: {}\n",
        ui::style_text(
            &format!("{:.2}", valuation.total_current_value),
            ui::StyleType::TotalValue
        ),
        ui::signed_text(valuation.unrealized_pl),
        ui::signed_text(valuation.total_realized_pl),
        ui::signed_text(valuation.overall_pl),
    ));

    if !valuation.holdings.is_empty() {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Symbol"),
            ui::header_cell("Quantity"),
            ui::header_cell("Avg. Price"),
            ui::header_cell("Current Price"),
            ui::header_cell("Total Value"),
            ui::header_cell("Unrealized P/L"),
        ]);

        for holding in &valuation.holdings {
            table.add_row(vec![
                Cell::new(&holding.stock_ticker),
                Cell::new(holding.quantity.to_string())
                    .set_alignment(comfy_table::CellAlignment::Right),
                ui::money_cell(holding.average_purchase_price),
                ui::money_cell(holding.current_price),
                ui::money_cell(holding.current_value),
                ui::pl_cell(holding.profit_or_loss),
            ]);
        }

        output.push('\n');
        output.push_str(&table.to_string());
        output.push('\n');

        if let Some(best) = valuation.best_performer() {
            output.push_str(&format!(
                "\nBest Performer: {} ({})",
                best.stock_ticker,
                ui::signed_text(best.profit_or_loss)
            ));
        }
        if let Some(worst) = valuation.worst_performer() {
            output.push_str(&format!(
                "\nWorst Performer: {} ({})",
                worst.stock_ticker,
                ui::signed_text(worst.profit_or_loss)
            ));
        }
        output.push('\n');
    }

    output
}
