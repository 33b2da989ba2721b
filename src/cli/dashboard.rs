use super::ui;
use crate::api::ApiClient;
use crate::core::model::Account;
use anyhow::Result;
use comfy_table::Cell;

pub async fn run(api: &ApiClient) -> Result<()> {
    let account = api.dashboard().await?;
    println!("{}", render(&account));
    Ok(())
}

pub fn render(account: &Account) -> String {
    let mut output = format!(
        "Account: {}\nBudget: {}\n",
        ui::style_text(&account.username, ui::StyleType::Title),
        ui::style_text(&format!("{:.2}", account.budget), ui::StyleType::TotalValue),
    );

    output.push_str(&format!(
        "\n{}\n",
        ui::style_text("Holdings", ui::StyleType::TotalLabel)
    ));
    if account.holdings.is_empty() {
        output.push_str("Your portfolio is empty. Buy your first stock with `papertrade buy`.\n");
    } else {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Ticker"),
            ui::header_cell("Quantity"),
            ui::header_cell("Avg. Purchase Price"),
        ]);
        for holding in &account.holdings {
            table.add_row(vec![
                Cell::new(&holding.stock_ticker),
                Cell::new(holding.quantity.to_string())
                    .set_alignment(comfy_table::CellAlignment::Right),
                ui::money_cell(holding.average_purchase_price),
            ]);
        }
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output.push_str(&format!(
        "\n{}\n",
        ui::style_text("Transactions", ui::StyleType::TotalLabel)
    ));
    if account.transactions.is_empty() {
        output.push_str("No transactions yet.\n");
    } else {
        // Newest first for display, regardless of backend ordering.
        let mut transactions = account.transactions.clone();
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Time"),
            ui::header_cell("Type"),
            ui::header_cell("Ticker"),
            ui::header_cell("Quantity"),
            ui::header_cell("Price/Share"),
            ui::header_cell("P/L"),
        ]);
        for tx in &transactions {
            table.add_row(vec![
                Cell::new(tx.timestamp.format("%Y-%m-%d %H:%M").to_string()),
                Cell::new(tx.transaction_type.to_string()),
                Cell::new(&tx.stock_ticker),
                Cell::new(tx.quantity.to_string())
                    .set_alignment(comfy_table::CellAlignment::Right),
                ui::money_cell(tx.price_per_share),
                ui::format_optional_cell(tx.profit_or_loss, |pl| format!("{pl:+.2}")),
            ]);
        }
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Holding, Transaction, TransactionType};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_orders_transactions_newest_first() {
        let account = Account {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            budget: 100000.0,
            holdings: vec![Holding {
                stock_ticker: "X.NSE".to_string(),
                quantity: 10,
                average_purchase_price: 150.0,
            }],
            transactions: vec![
                Transaction {
                    stock_ticker: "OLD.NSE".to_string(),
                    transaction_type: TransactionType::Buy,
                    quantity: 1,
                    price_per_share: 10.0,
                    timestamp: Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap(),
                    profit_or_loss: Some(0.0),
                },
                Transaction {
                    stock_ticker: "NEW.NSE".to_string(),
                    transaction_type: TransactionType::Sell,
                    quantity: 1,
                    price_per_share: 20.0,
                    timestamp: Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 0).unwrap(),
                    profit_or_loss: Some(5.0),
                },
            ],
        };

        let rendered = render(&account);
        let newer = rendered.find("NEW.NSE").unwrap();
        let older = rendered.find("OLD.NSE").unwrap();
        assert!(newer < older);
        assert!(rendered.contains("alice"));
        assert!(rendered.contains("100000.00"));
    }

    #[test]
    fn test_render_empty_account() {
        let account = Account {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            budget: 100000.0,
            holdings: Vec::new(),
            transactions: Vec::new(),
        };

        let rendered = render(&account);
        assert!(rendered.contains("Your portfolio is empty"));
        assert!(rendered.contains("No transactions yet"));
    }
}
