//! Profit/loss aggregation over holdings and transaction history.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::model::{Holding, Transaction, TransactionType};

/// A holding enriched with its resolved price and derived P/L figures.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingDetail {
    pub stock_ticker: String,
    pub quantity: u32,
    pub average_purchase_price: f64,
    pub current_price: f64,
    pub current_value: f64,
    pub profit_or_loss: f64,
}

/// Aggregate valuation of an account. Recomputed on every call, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationResult {
    pub total_current_value: f64,
    pub unrealized_pl: f64,
    pub total_realized_pl: f64,
    pub overall_pl: f64,
    /// Sorted by `profit_or_loss` descending. Ties keep input order.
    pub holdings: Vec<HoldingDetail>,
}

impl ValuationResult {
    pub fn best_performer(&self) -> Option<&HoldingDetail> {
        self.holdings.first()
    }

    /// The biggest loser. A portfolio with no losing position has no worst
    /// performer to report.
    pub fn worst_performer(&self) -> Option<&HoldingDetail> {
        self.holdings.last().filter(|h| h.profit_or_loss < 0.0)
    }
}

/// Computes the valuation of an account. Returns `None` when there are no
/// holdings and no transactions, so the caller can render an empty state
/// instead of a zeroed dashboard.
///
/// A ticker absent from `prices` falls back to its average purchase price,
/// consistent with the price cache's degraded-but-usable policy. The
/// function is pure; it performs no I/O and cannot fail on well-formed
/// input.
pub fn evaluate(
    holdings: &[Holding],
    transactions: &[Transaction],
    prices: &HashMap<String, f64>,
) -> Option<ValuationResult> {
    if holdings.is_empty() && transactions.is_empty() {
        return None;
    }

    let mut total_invested = 0.0;
    let mut total_current_value = 0.0;

    let mut detailed: Vec<HoldingDetail> = holdings
        .iter()
        .map(|holding| {
            let current_price = prices
                .get(&holding.stock_ticker)
                .copied()
                .unwrap_or(holding.average_purchase_price);
            let cost_basis = holding.average_purchase_price * f64::from(holding.quantity);
            let current_value = current_price * f64::from(holding.quantity);

            total_invested += cost_basis;
            total_current_value += current_value;

            HoldingDetail {
                stock_ticker: holding.stock_ticker.clone(),
                quantity: holding.quantity,
                average_purchase_price: holding.average_purchase_price,
                current_price,
                current_value,
                profit_or_loss: current_value - cost_basis,
            }
        })
        .collect();

    let unrealized_pl = total_current_value - total_invested;

    // SELL transactions without a recorded P/L are skipped, not treated as zero.
    let total_realized_pl: f64 = transactions
        .iter()
        .filter(|tx| tx.transaction_type == TransactionType::Sell)
        .filter_map(|tx| tx.profit_or_loss)
        .sum();

    detailed.sort_by(|a, b| {
        b.profit_or_loss
            .partial_cmp(&a.profit_or_loss)
            .unwrap_or(Ordering::Equal)
    });

    Some(ValuationResult {
        total_current_value,
        unrealized_pl,
        total_realized_pl,
        overall_pl: unrealized_pl + total_realized_pl,
        holdings: detailed,
    })
}
