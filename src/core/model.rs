//! Account domain types, mirroring the backend's wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A position in one ticker. A fully sold holding is removed by the backend,
/// never zeroed, so `quantity` is always positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub stock_ticker: String,
    pub quantity: u32,
    pub average_purchase_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Buy,
    Sell,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Buy => write!(f, "BUY"),
            TransactionType::Sell => write!(f, "SELL"),
        }
    }
}

/// An executed trade. Immutable once created by the backend.
/// `profit_or_loss` is only recorded for SELL transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub stock_ticker: String,
    pub transaction_type: TransactionType,
    pub quantity: u32,
    pub price_per_share: f64,
    pub timestamp: DateTime<Utc>,
    pub profit_or_loss: Option<f64>,
}

/// The dashboard snapshot returned by the backend for the logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub email: String,
    pub budget: f64,
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_deserialization() {
        let json = r#"{
            "id": 7,
            "username": "alice",
            "email": "alice@example.com",
            "budget": 98500.0,
            "holdings": [
                {"id": 1, "user_id": 7, "stock_ticker": "RELIANCE.NSE", "quantity": 10, "average_purchase_price": 150.0}
            ],
            "transactions": [
                {
                    "id": 2,
                    "stock_ticker": "RELIANCE.NSE",
                    "transaction_type": "BUY",
                    "quantity": 10,
                    "price_per_share": 150.0,
                    "timestamp": "2026-08-06T10:15:00Z",
                    "profit_or_loss": 0.0
                },
                {
                    "id": 3,
                    "stock_ticker": "TCS.NSE",
                    "transaction_type": "SELL",
                    "quantity": 5,
                    "price_per_share": 210.0,
                    "timestamp": "2026-08-06T11:00:00Z",
                    "profit_or_loss": 50.0
                }
            ]
        }"#;

        let account: Account = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(account.username, "alice");
        assert_eq!(account.budget, 98500.0);
        assert_eq!(account.holdings.len(), 1);
        assert_eq!(account.holdings[0].stock_ticker, "RELIANCE.NSE");
        assert_eq!(account.holdings[0].quantity, 10);
        assert_eq!(
            account.transactions[0].transaction_type,
            TransactionType::Buy
        );
        assert_eq!(
            account.transactions[1].transaction_type,
            TransactionType::Sell
        );
        assert_eq!(account.transactions[1].profit_or_loss, Some(50.0));
    }

    #[test]
    fn test_missing_profit_or_loss_is_none() {
        let json = r#"{
            "stock_ticker": "INFY.NSE",
            "transaction_type": "SELL",
            "quantity": 1,
            "price_per_share": 90.0,
            "timestamp": "2026-08-06T09:00:00Z",
            "profit_or_loss": null
        }"#;

        let tx: Transaction = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(tx.profit_or_loss, None);
    }
}
