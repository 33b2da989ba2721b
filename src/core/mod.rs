//! Core business logic abstractions

pub mod config;
pub mod log;
pub mod model;
pub mod pricecache;
pub mod quote;
pub mod session;
pub mod valuation;

// Re-export main types for cleaner imports
pub use model::{Account, Holding, Transaction, TransactionType};
pub use pricecache::{DailyPrices, PriceCache, PriceStore};
pub use quote::{Quote, QuoteProvider, SymbolMatch};
pub use valuation::{HoldingDetail, ValuationResult, evaluate};
