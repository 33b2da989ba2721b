//! Quote provider abstractions and core types

use anyhow::Result;
use async_trait::async_trait;

/// A live quote for a single symbol.
#[derive(Debug, Clone)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub change: Option<f64>,
    pub change_pct: Option<f64>,
    pub volume: Option<u64>,
}

/// One hit from a symbol search. Full symbols are `<CODE>.<EXCHANGE>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMatch {
    pub code: String,
    pub exchange: String,
    pub name: String,
}

impl SymbolMatch {
    pub fn symbol(&self) -> String {
        format!("{}.{}", self.code, self.exchange)
    }
}

/// Picks the listing to trade from a search result: NSE/BSE listings win
/// over other venues, otherwise the first hit stands.
pub fn best_match(matches: &[SymbolMatch]) -> Option<&SymbolMatch> {
    matches
        .iter()
        .find(|m| m.exchange == "NSE" || m.exchange == "BSE")
        .or_else(|| matches.first())
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote>;
    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(code: &str, exchange: &str) -> SymbolMatch {
        SymbolMatch {
            code: code.to_string(),
            exchange: exchange.to_string(),
            name: format!("{code} Ltd"),
        }
    }

    #[test]
    fn test_best_match_prefers_domestic_exchange() {
        let matches = vec![
            hit("RELI", "US"),
            hit("RELIANCE", "NSE"),
            hit("RELIANCE", "BSE"),
        ];
        let best = best_match(&matches).unwrap();
        assert_eq!(best.symbol(), "RELIANCE.NSE");
    }

    #[test]
    fn test_best_match_falls_back_to_first_hit() {
        let matches = vec![hit("AAPL", "US"), hit("APC", "XETRA")];
        let best = best_match(&matches).unwrap();
        assert_eq!(best.symbol(), "AAPL.US");
    }

    #[test]
    fn test_best_match_empty() {
        assert!(best_match(&[]).is_none());
    }
}
