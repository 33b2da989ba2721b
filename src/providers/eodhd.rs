use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::quote::{Quote, QuoteProvider, SymbolMatch};

// Quote requests ride on view refreshes, so a hung provider must not stall
// the caller for long. Timeouts take the same fallback path as any other
// fetch failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// EODHD-style quote provider: real-time quotes plus symbol search.
pub struct EodhdProvider {
    base_url: String,
    api_token: String,
    client: reqwest::Client,
}

impl EodhdProvider {
    pub fn new(base_url: &str, api_token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("papertrade/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(EodhdProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            client,
        })
    }
}

#[derive(Deserialize, Debug)]
struct RealTimeResponse {
    code: Option<String>,
    close: Option<f64>,
    change: Option<f64>,
    change_p: Option<f64>,
    volume: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct SearchItem {
    #[serde(alias = "Code")]
    code: String,
    #[serde(alias = "Exchange")]
    exchange: String,
    #[serde(alias = "Name")]
    name: String,
}

#[async_trait]
impl QuoteProvider for EodhdProvider {
    #[instrument(name = "EodhdQuote", skip(self), fields(symbol = %symbol))]
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        let url = format!(
            "{}/api/real-time/{}?api_token={}&fmt=json",
            self.base_url, symbol, self.api_token
        );
        debug!("Requesting live quote");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {e} for symbol: {symbol}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let data = response
            .json::<RealTimeResponse>()
            .await
            .map_err(|e| anyhow!("Failed to parse quote response for {symbol}: {e}"))?;

        let price = data
            .close
            .ok_or_else(|| anyhow!("No closing price in quote for symbol: {symbol}"))?;

        Ok(Quote {
            symbol: data.code.unwrap_or_else(|| symbol.to_string()),
            price,
            change: data.change,
            change_pct: data.change_p,
            volume: data.volume,
        })
    }

    #[instrument(name = "EodhdSearch", skip(self), fields(query = %query))]
    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>> {
        let url = format!(
            "{}/api/search/{}?api_token={}&fmt=json",
            self.base_url, query, self.api_token
        );
        debug!("Searching symbols");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {e} for query: {query}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for query: {}",
                response.status(),
                query
            ));
        }

        let items = response
            .json::<Vec<SearchItem>>()
            .await
            .map_err(|e| anyhow!("Failed to parse search response for {query}: {e}"))?;

        Ok(items
            .into_iter()
            .map(|item| SymbolMatch {
                code: item.code,
                exchange: item.exchange,
                name: item.name,
            })
            .collect())
    }
}
