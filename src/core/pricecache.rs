//! Once-per-day live price resolution backed by a persisted snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::core::model::Holding;
use crate::core::quote::QuoteProvider;

/// The persisted daily snapshot: prices fetched on `date`. A snapshot from
/// any other day is stale as a whole and is discarded, not merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyPrices {
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub prices: HashMap<String, f64>,
}

/// Persistence for the daily snapshot. A single named slot, read at the
/// start of a resolution pass and written once at the end of a pass that
/// fetched anything.
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn load(&self) -> Result<Option<DailyPrices>>;
    async fn save(&self, entry: &DailyPrices) -> Result<()>;
}

/// Resolves a current price per ticker, hitting the quote provider at most
/// once per calendar day per ticker.
///
/// Resolution never fails: unfetchable tickers resolve to their average
/// purchase price, and store errors degrade to a cold cache. The fallback
/// price is cached too, so a chronically failing ticker is not re-requested
/// for the rest of the day.
pub struct PriceCache {
    store: Arc<dyn PriceStore>,
    provider: Arc<dyn QuoteProvider>,
    // Serializes resolution passes so two callers cannot interleave the
    // read-modify-write of the persisted snapshot and lose updates.
    pass: Mutex<()>,
}

impl PriceCache {
    pub fn new(store: Arc<dyn PriceStore>, provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            store,
            provider,
            pass: Mutex::new(()),
        }
    }

    /// Returns a price for every holding: cached values where today's
    /// snapshot has them, freshly fetched ones otherwise.
    pub async fn resolve_prices(&self, holdings: &[Holding]) -> HashMap<String, f64> {
        let _pass = self.pass.lock().await;
        let today = Local::now().date_naive();

        let mut entry = match self.store.load().await {
            Ok(Some(entry)) => entry,
            Ok(None) => DailyPrices::default(),
            Err(e) => {
                warn!("Failed to load price cache, starting cold: {e}");
                DailyPrices::default()
            }
        };

        if entry.date != Some(today) {
            debug!(stale = ?entry.date, %today, "Price cache rolled over, discarding cached prices");
            entry = DailyPrices {
                date: Some(today),
                prices: HashMap::new(),
            };
        }

        let to_fetch: Vec<&Holding> = holdings
            .iter()
            .filter(|h| !entry.prices.contains_key(&h.stock_ticker))
            .collect();

        if to_fetch.is_empty() {
            debug!("All prices served from cache");
        } else {
            debug!(count = to_fetch.len(), "Fetching live prices");
            let fetches = to_fetch.iter().map(|&holding| {
                let provider = Arc::clone(&self.provider);
                async move {
                    let price = match provider.fetch_quote(&holding.stock_ticker).await {
                        Ok(quote) => quote.price,
                        Err(e) => {
                            warn!(
                                ticker = %holding.stock_ticker,
                                "Quote fetch failed, falling back to purchase price: {e}"
                            );
                            holding.average_purchase_price
                        }
                    };
                    (holding.stock_ticker.clone(), price)
                }
            });
            entry.prices.extend(join_all(fetches).await);

            if let Err(e) = self.store.save(&entry).await {
                warn!("Failed to persist price cache: {e}");
            }
        }

        holdings
            .iter()
            .map(|h| {
                let price = entry
                    .prices
                    .get(&h.stock_ticker)
                    .copied()
                    .unwrap_or(h.average_purchase_price);
                (h.stock_ticker.clone(), price)
            })
            .collect()
    }
}
