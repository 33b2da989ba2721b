//! On-disk price snapshot store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::core::pricecache::{DailyPrices, PriceStore};

/// Persists the daily snapshot as a single JSON file. Writes go to a temp
/// file first and are renamed into place, so a crash mid-write never leaves
/// a torn snapshot behind.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl PriceStore for JsonFileStore {
    async fn load(&self) -> Result<Option<DailyPrices>> {
        if !self.path.exists() {
            debug!("No price cache file at {}", self.path.display());
            return Ok(None);
        }
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read price cache: {}", self.path.display()))?;
        let entry = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse price cache: {}", self.path.display()))?;
        Ok(Some(entry))
    }

    async fn save(&self, entry: &DailyPrices) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create cache dir: {}", parent.display()))?;
        }
        let raw = serde_json::to_string(entry).context("Failed to serialize price cache")?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &raw)
            .await
            .with_context(|| format!("Failed to write price cache: {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace price cache: {}", self.path.display()))?;
        debug!("Persisted price cache to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("prices.json"));

        let entry = DailyPrices {
            date: NaiveDate::from_ymd_opt(2026, 8, 7),
            prices: HashMap::from([("X.NSE".to_string(), 105.5)]),
        };
        store.save(&entry).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, Some(entry));
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("prices.json"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.json");
        std::fs::write(&path, "not json {").unwrap();

        let store = JsonFileStore::new(path);
        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cache").join("prices.json"));

        store.save(&DailyPrices::default()).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_wire_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.json");
        std::fs::write(
            &path,
            r#"{"date": "2026-08-07", "prices": {"RELIANCE.NSE": 2850.25}}"#,
        )
        .unwrap();

        let store = JsonFileStore::new(path);
        let entry = store.load().await.unwrap().unwrap();
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2026, 8, 7));
        assert_eq!(entry.prices["RELIANCE.NSE"], 2850.25);
    }
}
