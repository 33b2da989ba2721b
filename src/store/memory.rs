//! In-memory price snapshot store.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use crate::core::pricecache::{DailyPrices, PriceStore};

/// Holds the snapshot in memory. The load/save counters let tests assert how
/// often the cache touched its store.
#[derive(Default)]
pub struct MemoryStore {
    entry: Mutex<Option<DailyPrices>>,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a pre-seeded snapshot.
    pub fn with_entry(entry: DailyPrices) -> Self {
        Self {
            entry: Mutex::new(Some(entry)),
            ..Self::default()
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The snapshot as last saved (or seeded), if any.
    pub fn snapshot(&self) -> Option<DailyPrices> {
        self.entry.lock().expect("store lock poisoned").clone()
    }
}

#[async_trait]
impl PriceStore for MemoryStore {
    async fn load(&self) -> Result<Option<DailyPrices>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot())
    }

    async fn save(&self, entry: &DailyPrices) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.entry.lock().expect("store lock poisoned") = Some(entry.clone());
        Ok(())
    }
}
