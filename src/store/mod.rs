pub mod disk;
pub mod memory;

use crate::core::{CurrencyCode, HISTORY_COLLECTION, HistoryStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::PartitionCreateOptions;
use std::path::Path;
use tracing::debug;

pub use disk::FjallHistoryStore;
pub use memory::MemoryHistoryStore;

/// Creates the history location and collection if they do not exist yet.
pub fn initialize(data_path: &Path) -> Result<FjallHistoryStore> {
    let history_dir = data_path.join("history");
    debug!("Initializing history store at {}", history_dir.display());

    std::fs::create_dir_all(&history_dir)
        .with_context(|| format!("Failed to create directory: {}", history_dir.display()))?;

    let keyspace = fjall::Config::new(&history_dir)
        .open()
        .with_context(|| format!("Failed to open keyspace at {}", history_dir.display()))?;
    let partition = keyspace
        .open_partition(HISTORY_COLLECTION, PartitionCreateOptions::default())
        .with_context(|| format!("Failed to open partition {HISTORY_COLLECTION}"))?;

    FjallHistoryStore::new(keyspace, partition)
}

/// Stand-in used when the history store could not be initialized.
pub struct DisabledHistoryStore;

#[async_trait]
impl HistoryStore for DisabledHistoryStore {
    async fn save(&self, _amount: f64, from: &CurrencyCode, to: &CurrencyCode, _result: f64) {
        debug!(%from, %to, "History store unavailable, conversion not recorded");
    }
}
