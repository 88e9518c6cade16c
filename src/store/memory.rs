use crate::core::{ConversionRecord, CurrencyCode, HistoryStore};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use tracing::debug;

/// In-memory conversion history, mainly for tests.
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<ConversionRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ConversionRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn save(&self, amount: f64, from: &CurrencyCode, to: &CurrencyCode, result: f64) {
        let Ok(mut records) = self.records.lock() else {
            debug!("MemoryHistoryStore lock poisoned, dropping record");
            return;
        };
        let record = ConversionRecord {
            id: records.len() as u64 + 1,
            amount,
            source: from.clone(),
            target: to.clone(),
            result,
            time: Utc::now(),
        };
        debug!(id = record.id, "Saved conversion in memory");
        records.push(record);
    }
}
