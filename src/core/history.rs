//! Conversion history abstractions

use crate::core::currency::CurrencyCode;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the collection that holds conversion records.
pub const HISTORY_COLLECTION: &str = "conversion_history";

/// One completed conversion. Created once by a store and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub id: u64,
    pub amount: f64,
    pub source: CurrencyCode,
    pub target: CurrencyCode,
    pub result: f64,
    pub time: DateTime<Utc>,
}

/// Best-effort, append-only log of successful conversions.
///
/// Implementations stamp the record time when saving and must swallow every
/// storage error: recording history never fails a conversion.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn save(&self, amount: f64, from: &CurrencyCode, to: &CurrencyCode, result: f64);
}
