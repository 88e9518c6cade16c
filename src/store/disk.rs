use crate::core::{ConversionRecord, CurrencyCode, HistoryStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use fjall::{Keyspace, PartitionHandle, PersistMode};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Durable conversion history backed by a fjall partition.
///
/// Keys are big-endian record ids so iteration follows insertion order.
pub struct FjallHistoryStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
    next_id: AtomicU64,
}

impl std::fmt::Debug for FjallHistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FjallHistoryStore")
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl FjallHistoryStore {
    /// Wraps an already initialized history partition; see [`crate::store::initialize`].
    pub(crate) fn new(keyspace: Keyspace, partition: PartitionHandle) -> Result<Self> {
        let last_id = partition
            .last_key_value()?
            .map(|(key, _)| decode_id(&key))
            .transpose()?
            .unwrap_or(0);
        debug!(last_id, "Opened conversion history");

        Ok(Self {
            keyspace,
            partition,
            next_id: AtomicU64::new(last_id + 1),
        })
    }

    /// Reads every stored record in id order.
    pub fn records(&self) -> Result<Vec<ConversionRecord>> {
        self.partition
            .iter()
            .map(|kv| {
                let (_, value) = kv?;
                Ok(serde_json::from_slice(&value)?)
            })
            .collect()
    }

    fn append(&self, record: &ConversionRecord) -> Result<()> {
        self.partition
            .insert(record.id.to_be_bytes().to_vec(), serde_json::to_vec(record)?)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

fn decode_id(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key
        .try_into()
        .with_context(|| format!("Unexpected history key length: {}", key.len()))?;
    Ok(u64::from_be_bytes(bytes))
}

#[async_trait]
impl HistoryStore for FjallHistoryStore {
    async fn save(&self, amount: f64, from: &CurrencyCode, to: &CurrencyCode, result: f64) {
        let record = ConversionRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            amount,
            source: from.clone(),
            target: to.clone(),
            result,
            time: Utc::now(),
        };

        match self.append(&record) {
            Ok(()) => debug!(id = record.id, "Saved conversion"),
            Err(e) => warn!(error = %e, "Failed to save conversion history"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::convert::convert_and_record;
    use crate::core::Converter;
    use crate::providers::FixedRateSource;
    use crate::store::initialize;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_save_appends_records() {
        let dir = tempdir().unwrap();
        let store = initialize(dir.path()).unwrap();
        assert!(store.records().unwrap().is_empty());

        let before = Utc::now();
        store.save(150.0, &code("USD"), &code("INR"), 12450.0).await;
        store.save(10.0, &code("EUR"), &code("USD"), 10.87).await;

        let records = store.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].amount, 150.0);
        assert_eq!(records[0].source, code("USD"));
        assert_eq!(records[0].target, code("INR"));
        assert_eq!(records[0].result, 12450.0);
        assert!(records[0].time >= before);
        assert_eq!(records[1].id, 2);
        assert!(records[1].time >= records[0].time);
    }

    #[tokio::test]
    async fn test_ids_continue_after_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = initialize(dir.path()).unwrap();
            store.save(1.0, &code("USD"), &code("EUR"), 0.92).await;
            store.save(2.0, &code("USD"), &code("EUR"), 1.84).await;
        }

        let store = initialize(dir.path()).unwrap();
        store.save(3.0, &code("USD"), &code("EUR"), 2.76).await;

        let ids: Vec<u64> = store.records().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_conversion_result() {
        let dir = tempdir().unwrap();
        let store = initialize(dir.path()).unwrap();
        store
            .keyspace
            .delete_partition(store.partition.clone())
            .unwrap();

        let record = ConversionRecord {
            id: 99,
            amount: 1.0,
            source: code("USD"),
            target: code("USD"),
            result: 1.0,
            time: Utc::now(),
        };
        assert!(store.append(&record).is_err());

        let converter = Converter::new(Arc::new(FixedRateSource::new([
            ("USD", 1.0),
            ("INR", 83.0),
        ])));
        let mut out = Vec::new();

        let result =
            convert_and_record(&mut out, &converter, &store, 150.0, &code("USD"), &code("INR"))
                .await
                .unwrap();

        assert_eq!(result, 12450.0);
        assert!(
            String::from_utf8(out)
                .unwrap()
                .contains("150.00 USD = 12450.00 INR")
        );
    }

    #[test]
    fn test_decode_id() {
        assert_eq!(decode_id(&42u64.to_be_bytes()).unwrap(), 42);
        assert!(decode_id(b"short").is_err());
    }
}
