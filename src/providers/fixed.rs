use crate::core::{CurrencyCode, RateFailure, RateSource, RateUnavailable};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory rates keyed by currency code. Used in place of the remote provider in tests.
pub struct FixedRateSource {
    rates: HashMap<String, f64>,
    lookups: AtomicUsize,
}

impl FixedRateSource {
    pub fn new<'a>(rates: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        FixedRateSource {
            rates: rates
                .into_iter()
                .map(|(code, rate)| (code.to_uppercase(), rate))
                .collect(),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Number of `get_rate` calls made so far, successful or not.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for FixedRateSource {
    async fn get_rate(&self, code: &CurrencyCode) -> Result<f64, RateUnavailable> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.rates
            .get(code.as_str())
            .copied()
            .ok_or_else(|| RateUnavailable::new(code.as_str(), RateFailure::UnsupportedCurrency))
    }
}
