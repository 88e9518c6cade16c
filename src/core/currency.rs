//! Currency codes and exchange rate abstractions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Every rate is expressed as units of the target currency per one unit of this currency.
pub const BASE_CURRENCY: &str = "USD";

/// An uppercase alphabetic currency identifier such as `USD` or `INR`.
///
/// Input is case-insensitive and canonicalized to uppercase. Whether a code is
/// actually supported is only known once a [`RateSource`] resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = RateUnavailable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RateUnavailable::new(code, RateFailure::UnsupportedCurrency));
        }
        Ok(CurrencyCode(code.to_ascii_uppercase()))
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a rate could not be resolved. Only used for diagnostics; callers
/// treat every variant the same.
#[derive(Debug, Error)]
pub enum RateFailure {
    #[error("currency not supported by provider")]
    UnsupportedCurrency,

    #[error("provider reported an error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// The single failure signal surfaced to the user.
#[derive(Debug, Error)]
#[error("Real-time rate unavailable for: {code}")]
pub struct RateUnavailable {
    pub code: String,
    #[source]
    pub reason: RateFailure,
}

impl RateUnavailable {
    pub fn new(code: impl Into<String>, reason: RateFailure) -> Self {
        RateUnavailable {
            code: code.into(),
            reason,
        }
    }
}

/// Resolves the rate from [`BASE_CURRENCY`] to a requested currency.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn get_rate(&self, code: &CurrencyCode) -> Result<f64, RateUnavailable>;
}
