//! Core business logic abstractions

pub mod config;
pub mod converter;
pub mod currency;
pub mod history;
pub mod log;

// Re-export main types for cleaner imports
pub use converter::Converter;
pub use currency::{BASE_CURRENCY, CurrencyCode, RateFailure, RateSource, RateUnavailable};
pub use history::{ConversionRecord, HISTORY_COLLECTION, HistoryStore};
