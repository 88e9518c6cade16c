pub mod exchange_rate_api;
pub mod fixed;

pub use exchange_rate_api::ExchangeRateApiProvider;
pub use fixed::FixedRateSource;
