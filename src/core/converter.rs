//! Cross-rate conversion

use crate::core::currency::{CurrencyCode, RateSource, RateUnavailable};
use std::sync::Arc;
use tracing::debug;

/// Converts amounts between two currencies through the base currency.
#[derive(Clone)]
pub struct Converter {
    source: Arc<dyn RateSource>,
}

impl Converter {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Converter { source }
    }

    /// Returns `amount` of `from` expressed in `to`. No rounding is applied.
    ///
    /// The `from` rate is resolved first, so its failure is the one reported
    /// when both currencies are unavailable.
    pub async fn convert(
        &self,
        amount: f64,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<f64, RateUnavailable> {
        let rate_from = self.source.get_rate(from).await?;
        let rate_to = self.source.get_rate(to).await?;
        debug!(%from, %to, rate_from, rate_to, "Resolved rates");

        Ok((amount / rate_from) * rate_to)
    }
}
