use crate::core::config::ExchangeRateProviderConfig;
use crate::core::{BASE_CURRENCY, CurrencyCode, RateFailure, RateSource, RateUnavailable};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Fetches live pair rates from an ExchangeRate-API compatible endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(config: &ExchangeRateProviderConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxconv/1.0")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ExchangeRateApiProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn pair_url(&self, key: &str, code: &CurrencyCode) -> String {
        format!("{}/{}/pair/{}/{}", self.base_url, key, BASE_CURRENCY, code)
    }
}

#[derive(Debug, Deserialize)]
struct PairResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    conversion_rate: Option<f64>,
}

fn classify(
    status: reqwest::StatusCode,
    body: &str,
) -> std::result::Result<f64, RateFailure> {
    let parsed = match serde_json::from_str::<PairResponse>(body) {
        Ok(parsed) => parsed,
        Err(_) if !status.is_success() => return Err(RateFailure::Status(status)),
        Err(e) => return Err(RateFailure::Malformed(e.to_string())),
    };

    if parsed.result.as_deref() == Some("error") {
        let error_type = parsed.error_type.unwrap_or_else(|| "unknown".to_string());
        return Err(if error_type == "unsupported-code" {
            RateFailure::UnsupportedCurrency
        } else {
            RateFailure::Provider(error_type)
        });
    }

    if !status.is_success() {
        return Err(RateFailure::Status(status));
    }

    parsed
        .conversion_rate
        .filter(|rate| rate.is_finite() && *rate > 0.0)
        .ok_or_else(|| RateFailure::Malformed("missing or invalid conversion_rate".to_string()))
}

#[async_trait]
impl RateSource for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(code = %code))]
    async fn get_rate(&self, code: &CurrencyCode) -> Result<f64, RateUnavailable> {
        let url = self.pair_url(&self.api_key, code);
        debug!("Requesting rate from {}", self.pair_url("***", code));

        let unavailable = |reason: RateFailure| {
            debug!(%reason, "Rate unavailable");
            RateUnavailable::new(code.as_str(), reason)
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(RateFailure::Transport(e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| unavailable(RateFailure::Transport(e.without_url())))?;

        let rate = classify(status, &body).map_err(unavailable)?;
        debug!(rate, "Received rate");
        Ok(rate)
    }
}
