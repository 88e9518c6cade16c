pub mod convert;
pub mod interactive;
pub mod setup;
pub mod ui;

use crate::core::HistoryStore;
use crate::core::config::AppConfig;
use crate::store::{self, DisabledHistoryStore};
use anyhow::{Result, anyhow};
use std::io::Write;
use std::sync::Arc;
use tracing::warn;

/// Parses a user supplied amount. Only finite, non-negative numbers are accepted.
pub fn parse_amount(input: &str) -> Result<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
        .ok_or_else(|| anyhow!("Invalid amount: {}", input.trim()))
}

/// Initializes conversion history, falling back to a disabled store on failure.
pub fn open_history<W: Write>(config: &AppConfig, out: &mut W) -> Result<Arc<dyn HistoryStore>> {
    let opened = config
        .default_data_path()
        .and_then(|path| store::initialize(&path));

    match opened {
        Ok(history) => {
            writeln!(
                out,
                "{}",
                ui::style_text("✔ Database system initialized.", ui::StyleType::Success)
            )?;
            Ok(Arc::new(history))
        }
        Err(e) => {
            warn!(error = ?e, "History store initialization failed");
            writeln!(
                out,
                "{}",
                ui::style_text(
                    &format!("⚠ Database Setup Warning: {e:#}"),
                    ui::StyleType::Warning
                )
            )?;
            Ok(Arc::new(DisabledHistoryStore))
        }
    }
}
