use super::ui;
use crate::core::{Converter, CurrencyCode, HistoryStore, RateUnavailable};
use std::io::Write;
use tracing::debug;

/// Formats a conversion as shown to the user, rounded to two decimals.
pub fn format_conversion(
    amount: f64,
    from: &CurrencyCode,
    result: f64,
    to: &CurrencyCode,
) -> String {
    format!("{amount:.2} {from} = {result:.2} {to}")
}

/// Converts, prints the result line and records it in `history`.
///
/// History is only written after the result is reported; a failed lookup
/// writes nothing.
pub async fn convert_and_record<W: Write>(
    out: &mut W,
    converter: &Converter,
    history: &dyn HistoryStore,
    amount: f64,
    from: &CurrencyCode,
    to: &CurrencyCode,
) -> Result<f64, RateUnavailable> {
    let spinner = ui::new_spinner("Fetching exchange rates...");
    let converted = converter.convert(amount, from, to).await;
    spinner.finish_and_clear();

    let result = converted?;
    let line = format_conversion(amount, from, result, to);
    if let Err(e) = writeln!(out, "\nResult: {}", ui::style_text(&line, ui::StyleType::Result)) {
        debug!(error = %e, "Failed to write result");
    }

    history.save(amount, from, to, result).await;
    Ok(result)
}
