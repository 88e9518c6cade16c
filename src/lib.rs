pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

pub use crate::core::config;

use crate::core::{Converter, CurrencyCode};
use crate::core::config::AppConfig;
use crate::providers::ExchangeRateApiProvider;
use anyhow::Result;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{debug, info};

pub enum AppCommand {
    /// Prompt for conversions until the amount `0` is entered.
    Interactive,
    /// Run a single conversion.
    Convert {
        amount: String,
        from: String,
        to: String,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        base_url = %config.providers.exchange_rate.base_url,
        timeout_secs = config.providers.exchange_rate.timeout_secs,
        "Loaded config"
    );

    let provider = ExchangeRateApiProvider::new(&config.providers.exchange_rate, config.api_key()?)?;
    let converter = Converter::new(Arc::new(provider));

    let mut stdout = std::io::stdout();
    let history = cli::open_history(&config, &mut stdout)?;

    match command {
        AppCommand::Interactive => {
            let stdin = BufReader::new(tokio::io::stdin());
            cli::interactive::run(stdin, &mut stdout, &converter, history.as_ref()).await
        }
        AppCommand::Convert { amount, from, to } => {
            let amount = cli::parse_amount(&amount)?;
            let from: CurrencyCode = from.parse()?;
            let to: CurrencyCode = to.parse()?;
            cli::convert::convert_and_record(
                &mut stdout,
                &converter,
                history.as_ref(),
                amount,
                &from,
                &to,
            )
            .await?;
            Ok(())
        }
    }
}
