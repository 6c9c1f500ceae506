pub mod cli;
pub mod core;
pub mod providers;

use anyhow::Result;
use tracing::debug;

use crate::core::config::AppConfig;

/// Which market-data provider serves a stock request. The two are
/// alternatives, never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockSource {
    Yahoo,
    AlphaVantage,
}

/// One user-triggered data action. Each fetches fresh and renders; no
/// state survives between commands.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Indicators {
        country_code: String,
    },
    Stock {
        symbol: String,
        source: StockSource,
    },
    Fx {
        from_currency: String,
        to_currency: String,
    },
    Oecd {
        country_code: String,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = AppConfig::load_or_default(config_path)?;
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Indicators { country_code } => cli::indicators::run(&config, &country_code).await,
        AppCommand::Stock { symbol, source } => cli::stock::run(&config, &symbol, source).await,
        AppCommand::Fx {
            from_currency,
            to_currency,
        } => cli::fx::run(&config, &from_currency, &to_currency).await,
        AppCommand::Oecd { country_code } => cli::oecd::run(&config, &country_code).await,
    }
}
