use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use ecodash::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    /// Keyless daily history over a one-year window
    Yahoo,
    /// Key-based daily history, compact window
    AlphaVantage,
}

impl From<Commands> for ecodash::AppCommand {
    fn from(cmd: Commands) -> ecodash::AppCommand {
        match cmd {
            Commands::Indicators { country_code } => {
                ecodash::AppCommand::Indicators { country_code }
            }
            Commands::Stock { symbol, source } => ecodash::AppCommand::Stock {
                symbol,
                source: match source {
                    Source::Yahoo => ecodash::StockSource::Yahoo,
                    Source::AlphaVantage => ecodash::StockSource::AlphaVantage,
                },
            },
            Commands::Fx {
                from_currency,
                to_currency,
            } => ecodash::AppCommand::Fx {
                from_currency,
                to_currency,
            },
            Commands::Oecd { country_code } => ecodash::AppCommand::Oecd { country_code },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch and chart the World Bank indicator set for a country
    Indicators {
        /// Entity code the provider recognizes, e.g. 'USA' or 'ARG'
        country_code: String,
    },
    /// Fetch a daily price history for a ticker
    Stock {
        /// Ticker symbol, e.g. 'AAPL' or 'GOOG'
        symbol: String,
        #[arg(short, long, value_enum, default_value = "yahoo")]
        source: Source,
    },
    /// Fetch the daily exchange-rate history for a currency pair
    Fx {
        /// Currency code to convert from, e.g. 'USD'
        from_currency: String,
        /// Currency code to convert to, e.g. 'EUR'
        to_currency: String,
    },
    /// Fetch the OECD national-accounts dataset for a country
    Oecd {
        /// Entity code the provider recognizes, e.g. 'USA'
        country_code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => ecodash::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = ecodash::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
providers:
  world_bank:
    base_url: "http://api.worldbank.org/v2"
  oecd:
    base_url: "https://stats.oecd.org/SDMX-JSON"
  alpha_vantage:
    base_url: "https://www.alphavantage.co"
    # api_key: "your-alpha-vantage-api-key"
  yahoo:
    base_url: "https://query1.finance.yahoo.com"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
