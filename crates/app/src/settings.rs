use clap::Parser;
use engine::{CurrencyCode, Locale, RatesConfig};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tally.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub level: String,
    pub base_currency: Option<CurrencyCode>,
    /// Currency selected at startup.
    pub currency: Option<CurrencyCode>,
    /// Pre-filled amount, in `currency`.
    pub initial_amount: Option<Decimal>,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub rates: RatesConfig,
}

impl Default for Settings {
    fn default() -> Self {
        let locale = Locale::default();
        Self {
            level: "info".to_string(),
            base_currency: None,
            currency: None,
            initial_amount: None,
            decimal_separator: locale.decimal_separator,
            grouping_separator: locale.grouping_separator,
            rates: RatesConfig::default(),
        }
    }
}

impl Settings {
    pub fn locale(&self) -> Result<Locale> {
        Ok(Locale::new(self.decimal_separator, self.grouping_separator)?)
    }
}

#[derive(Debug, Parser)]
#[command(name = "tally", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override log level (e.g. debug).
    #[arg(long)]
    level: Option<String>,
    /// Override the base currency.
    #[arg(long)]
    base_currency: Option<CurrencyCode>,
    /// Currency selected at startup.
    #[arg(long)]
    currency: Option<CurrencyCode>,
    /// Pre-filled amount, needs a currency.
    #[arg(long)]
    initial: Option<Decimal>,
    /// Decimal separator, `.` or `,`.
    #[arg(long)]
    decimal_separator: Option<char>,
}

pub fn load() -> Result<Settings> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TALLY"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(level) = args.level {
        settings.level = level;
    }
    if let Some(base_currency) = args.base_currency {
        settings.base_currency = Some(base_currency);
    }
    if let Some(currency) = args.currency {
        settings.currency = Some(currency);
    }
    if let Some(initial) = args.initial {
        settings.initial_amount = Some(initial);
    }
    if let Some(decimal_separator) = args.decimal_separator {
        settings.decimal_separator = decimal_separator;
        // Keep the pair usable when only the decimal side is given.
        if settings.grouping_separator == decimal_separator {
            settings.grouping_separator = if decimal_separator == ',' { '.' } else { ',' };
        }
    }

    Ok(settings)
}
