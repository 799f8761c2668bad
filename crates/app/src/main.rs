use std::time::Duration;

use amount::{AmountEvent, AmountModel, AmountState, SignalSender, signal};
use chrono::Utc;
use commands::Command;
use engine::{ExchangeRates, RatePair, RatesConfig, Value};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};

mod commands;
mod error;
mod settings;

/// How long a currency change waits for the first rate snapshot.
const RATES_WAIT: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tally={level},amount={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let locale = settings.locale()?;
    let mut rates_config = settings.rates.clone();

    let (rates_tx, rates) = signal();
    let (base_tx, base_currency) = signal();
    if let Some(snapshot) = snapshot(&rates_config)? {
        tracing::info!(base = %snapshot.base(), pairs = snapshot.len(), "loaded exchange rates");
        rates_tx.send(snapshot);
    }
    if let Some(base) = settings.base_currency.clone() {
        tracing::info!(%base, "base currency");
        base_tx.send(base);
    }

    let mut model = AmountModel::new(rates, base_currency, locale);
    let printer = tokio::spawn(print_states(model.state()));

    match (settings.currency.clone(), settings.initial_amount) {
        (Some(currency), Some(amount)) => {
            let initial = Value::new(amount, currency);
            model.handle(AmountEvent::Initial(Some(initial))).await;
        }
        (Some(currency), None) => model.handle(AmountEvent::CurrencyChange(currency)).await,
        (None, Some(amount)) => tracing::warn!(%amount, "initial amount ignored without a currency"),
        (None, None) => {}
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match commands::parse_command(&line, locale) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!(%line, "{err}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Events(events) => {
                for event in events {
                    apply(&mut model, event).await;
                }
            }
            Command::Base(base) => {
                base_tx.send(base);
            }
            Command::Rate { from, to, rate } => {
                add_rate(&mut rates_config, &rates_tx, RatePair { from, to, rate });
            }
        }
    }

    model.close().await;
    match printer.await {
        Ok(result) => result?,
        Err(err) => tracing::error!("printer task failed: {err}"),
    }

    Ok(())
}

async fn apply(model: &mut AmountModel, event: AmountEvent) {
    if !matches!(event, AmountEvent::CurrencyChange(_)) {
        model.handle(event).await;
        return;
    }
    // Rates may never show up on stdin; give up on the change instead of
    // blocking the input loop.
    if tokio::time::timeout(RATES_WAIT, model.handle(event)).await.is_err() {
        tracing::warn!("no exchange rates yet, currency change dropped");
    }
}

/// Builds a snapshot from `config`, or `None` when it holds no rates at all.
fn snapshot(config: &RatesConfig) -> error::Result<Option<ExchangeRates>> {
    if config.base.is_none() && config.pairs.is_empty() {
        return Ok(None);
    }
    Ok(Some(ExchangeRates::from_config(config, Utc::now())?))
}

/// Publishes a new snapshot with `pair` added, replacing any previous
/// `from → to` entry. `config` only changes when the snapshot builds.
fn add_rate(config: &mut RatesConfig, rates: &SignalSender<ExchangeRates>, pair: RatePair) {
    let mut next = config.clone();
    next.pairs
        .retain(|existing| !(existing.from == pair.from && existing.to == pair.to));
    next.pairs.push(pair);

    match snapshot(&next) {
        Ok(Some(snapshot)) => {
            tracing::debug!(pairs = snapshot.len(), as_of = %snapshot.as_of(), "new exchange rates");
            rates.send(snapshot);
            *config = next;
        }
        Ok(None) => {}
        Err(err) => tracing::error!("failed to build exchange rates: {err}"),
    }
}

/// Writes each published state as one JSON line.
async fn print_states(mut states: watch::Receiver<AmountState>) -> error::Result<()> {
    while states.changed().await.is_ok() {
        let line = serde_json::to_string(&*states.borrow_and_update())?;
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use engine::CurrencyCode;
    use rust_decimal_macros::dec;

    use super::*;

    fn pair(from: &str, to: &str, rate: rust_decimal::Decimal) -> RatePair {
        RatePair {
            from: CurrencyCode::try_from(from).unwrap(),
            to: CurrencyCode::try_from(to).unwrap(),
            rate,
        }
    }

    #[test]
    fn empty_config_has_no_snapshot() {
        assert!(snapshot(&RatesConfig::default()).unwrap().is_none());
    }

    #[test]
    fn added_rate_replaces_the_same_pair() {
        let (tx, rx) = signal();
        let mut config = RatesConfig::default();

        add_rate(&mut config, &tx, pair("EUR", "USD", dec!(1.10)));
        add_rate(&mut config, &tx, pair("EUR", "GBP", dec!(0.85)));
        add_rate(&mut config, &tx, pair("EUR", "USD", dec!(1.20)));

        assert_eq!(config.pairs.len(), 2);
        let published: ExchangeRates = rx.latest().unwrap();
        assert_eq!(published.base().code(), "EUR");
        let usd = CurrencyCode::try_from("USD").unwrap();
        assert_eq!(published.rate(published.base(), &usd), Some(dec!(1.20)));
    }

    #[test]
    fn rejected_rate_publishes_nothing() {
        let (tx, rx) = signal::<ExchangeRates>();
        let mut config = RatesConfig::default();

        add_rate(&mut config, &tx, pair("EUR", "USD", dec!(0)));
        assert!(rx.latest().is_none());
        assert!(config.pairs.is_empty());

        add_rate(&mut config, &tx, pair("EUR", "USD", dec!(1.10)));
        assert_eq!(rx.latest().map(|rates| rates.len()), Some(1));
    }
}
