use chrono::{TimeZone, Utc};
use engine::{
    CurrencyCode, ExchangeRates, Locale, RatePair, RatesConfig, Value, calculator, exchange,
    format, parse_formatted,
};
use rust_decimal_macros::dec;

fn code(value: &str) -> CurrencyCode {
    CurrencyCode::try_from(value).unwrap()
}

fn rates() -> ExchangeRates {
    let config = RatesConfig {
        base: Some(code("EUR")),
        pairs: vec![
            RatePair {
                from: code("EUR"),
                to: code("USD"),
                rate: dec!(1.25),
            },
            RatePair {
                from: code("EUR"),
                to: code("JPY"),
                rate: dec!(160),
            },
            RatePair {
                from: code("BTC"),
                to: code("EUR"),
                rate: dec!(50000),
            },
        ],
    };
    let as_of = Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap();
    ExchangeRates::from_config(&config, as_of).unwrap()
}

#[test]
fn typed_expression_to_base_currency_line() {
    let rates = rates();
    let value = calculator::evaluate("1000×8+2000").unwrap();
    let usd = Value::new(value, code("USD"));

    let in_base = exchange(&rates, &usd.currency, &code("EUR"), usd.amount).unwrap();
    let ui = format(&Value::new(in_base, code("EUR")), true, Locale::default());
    assert_eq!(ui.display_string(), "8k EUR");
}

#[test]
fn conversion_through_the_base_respects_minor_units() {
    let rates = rates();
    let yen = exchange(&rates, &code("USD"), &code("JPY"), dec!(10)).unwrap();
    let ui = format(&Value::new(yen, code("JPY")), false, Locale::default());
    assert_eq!(ui.amount, "1280");

    let btc = exchange(&rates, &code("USD"), &code("BTC"), dec!(100)).unwrap();
    let ui = format(&Value::new(btc, code("BTC")), false, Locale::default());
    assert_eq!(ui.amount, "0.0016");
}

#[test]
fn written_back_amount_stays_editable() {
    let comma = Locale::new(',', '.').unwrap();
    let value = calculator::evaluate("1234,5×2").unwrap();
    let ui = format(&Value::new(value, code("EUR")), false, comma);
    assert_eq!(ui.amount, "2469");

    let shown = format(&Value::new(dec!(1234.5), code("BTC")), true, comma);
    assert_eq!(shown.amount, "1.234,5");
    assert_eq!(parse_formatted(&shown.amount, comma).as_deref(), Some("1234.5"));
    assert_eq!(calculator::evaluate("1234,5").unwrap(), dec!(1234.5));
}

#[test]
fn unknown_currency_has_no_route() {
    let rates = rates();
    assert_eq!(exchange(&rates, &code("CHF"), &code("EUR"), dec!(1)), None);
    assert_eq!(rates.as_of().to_rfc3339(), "2025-01-31T12:00:00+00:00");
}
