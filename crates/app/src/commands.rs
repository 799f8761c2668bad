use std::str::FromStr;

use amount::AmountEvent;
use engine::{CurrencyCode, EngineError, Locale, Value, calculator::Operator, parse_formatted};
use rust_decimal::Decimal;

/// One line of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Events for the amount model, applied in order.
    Events(Vec<AmountEvent>),
    Base(CurrencyCode),
    Rate {
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    },
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ParseError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("invalid rate '{0}'")]
    InvalidRate(String),
    #[error(transparent)]
    Currency(#[from] EngineError),
}

/// Parses one input line. Blank lines yield `None`.
pub(crate) fn parse_command(line: &str, locale: Locale) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let command = match (head, args.as_slice()) {
        ("q" | "quit", []) => Command::Quit,
        ("=", []) => event(AmountEvent::Equals),
        ("c" | "clear", []) => event(AmountEvent::Clear),
        ("<" | "back", []) => event(AmountEvent::Backspace),
        ("." | ",", []) => event(AmountEvent::DecimalSeparator),
        ("cur", [code]) => event(AmountEvent::CurrencyChange(CurrencyCode::try_from(*code)?)),
        ("cur", _) => return Err(ParseError::Usage("cur <CODE>")),
        ("base", [code]) => Command::Base(CurrencyCode::try_from(*code)?),
        ("base", _) => return Err(ParseError::Usage("base <CODE>")),
        ("rate", [from, to, rate]) => Command::Rate {
            from: CurrencyCode::try_from(*from)?,
            to: CurrencyCode::try_from(*to)?,
            rate: parse_rate(rate)?,
        },
        ("rate", _) => return Err(ParseError::Usage("rate <FROM> <TO> <RATE>")),
        ("init", [amount, code]) => {
            let currency = CurrencyCode::try_from(*code)?;
            let amount = parse_amount(amount, locale)?;
            event(AmountEvent::Initial(Some(Value::new(amount, currency))))
        }
        ("init", _) => return Err(ParseError::Usage("init <AMOUNT> <CODE>")),
        (digits, []) if digits.chars().all(|c| c.is_ascii_digit()) => Command::Events(
            digits
                .bytes()
                .map(|b| AmountEvent::Number(b - b'0'))
                .collect(),
        ),
        (symbol, []) => match single_char(symbol).and_then(Operator::from_char) {
            Some(operator) => event(AmountEvent::Operator(operator)),
            None => return Err(ParseError::Unknown(line.to_string())),
        },
        _ => return Err(ParseError::Unknown(line.to_string())),
    };

    Ok(Some(command))
}

fn event(event: AmountEvent) -> Command {
    Command::Events(vec![event])
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

fn parse_amount(text: &str, locale: Locale) -> Result<Decimal, ParseError> {
    parse_formatted(text, locale)
        .and_then(|plain| Decimal::from_str(&plain).ok())
        .ok_or_else(|| ParseError::InvalidAmount(text.to_string()))
}

fn parse_rate(text: &str) -> Result<Decimal, ParseError> {
    match Decimal::from_str(text) {
        Ok(rate) if rate > Decimal::ZERO => Ok(rate),
        _ => Err(ParseError::InvalidRate(text.to_string())),
    }
}
