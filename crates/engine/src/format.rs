//! Amount formatting.
//!
//! Two shapes come out of [`format`]:
//! - the full form, used when an amount is written back into the editable
//!   expression (after `=` or a currency change). It keeps every digit the
//!   currency allows and is always accepted by the calculator.
//! - the short form (`shorten_fiat`), used for the base-currency line, where
//!   large fiat amounts become `1.23k`, `4.5m`...

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, Value};

/// Suffixes for shortened fiat amounts, as powers of ten.
const SHORT_UNITS: [(u32, &str); 4] = [(12, "t"), (9, "b"), (6, "m"), (3, "k")];

/// Number separators used for display and for editing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl Locale {
    pub fn new(decimal_separator: char, grouping_separator: char) -> ResultEngine<Self> {
        if !matches!(decimal_separator, '.' | ',') {
            return Err(EngineError::InvalidLocale(format!(
                "decimal separator must be '.' or ',', got '{decimal_separator}'"
            )));
        }
        if grouping_separator == decimal_separator
            || grouping_separator.is_ascii_digit()
            || grouping_separator.is_alphabetic()
        {
            return Err(EngineError::InvalidLocale(format!(
                "unusable grouping separator '{grouping_separator}'"
            )));
        }
        Ok(Self {
            decimal_separator,
            grouping_separator,
        })
    }
}

/// A formatted [`Value`], ready to be shown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueUi {
    pub amount: String,
    pub currency: String,
}

impl ValueUi {
    #[must_use]
    pub fn display_string(&self) -> String {
        format!("{} {}", self.amount, self.currency)
    }
}

/// Formats `value` for display or for editing.
#[must_use]
pub fn format(value: &Value, shorten_fiat: bool, locale: Locale) -> ValueUi {
    let currency = value.currency.code().to_string();

    if shorten_fiat && value.currency.is_fiat() {
        if let Some((scaled, suffix)) = shorten(value.amount) {
            let amount = render(scaled, locale, false);
            return ValueUi {
                amount: format!("{amount}{suffix}"),
                currency,
            };
        }
    }

    let rounded = round_trimmed(value.amount, value.currency.minor_units());
    ValueUi {
        amount: render(rounded, locale, shorten_fiat),
        currency,
    }
}

/// Turns a formatted (full form) amount back into a plain decimal string.
///
/// Grouping separators and whitespace are dropped and the decimal separator
/// becomes `.`. Shortened amounts (`1.2k`) can't be expanded and yield `None`.
#[must_use]
pub fn parse_formatted(text: &str, locale: Locale) -> Option<String> {
    let plain: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != locale.grouping_separator)
        .map(|c| if c == locale.decimal_separator { '.' } else { c })
        .collect();

    if plain.is_empty() || plain.ends_with('.') {
        return None;
    }
    Decimal::from_str(&plain).ok()?;
    Some(plain)
}

/// Rounds to `dp` fraction digits and drops trailing zeros.
pub(crate) fn round_trimmed(amount: Decimal, dp: u32) -> Decimal {
    amount
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Writes a decimal with the locale separators.
pub(crate) fn render(amount: Decimal, locale: Locale, grouping: bool) -> String {
    let text = amount.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3);
    out.push_str(sign);
    if grouping {
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push(locale.grouping_separator);
            }
            out.push(ch);
        }
    } else {
        out.push_str(int_part);
    }
    if let Some(frac_part) = frac_part {
        out.push(locale.decimal_separator);
        out.push_str(frac_part);
    }
    out
}

fn shorten(amount: Decimal) -> Option<(Decimal, &'static str)> {
    // The threshold applies to the displayed (rounded) value.
    let amount = round_trimmed(amount, 2);
    if amount.abs() < Decimal::ONE_THOUSAND {
        return None;
    }
    SHORT_UNITS.iter().find_map(|(exp, suffix)| {
        let unit = Decimal::from(10i64.pow(*exp));
        let scaled = round_trimmed(amount.checked_div(unit)?, 2);
        (scaled.abs() >= Decimal::ONE).then_some((scaled, *suffix))
    })
}
