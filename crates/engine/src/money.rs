use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CurrencyCode;

/// An amount of money in a given currency.
///
/// Amounts are exact base-10 decimals, so values typed by the user
/// (`10.1 + 0.2`) never drift the way binary floats would.
///
/// # Examples
///
/// ```rust
/// use engine::{CurrencyCode, Value};
/// use rust_decimal::Decimal;
///
/// let eur = CurrencyCode::try_from("EUR").unwrap();
/// let value = Value::new(Decimal::new(1050, 2), eur);
/// assert_eq!(value.to_string(), "10.50 EUR");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Value {
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

impl Value {
    #[must_use]
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
