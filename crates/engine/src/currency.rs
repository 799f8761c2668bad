use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Codes treated as crypto assets. Everything else is fiat.
const CRYPTO_CODES: &[&str] = &[
    "BTC", "ETH", "USDT", "USDC", "BNB", "XRP", "ADA", "SOL", "DOGE", "DOT", "LTC", "TRX",
    "MATIC", "AVAX",
];

/// Fiat currencies without a fractional unit in everyday use.
const ZERO_DECIMAL_FIAT: &[&str] = &["JPY", "KRW", "VND", "CLP", "ISK"];

/// Currency code attached to every amount the engine handles.
///
/// Codes are stored upper-cased and validated on construction: 2 to 10 ASCII
/// alphanumeric characters (`EUR`, `USD`, `BTC`, `USDT`...). The engine does
/// not keep a registry of known codes, any well-formed code is accepted.
///
/// ## Minor units
///
/// `minor_units()` returns how many decimal digits an amount keeps when it is
/// formatted for editing:
/// - fiat: 2 (`10.50 EUR`), 0 for the few zero-decimal currencies (`JPY`)
/// - crypto: 8 (`0.00012345 BTC`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Canonical currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_crypto(&self) -> bool {
        CRYPTO_CODES.contains(&self.0.as_str())
    }

    #[must_use]
    pub fn is_fiat(&self) -> bool {
        !self.is_crypto()
    }

    /// Number of fraction digits used when formatting amounts.
    #[must_use]
    pub fn minor_units(&self) -> u32 {
        if self.is_crypto() {
            8
        } else if ZERO_DECIMAL_FIAT.contains(&self.0.as_str()) {
            0
        } else {
            2
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim().to_ascii_uppercase();
        if !(2..=10).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(EngineError::InvalidCurrency(format!(
                "unsupported currency: {value}"
            )));
        }
        Ok(Self(code))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let code: CurrencyCode = " eur ".parse().unwrap();
        assert_eq!(code.code(), "EUR");
        assert_eq!(code.to_string(), "EUR");
    }

    #[test]
    fn parse_rejects_malformed_codes() {
        assert!("".parse::<CurrencyCode>().is_err());
        assert!("E".parse::<CurrencyCode>().is_err());
        assert!("EU-R".parse::<CurrencyCode>().is_err());
        assert!("ABCDEFGHIJK".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn minor_units_by_kind() {
        assert_eq!(CurrencyCode::try_from("EUR").unwrap().minor_units(), 2);
        assert_eq!(CurrencyCode::try_from("JPY").unwrap().minor_units(), 0);
        assert_eq!(CurrencyCode::try_from("BTC").unwrap().minor_units(), 8);
        assert!(CurrencyCode::try_from("BTC").unwrap().is_crypto());
        assert!(CurrencyCode::try_from("USD").unwrap().is_fiat());
    }
}
