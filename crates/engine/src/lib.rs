//! Domain core of the amount entry: currencies, money values, exchange-rate
//! snapshots, formatting and the expression calculator.
//!
//! Everything here is synchronous and free of I/O. The reactive layer that
//! ties these pieces to live signals lives in the `amount` crate.

pub use currency::CurrencyCode;
pub use error::{ArithmeticError, CalcError, EngineError};
pub use exchange::{ExchangeRates, RatePair, RatesConfig, exchange};
pub use format::{Locale, ValueUi, format, parse_formatted};
pub use money::Value;

pub mod calculator;
mod currency;
mod error;
mod exchange;
mod format;
mod money;

pub type ResultEngine<T> = Result<T, EngineError>;
