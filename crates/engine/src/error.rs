//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidCurrency`] returned when a currency code can't be parsed.
//! - [`InvalidRate`] returned when an exchange rate is zero or negative.
//! - [`InvalidLocale`] returned when the number separators are unusable.
//!
//! Expression failures have their own type, [`CalcError`], because they are
//! part of normal editing and never leave the calculator as hard errors.
//!
//!  [`InvalidCurrency`]: EngineError::InvalidCurrency
//!  [`InvalidRate`]: EngineError::InvalidRate
//!  [`InvalidLocale`]: EngineError::InvalidLocale
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),
    #[error("Invalid rate: {0}")]
    InvalidRate(String),
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
}

/// Why an expression produced no value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("arithmetic error: {0}")]
    Arithmetic(ArithmeticError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("overflow")]
    Overflow,
}

impl From<ArithmeticError> for CalcError {
    fn from(value: ArithmeticError) -> Self {
        Self::Arithmetic(value)
    }
}
