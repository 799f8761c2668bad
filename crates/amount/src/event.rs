use engine::{CurrencyCode, Value, calculator::Operator};

/// Input handled by [`AmountModel`](crate::AmountModel), one at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AmountEvent {
    Backspace,
    DecimalSeparator,
    Operator(Operator),
    /// A digit key, `0..=9`.
    Number(u8),
    Clear,
    Equals,
    CurrencyChange(CurrencyCode),
    /// Pre-fills the entry, e.g. when editing an existing transaction.
    Initial(Option<Value>),
}
