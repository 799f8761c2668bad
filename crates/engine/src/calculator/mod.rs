//! The amount calculator.
//!
//! The user types a small arithmetic expression (`12.5+3×2`) instead of a
//! plain number. This module holds the two halves of that:
//! - [`editor`]: text edits applied key by key, keeping the expression well
//!   formed (one separator per operand, no stacked operators).
//! - [`evaluate`](mod@evaluate): turns the text into a `Decimal`.
//!
//! Precedence is the usual algebraic one: `×` and `÷` bind tighter than `+`
//! and `-`, equal precedence associates to the left.

use std::fmt;

pub mod editor;
pub mod evaluate;

pub use editor::{append_decimal_separator, append_digit, append_operator, backspace, clear};
pub use evaluate::{evaluate, format_number, has_obvious_result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
}

impl Operator {
    /// Character written into the expression for this operator.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }

    /// Recognises an operator character, ASCII spellings included.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Plus),
            '-' | '−' => Some(Self::Minus),
            '×' | '*' => Some(Self::Multiply),
            '÷' | '/' => Some(Self::Divide),
            _ => None,
        }
    }

    pub(crate) const fn binds_tighter(self) -> bool {
        matches!(self, Self::Multiply | Self::Divide)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

pub(crate) fn is_decimal_separator(c: char) -> bool {
    matches!(c, '.' | ',')
}
