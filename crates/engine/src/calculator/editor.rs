//! Key-by-key edits of the calculator expression.
//!
//! Every function takes the current text and returns the new one. None of
//! them evaluate anything.

use super::{Operator, is_decimal_separator};

/// The operand being typed: everything after the last operator.
fn current_operand(expression: &str) -> &str {
    match expression.rfind(|c| Operator::from_char(c).is_some()) {
        Some(idx) => {
            let op_len = expression[idx..].chars().next().map_or(1, char::len_utf8);
            &expression[idx + op_len..]
        }
        None => expression,
    }
}

/// Appends a digit (`0..=9`). Other values leave the expression untouched.
#[must_use]
pub fn append_digit(expression: &str, digit: u8) -> String {
    let Some(ch) = char::from_digit(u32::from(digit), 10) else {
        return expression.to_string();
    };

    let mut out = expression.to_string();
    out.push(ch);
    out
}

/// Appends an operator.
///
/// A trailing operator is replaced rather than stacked. An empty expression
/// only accepts `-` as a leading sign, and that sign is never swapped for
/// another operator.
#[must_use]
pub fn append_operator(expression: &str, operator: Operator) -> String {
    let Some(last) = expression.chars().last() else {
        return match operator {
            Operator::Minus => operator.symbol().to_string(),
            _ => String::new(),
        };
    };

    if Operator::from_char(last).is_none() {
        let mut out = expression.to_string();
        out.push(operator.symbol());
        return out;
    }

    let head = &expression[..expression.len() - last.len_utf8()];
    if head.is_empty() {
        // Only the leading sign so far.
        return expression.to_string();
    }
    let mut out = head.to_string();
    out.push(operator.symbol());
    out
}

/// Appends `separator` unless the current operand already has one.
///
/// An empty operand gets a leading zero (`0.`).
#[must_use]
pub fn append_decimal_separator(expression: &str, separator: char) -> String {
    let operand = current_operand(expression);
    if operand.chars().any(is_decimal_separator) {
        return expression.to_string();
    }

    let mut out = expression.to_string();
    if operand.is_empty() {
        out.push('0');
    }
    out.push(separator);
    out
}

/// Drops the last character.
#[must_use]
pub fn backspace(expression: &str) -> String {
    let mut out = expression.to_string();
    out.pop();
    out
}

#[must_use]
pub fn clear() -> String {
    String::new()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn digits_append() {
        assert_eq!(append_digit("", 1), "1");
        assert_eq!(append_digit("12", 3), "123");
        assert_eq!(append_digit("12+", 0), "12+0");
        assert_eq!(append_digit("1.", 5), "1.5");
    }

    #[test]
    fn digits_append_after_zero() {
        assert_eq!(append_digit("0", 5), "05");
        assert_eq!(append_digit("3+0", 7), "3+07");
        assert_eq!(append_digit("-0", 2), "-02");
        assert_eq!(append_digit("0.", 5), "0.5");
        assert_eq!(append_digit("10", 0), "100");
    }

    #[test]
    fn invalid_digit_is_ignored() {
        assert_eq!(append_digit("12", 10), "12");
    }

    #[test]
    fn operator_replaces_trailing_operator() {
        assert_eq!(append_operator("12", Operator::Plus), "12+");
        assert_eq!(append_operator("12+", Operator::Multiply), "12×");
        assert_eq!(append_operator("12×", Operator::Divide), "12÷");
        assert_eq!(append_operator("12.", Operator::Minus), "12.-");
    }

    #[test]
    fn operator_on_empty_expression() {
        assert_eq!(append_operator("", Operator::Minus), "-");
        assert_eq!(append_operator("", Operator::Plus), "");
        assert_eq!(append_operator("", Operator::Multiply), "");
        assert_eq!(append_operator("-", Operator::Plus), "-");
        assert_eq!(append_operator("-", Operator::Minus), "-");
    }

    #[test]
    fn decimal_separator_once_per_operand() {
        assert_eq!(append_decimal_separator("", '.'), "0.");
        assert_eq!(append_decimal_separator("12", '.'), "12.");
        assert_eq!(append_decimal_separator("12.5", '.'), "12.5");
        assert_eq!(append_decimal_separator("12.5+", '.'), "12.5+0.");
        assert_eq!(append_decimal_separator("12.5+3", ','), "12.5+3,");
        assert_eq!(append_decimal_separator("3,1", '.'), "3,1");
    }

    #[test]
    fn backspace_and_clear() {
        assert_eq!(backspace(""), "");
        assert_eq!(backspace("12"), "1");
        assert_eq!(backspace("12×"), "12");
        assert_eq!(clear(), "");
    }

    proptest! {
        #[test]
        fn decimal_separator_is_idempotent(expr in "-?[0-9]{0,4}([.][0-9]{0,3})?([+×÷-][0-9]{0,4}([.][0-9]{0,3})?){0,3}") {
            let once = append_decimal_separator(&expr, '.');
            let twice = append_decimal_separator(&once, '.');
            prop_assert_eq!(once, twice);
        }
    }
}
