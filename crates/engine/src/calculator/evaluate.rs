//! Expression evaluation.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::{Operator, is_decimal_separator};
use crate::{
    CalcError,
    error::ArithmeticError,
    format::{Locale, render, round_trimmed},
};

/// Fraction digits kept on the calculator result line.
const RESULT_DIGITS: u32 = 9;

/// A parsed expression: `operands.len() == operators.len() + 1`.
#[derive(Debug)]
struct Parsed {
    operands: Vec<Decimal>,
    operators: Vec<Operator>,
}

fn parse_operand(raw: &str) -> Result<Decimal, CalcError> {
    if raw.is_empty() {
        return Err(CalcError::Parse("missing operand".to_string()));
    }
    if raw.chars().filter(|c| is_decimal_separator(*c)).count() > 1 {
        return Err(CalcError::Parse(format!("too many separators in '{raw}'")));
    }

    let normalized = raw.replace(',', ".");
    let trimmed = normalized.strip_suffix('.').unwrap_or(&normalized);
    let text = match trimmed {
        "" => return Err(CalcError::Parse(format!("invalid number '{raw}'"))),
        t if t.starts_with('.') => format!("0{t}"),
        t => t.to_string(),
    };
    Decimal::from_str(&text).map_err(|_| CalcError::Parse(format!("invalid number '{raw}'")))
}

fn parse(expression: &str) -> Result<Parsed, CalcError> {
    let mut operands = Vec::new();
    let mut operators = Vec::new();
    let mut operand = String::new();
    let mut negative = false;

    for ch in expression.chars().filter(|c| !c.is_whitespace()) {
        if ch.is_ascii_digit() || is_decimal_separator(ch) {
            operand.push(ch);
            continue;
        }
        let Some(operator) = Operator::from_char(ch) else {
            return Err(CalcError::Parse(format!("unexpected character '{ch}'")));
        };
        if operator == Operator::Minus && operand.is_empty() && operands.is_empty() && !negative {
            negative = true;
            continue;
        }
        operands.push(parse_operand(&operand)?);
        operators.push(operator);
        operand.clear();
    }

    if operands.is_empty() && operand.is_empty() && !negative {
        return Err(CalcError::Parse("empty expression".to_string()));
    }
    operands.push(parse_operand(&operand)?);

    if negative {
        operands[0] = -operands[0];
    }

    Ok(Parsed {
        operands,
        operators,
    })
}

/// Evaluates `expression`.
///
/// Empty input, a trailing operator or a malformed number are
/// [`CalcError::Parse`]; division by zero and overflow are
/// [`CalcError::Arithmetic`].
///
/// ```rust
/// use engine::calculator::evaluate;
/// use rust_decimal::Decimal;
///
/// assert_eq!(evaluate("2+3×4").unwrap(), Decimal::from(14));
/// assert!(evaluate("5÷0").is_err());
/// ```
pub fn evaluate(expression: &str) -> Result<Decimal, CalcError> {
    let Parsed {
        operands,
        operators,
    } = parse(expression)?;

    let mut rest = operands.into_iter();
    // `parse` always yields at least one operand.
    let mut term = rest.next().unwrap_or_default();
    let mut total = Decimal::ZERO;

    for (operator, rhs) in operators.into_iter().zip(rest) {
        if operator.binds_tighter() {
            term = apply(term, operator, rhs)?;
            continue;
        }
        total = apply(total, Operator::Plus, term)?;
        term = match operator {
            Operator::Minus => -rhs,
            _ => rhs,
        };
    }

    Ok(apply(total, Operator::Plus, term)?)
}

fn apply(lhs: Decimal, operator: Operator, rhs: Decimal) -> Result<Decimal, ArithmeticError> {
    let result = match operator {
        Operator::Plus => lhs.checked_add(rhs),
        Operator::Minus => lhs.checked_sub(rhs),
        Operator::Multiply => lhs.checked_mul(rhs),
        Operator::Divide if rhs.is_zero() => return Err(ArithmeticError::DivisionByZero),
        Operator::Divide => lhs.checked_div(rhs),
    };
    result.ok_or(ArithmeticError::Overflow)
}

/// `true` when `expression` is just a number equal to `value`, so showing
/// `= value` under it would repeat what is already on screen.
#[must_use]
pub fn has_obvious_result(expression: &str, value: Decimal) -> bool {
    match parse(expression) {
        Ok(parsed) => parsed.operators.is_empty() && parsed.operands[0] == value,
        Err(_) => false,
    }
}

/// Renders a calculator result: at most nine fraction digits, trailing
/// zeros trimmed, no grouping.
#[must_use]
pub fn format_number(value: Decimal, locale: Locale) -> String {
    render(round_trimmed(value, RESULT_DIGITS), locale, false)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{CurrencyCode, Value, format::format};

    fn parse_error(expression: &str) -> bool {
        matches!(evaluate(expression), Err(CalcError::Parse(_)))
    }

    #[test]
    fn plain_numbers() {
        assert_eq!(evaluate("5").unwrap(), dec!(5));
        assert_eq!(evaluate("42.5").unwrap(), dec!(42.5));
        assert_eq!(evaluate("42,5").unwrap(), dec!(42.5));
        assert_eq!(evaluate("5.").unwrap(), dec!(5));
        assert_eq!(evaluate(".5").unwrap(), dec!(0.5));
        assert_eq!(evaluate("-7").unwrap(), dec!(-7));
        assert_eq!(evaluate("05").unwrap(), dec!(5));
    }

    #[test]
    fn leading_sign_negates_first_operand_only() {
        assert_eq!(evaluate("-5").unwrap(), dec!(-5));
        assert_eq!(evaluate("-0.5+1").unwrap(), dec!(0.5));
        assert_eq!(evaluate("-3-2").unwrap(), dec!(-5));
        assert_eq!(evaluate("-4×-").ok(), None);
        assert!(has_obvious_result("-12", dec!(-12)));
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(evaluate("12+8").unwrap(), dec!(20));
        assert_eq!(evaluate("2+3×4").unwrap(), dec!(14));
        assert_eq!(evaluate("10-2×3").unwrap(), dec!(4));
        assert_eq!(evaluate("10-4-3").unwrap(), dec!(3));
        assert_eq!(evaluate("100÷10÷2").unwrap(), dec!(5));
        assert_eq!(evaluate("8÷2×4").unwrap(), dec!(16));
        assert_eq!(evaluate("-2×3+1").unwrap(), dec!(-5));
        assert_eq!(evaluate("1 + 2 * 3 / 2").unwrap(), dec!(4));
        assert_eq!(evaluate("0.1+0.2").unwrap(), dec!(0.3));
    }

    #[test]
    fn malformed_expressions() {
        assert!(parse_error(""));
        assert!(parse_error("   "));
        assert!(parse_error("-"));
        assert!(parse_error("12+"));
        assert!(parse_error("12+×3"));
        assert!(parse_error("×3"));
        assert!(parse_error("1.2.3"));
        assert!(parse_error("."));
        assert!(parse_error("12a"));
        assert!(parse_error("--3"));
    }

    #[test]
    fn arithmetic_failures() {
        assert_eq!(
            evaluate("5÷0"),
            Err(CalcError::Arithmetic(ArithmeticError::DivisionByZero))
        );
        assert_eq!(
            evaluate("5÷0.0+1"),
            Err(CalcError::Arithmetic(ArithmeticError::DivisionByZero))
        );
        assert_eq!(
            evaluate("79228162514264337593543950335×2"),
            Err(CalcError::Arithmetic(ArithmeticError::Overflow))
        );
    }

    #[test]
    fn obvious_results() {
        assert!(has_obvious_result("5", dec!(5.0)));
        assert!(has_obvious_result("5.", dec!(5)));
        assert!(has_obvious_result("-3.50", dec!(-3.5)));
        assert!(!has_obvious_result("2+3", dec!(5.0)));
        assert!(!has_obvious_result("5", dec!(6)));
        assert!(!has_obvious_result("", dec!(0)));
    }

    #[test]
    fn result_line_formatting() {
        let locale = Locale::default();
        assert_eq!(format_number(dec!(20.000), locale), "20");
        assert_eq!(format_number(dec!(1) / dec!(3), locale), "0.333333333");
        assert_eq!(format_number(dec!(-1234.5), Locale::new(',', '.').unwrap()), "-1234,5");
    }

    proptest! {
        #[test]
        fn formatted_result_evaluates_back(
            a in -1_000_000i64..1_000_000,
            b in -1_000_000i64..1_000_000,
            op in prop::sample::select(vec!['+', '-', '×']),
        ) {
            let expression = format!("{}{op}{}", Decimal::new(a, 2), Decimal::new(b, 2).abs());
            let value = evaluate(&expression).unwrap();
            let eur = CurrencyCode::try_from("EUR").unwrap();
            let amount = format(&Value::new(value, eur.clone()), false, Locale::default()).amount;
            let back = evaluate(&amount).unwrap();
            prop_assert_eq!(back, round_trimmed(value, eur.minor_units()));
        }
    }
}
