//! The derived view of an amount entry.
//!
//! [`AmountState`] is never patched in place: [`AmountState::derive`] rebuilds
//! it from the editor state and the latest external inputs every time one of
//! them changes.

use engine::{CurrencyCode, ExchangeRates, Locale, Value, ValueUi, calculator, exchange, format};
use serde::Serialize;

/// Text shown when the expression has no value.
const ERROR_RESULT: &str = "Error";

/// What the user is editing. Owned by the model, read by the derivation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorState {
    pub expression: String,
    pub currency: Option<CurrencyCode>,
    pub show_expression_error: bool,
}

/// The small `= result` line under the expression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CalculatorResult {
    pub result: String,
    pub is_error: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AmountState {
    /// `None` while nothing has been typed.
    pub expression: Option<String>,
    pub currency: String,
    pub amount: Option<Value>,
    pub amount_base_currency: Option<ValueUi>,
    pub calculator_result: Option<CalculatorResult>,
}

impl AmountState {
    /// State shown before every input is known.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            expression: None,
            currency: String::new(),
            amount: None,
            amount_base_currency: None,
            calculator_result: Some(CalculatorResult {
                result: String::new(),
                is_error: true,
            }),
        }
    }

    #[must_use]
    pub fn derive(
        editor: &EditorState,
        rates: &ExchangeRates,
        base_currency: &CurrencyCode,
        locale: Locale,
    ) -> Self {
        let expression = editor.expression.as_str();
        let evaluated = calculator::evaluate(expression).ok();

        let calculator_result = CalculatorResult {
            result: evaluated.map_or_else(
                || ERROR_RESULT.to_string(),
                |value| calculator::format_number(value, locale),
            ),
            is_error: evaluated.is_none() && editor.show_expression_error,
        };
        let obvious = match evaluated {
            Some(value) => calculator::has_obvious_result(expression, value),
            None => expression.trim().is_empty(),
        };

        let amount = evaluated
            .zip(editor.currency.clone())
            .map(|(value, currency)| Value::new(value, currency));

        let amount_base_currency = match &amount {
            Some(value) if &value.currency != base_currency => {
                exchange(rates, &value.currency, base_currency, value.amount).map(|converted| {
                    format(
                        &Value::new(converted, base_currency.clone()),
                        true,
                        locale,
                    )
                })
            }
            _ => None,
        };

        Self {
            expression: (!expression.is_empty()).then(|| expression.to_string()),
            currency: editor
                .currency
                .as_ref()
                .map(|c| c.code().to_string())
                .unwrap_or_default(),
            amount,
            amount_base_currency,
            calculator_result: (calculator_result.is_error || !obvious)
                .then_some(calculator_result),
        }
    }
}
