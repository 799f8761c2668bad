use engine::{CurrencyCode, ExchangeRates, Locale, Value, calculator, exchange, format};
use rust_decimal::Decimal;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    AmountEvent,
    signal::Signal,
    state::{AmountState, EditorState},
};

/// Reactive model behind the amount entry.
///
/// The model owns the editor state (expression, currency, error flag) and
/// applies [`AmountEvent`]s to it one at a time. A background task combines
/// that state with the latest exchange rates and base currency and publishes
/// a fresh [`AmountState`] whenever any of them changes.
///
/// No [`AmountState`] is derived until both the rates and the base currency
/// have produced a value; until then [`AmountState::initial`] is visible.
///
/// Dropping the model (or calling [`dispose`](Self::dispose)) stops the
/// background task and releases every subscription.
#[derive(Debug)]
pub struct AmountModel {
    editor: watch::Sender<EditorState>,
    rates: Signal<ExchangeRates>,
    state: watch::Receiver<AmountState>,
    locale: Locale,
    override_initial: bool,
    task: Option<JoinHandle<()>>,
}

impl AmountModel {
    /// Builds the model and starts its background task.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(
        rates: Signal<ExchangeRates>,
        base_currency: Signal<CurrencyCode>,
        locale: Locale,
    ) -> Self {
        let (editor, editor_rx) = watch::channel(EditorState::default());
        let (state_tx, state) = watch::channel(AmountState::initial());

        let task = tokio::spawn(combine(
            editor_rx,
            rates.subscribe(),
            base_currency.subscribe(),
            state_tx,
            locale,
        ));

        Self {
            editor,
            rates,
            state,
            locale,
            override_initial: false,
            task: Some(task),
        }
    }

    /// Follows the derived state.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<AmountState> {
        self.state.clone()
    }

    #[must_use]
    pub fn expression(&self) -> String {
        self.editor.borrow().expression.clone()
    }

    #[must_use]
    pub fn currency(&self) -> Option<CurrencyCode> {
        self.editor.borrow().currency.clone()
    }

    #[must_use]
    pub fn show_expression_error(&self) -> bool {
        self.editor.borrow().show_expression_error
    }

    /// `true` while the expression was pre-filled and the next digit replaces
    /// it instead of extending it.
    #[must_use]
    pub fn overrides_initial(&self) -> bool {
        self.override_initial
    }

    /// Applies one event.
    ///
    /// Only [`AmountEvent::CurrencyChange`] can wait: it reads the current
    /// rate snapshot once. Nothing is modified before that read completes,
    /// so dropping the returned future abandons the change cleanly.
    ///
    /// While that read is pending the model stays borrowed, so later events
    /// wait behind it. The model sets no deadline of its own: a caller that
    /// must keep accepting input wraps the call in a timeout and drops it.
    pub async fn handle(&mut self, event: AmountEvent) {
        tracing::debug!(?event, "amount event");

        match event {
            AmountEvent::Backspace => self.backspace(),
            AmountEvent::DecimalSeparator => {
                let separator = self.locale.decimal_separator;
                self.update(|editor| {
                    editor.expression =
                        calculator::append_decimal_separator(&editor.expression, separator);
                });
                self.override_initial = false;
            }
            AmountEvent::Operator(operator) => {
                self.update(|editor| {
                    editor.expression = calculator::append_operator(&editor.expression, operator);
                });
                self.override_initial = false;
            }
            AmountEvent::Number(digit) => self.number(digit),
            AmountEvent::Clear => {
                self.update(|editor| editor.expression = calculator::clear());
                self.override_initial = false;
            }
            AmountEvent::Equals => self.equals(),
            AmountEvent::CurrencyChange(currency) => self.change_currency(currency).await,
            AmountEvent::Initial(value) => self.initial(value),
        }
    }

    /// Stops the background task. Same as dropping the model.
    pub fn dispose(self) {
        drop(self);
    }

    /// Stops accepting events and waits until the state reflecting every
    /// event handled so far has been published.
    pub async fn close(mut self) {
        let task = self.task.take();
        // Dropping the editor lets the task publish once more and finish.
        drop(self);
        if let Some(task) = task
            && let Err(err) = task.await
        {
            tracing::warn!(%err, "amount task failed");
        }
    }

    fn update(&self, apply: impl FnOnce(&mut EditorState)) {
        self.editor.send_if_modified(|editor| {
            let before = editor.clone();
            apply(editor);
            *editor != before
        });
    }

    fn backspace(&mut self) {
        if self.editor.borrow().expression.is_empty() {
            return;
        }
        self.update(|editor| editor.expression = calculator::backspace(&editor.expression));
        self.override_initial = false;
    }

    fn number(&mut self, digit: u8) {
        if digit > 9 {
            tracing::warn!(digit, "ignoring invalid digit");
            return;
        }
        // The first digit after a pre-filled amount starts a new expression.
        let replace = self.override_initial;
        self.update(|editor| {
            let current = if replace { "" } else { editor.expression.as_str() };
            editor.expression = calculator::append_digit(current, digit);
            editor.show_expression_error = false;
        });
        self.override_initial = false;
    }

    fn equals(&mut self) {
        let locale = self.locale;
        self.update(|editor| match calculator::evaluate(&editor.expression) {
            Ok(value) => {
                editor.expression = editable_amount(value, editor.currency.as_ref(), locale);
            }
            Err(err) => {
                if !editor.expression.trim().is_empty() {
                    tracing::debug!(%err, expression = %editor.expression, "expression error");
                    editor.show_expression_error = true;
                }
            }
        });
        self.override_initial = false;
    }

    async fn change_currency(&mut self, new_currency: CurrencyCode) {
        let (current, entered) = {
            let editor = self.editor.borrow();
            let entered = calculator::evaluate(&editor.expression).ok();
            (editor.currency.clone(), entered)
        };
        tracing::debug!(?entered, "entered value");

        let mut converted_expression = None;
        if let (Some(from), Some(amount)) = (current.as_ref(), entered)
            && *from != new_currency
        {
            let latest_rates = self.rates.current().await;
            tracing::debug!(
                as_of = ?latest_rates.as_ref().map(ExchangeRates::as_of),
                "latest rates"
            );
            match latest_rates.and_then(|rates| exchange(&rates, from, &new_currency, amount)) {
                Some(converted) => {
                    converted_expression =
                        Some(editable_amount(converted, Some(&new_currency), self.locale));
                }
                None => {
                    tracing::debug!(%from, to = %new_currency, "conversion unavailable");
                }
            }
        }

        self.update(|editor| {
            if let Some(expression) = converted_expression {
                editor.expression = expression;
            }
            editor.currency = Some(new_currency);
        });
        self.override_initial = false;
    }

    fn initial(&mut self, value: Option<Value>) {
        let Some(value) = value else {
            return;
        };
        let locale = self.locale;
        let prefill = !value.is_zero();
        self.update(|editor| {
            if prefill {
                editor.expression = format(&value, false, locale).amount;
            }
            editor.currency = Some(value.currency.clone());
        });
        self.override_initial = prefill;
    }
}

impl Drop for AmountModel {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// Amount written back into the expression, keeping every digit the
/// currency allows.
fn editable_amount(value: Decimal, currency: Option<&CurrencyCode>, locale: Locale) -> String {
    match currency {
        Some(currency) => format(&Value::new(value, currency.clone()), false, locale).amount,
        None => calculator::format_number(value, locale),
    }
}

/// Recomputes the derived state each time an input changes.
async fn combine(
    mut editor: watch::Receiver<EditorState>,
    mut rates: watch::Receiver<Option<ExchangeRates>>,
    mut base_currency: watch::Receiver<Option<CurrencyCode>>,
    state: watch::Sender<AmountState>,
    locale: Locale,
) {
    let mut rates_open = true;
    let mut base_open = true;

    loop {
        let next = {
            let editor_now = editor.borrow_and_update();
            let rates_now = rates.borrow_and_update();
            let base_now = base_currency.borrow_and_update();
            match (rates_now.as_ref(), base_now.as_ref()) {
                (Some(rates_now), Some(base_now)) => {
                    Some(AmountState::derive(&editor_now, rates_now, base_now, locale))
                }
                _ => None,
            }
        };

        if let Some(next) = next {
            state.send_if_modified(|current| {
                if *current == next {
                    return false;
                }
                *current = next;
                true
            });
        }

        tokio::select! {
            changed = editor.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            changed = rates.changed(), if rates_open => {
                if changed.is_err() {
                    tracing::debug!("exchange rates source closed");
                    rates_open = false;
                }
            }
            changed = base_currency.changed(), if base_open => {
                if changed.is_err() {
                    tracing::debug!("base currency source closed");
                    base_open = false;
                }
            }
        }
    }
}
