//! Exchange-rate snapshots and currency conversion.
//!
//! An [`ExchangeRates`] value is a point-in-time table of `from → to` rates.
//! Conversion never invents a rate: when the snapshot can't connect two
//! currencies the result is `None`.
//!
//! Rate resolution for `from → to`:
//! 1. same currency: `1`
//! 2. the direct pair `from → to`
//! 3. the inverse of `to → from`
//! 4. one hop through the snapshot base currency, each leg resolved with
//!    rules 2-3
//!
//! Only the snapshot base is used as a pivot.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CurrencyCode, EngineError, ResultEngine};

/// Rates as they appear in configuration files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RatesConfig {
    pub base: Option<CurrencyCode>,
    #[serde(default)]
    pub pairs: Vec<RatePair>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatePair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: Decimal,
}

/// Immutable table of exchange rates taken at `as_of`.
#[derive(Clone, Debug, PartialEq)]
pub struct ExchangeRates {
    base: CurrencyCode,
    as_of: DateTime<Utc>,
    rates: HashMap<(CurrencyCode, CurrencyCode), Decimal>,
}

impl ExchangeRates {
    #[must_use]
    pub fn new(base: CurrencyCode, as_of: DateTime<Utc>) -> Self {
        Self {
            base,
            as_of,
            rates: HashMap::new(),
        }
    }

    /// Builds a snapshot from configuration, stamped with `as_of`.
    ///
    /// Without an explicit base, the `from` side of the first pair is used.
    pub fn from_config(config: &RatesConfig, as_of: DateTime<Utc>) -> ResultEngine<Self> {
        let base = match (&config.base, config.pairs.first()) {
            (Some(base), _) => base.clone(),
            (None, Some(pair)) => pair.from.clone(),
            (None, None) => {
                return Err(EngineError::InvalidRate(
                    "rates need a base currency or at least one pair".to_string(),
                ));
            }
        };

        config.pairs.iter().try_fold(Self::new(base, as_of), |rates, pair| {
            rates.with_rate(pair.from.clone(), pair.to.clone(), pair.rate)
        })
    }

    /// Adds (or replaces) the `from → to` rate.
    pub fn with_rate(
        mut self,
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    ) -> ResultEngine<Self> {
        if rate <= Decimal::ZERO {
            return Err(EngineError::InvalidRate(format!(
                "{from}->{to} rate must be > 0, got {rate}"
            )));
        }
        self.rates.insert((from, to), rate);
        Ok(self)
    }

    #[must_use]
    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    #[must_use]
    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Resolves the multiplier that converts `from` amounts into `to`.
    #[must_use]
    pub fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }
        if let Some(rate) = self.direct_or_inverse(from, to) {
            return Some(rate);
        }
        if from == &self.base || to == &self.base {
            return None;
        }

        let to_base = self.direct_or_inverse(from, &self.base)?;
        let from_base = self.direct_or_inverse(&self.base, to)?;
        to_base.checked_mul(from_base)
    }

    fn direct_or_inverse(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        if let Some(rate) = self.rates.get(&(from.clone(), to.clone())) {
            return Some(*rate);
        }
        self.rates
            .get(&(to.clone(), from.clone()))
            .and_then(|rate| Decimal::ONE.checked_div(*rate))
    }
}

/// Converts `amount` from one currency to another.
///
/// Returns `None` when the snapshot has no route between the two currencies
/// or the result doesn't fit a `Decimal`.
#[must_use]
pub fn exchange(
    rates: &ExchangeRates,
    from: &CurrencyCode,
    to: &CurrencyCode,
    amount: Decimal,
) -> Option<Decimal> {
    if from == to {
        return Some(amount);
    }
    let Some(rate) = rates.rate(from, to) else {
        tracing::debug!(%from, %to, "no exchange route");
        return None;
    };
    amount.checked_mul(rate)
}
