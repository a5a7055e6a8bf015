//! Currency conversion into the deal currency.

use chrono::NaiveDate;
use quotestack_common::{Amount, FxRate, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};

/// Represents a completed currency conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// Input amount.
    pub input: Money,
    /// Output amount, in the rate's base currency.
    pub output: Money,
    /// Rate applied.
    pub rate: Decimal,
    /// Date of the rate.
    pub fx_date: NaiveDate,
}

impl Conversion {
    /// Get the effective rate used.
    pub fn effective_rate(&self) -> Decimal {
        if self.input.amount.is_zero() {
            return Decimal::ZERO;
        }
        self.output.amount.value() / self.input.amount.value()
    }

    /// Input and output are the same currency.
    pub fn is_identity(&self) -> bool {
        self.input.currency == self.output.currency
    }
}

/// Convert `amount` with `rate`.
///
/// The product is exact and never rounded. Converting a currency into itself
/// returns the input unchanged, so no scale is added by a rate like `1.0000`.
pub fn convert(amount: &Money, rate: &FxRate) -> FxResult<Conversion> {
    if amount.currency != rate.quote_currency {
        return Err(FxError::CurrencyMismatch {
            expected: rate.quote_currency.clone(),
            actual: amount.currency.clone(),
        });
    }
    if !rate.is_usable() {
        return Err(FxError::InvalidRate(format!(
            "{} for {}",
            rate.rate,
            rate.pair()
        )));
    }

    if rate.pair().is_identity() {
        return Ok(Conversion {
            input: amount.clone(),
            output: amount.clone(),
            rate: Decimal::ONE,
            fx_date: rate.as_of_date,
        });
    }

    let value = amount
        .amount
        .value()
        .checked_mul(rate.rate)
        .ok_or(FxError::Overflow {
            amount: amount.amount.value(),
            rate: rate.rate,
        })?;

    Ok(Conversion {
        input: amount.clone(),
        output: Money::new(Amount::from_decimal(value)?, rate.base_currency.clone()),
        rate: rate.rate,
        fx_date: rate.as_of_date,
    })
}
