//! FX error types.

use chrono::NaiveDate;
use quotestack_common::{AmountError, Currency, CurrencyError, CurrencyPair};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while converting or annotating quotes.
#[derive(Debug, Error)]
pub enum FxError {
    /// No rate dated on or before the requested date.
    #[error("No FX rate for {pair} on or before {as_of}")]
    RateNotAvailable { pair: CurrencyPair, as_of: NaiveDate },

    /// The newest rate is older than the configured maximum age.
    #[error("FX rate for {pair} dated {rate_date} is too old for {as_of}")]
    RateExpired {
        pair: CurrencyPair,
        rate_date: NaiveDate,
        as_of: NaiveDate,
    },

    /// Rate is zero, negative or unreadable.
    #[error("Invalid FX rate data: {0}")]
    InvalidRate(String),

    /// Currency mismatch in conversion.
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch { expected: Currency, actual: Currency },

    /// Converted amount does not fit in a decimal.
    #[error("Conversion overflow: {amount} x {rate}")]
    Overflow { amount: Decimal, rate: Decimal },

    #[error(transparent)]
    InvalidCurrency(#[from] CurrencyError),

    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
}

impl FxError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::RateNotAvailable { .. } => "FX_RATE_MISSING",
            FxError::RateExpired { .. } => "FX_RATE_EXPIRED",
            FxError::InvalidRate(_) => "INVALID_RATE",
            FxError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            FxError::Overflow { .. } => "FX_OVERFLOW",
            FxError::InvalidCurrency(e) => e.error_code(),
            FxError::InvalidAmount(e) => e.error_code(),
        }
    }

    /// The quote can still be compared, just not scored.
    pub fn leaves_quote_unscored(&self) -> bool {
        matches!(
            self,
            FxError::RateNotAvailable { .. } | FxError::RateExpired { .. }
        )
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let pair = CurrencyPair::new(Currency::usd(), Currency::eur());
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

        let missing = FxError::RateNotAvailable { pair, as_of };
        assert_eq!(missing.error_code(), "FX_RATE_MISSING");
        assert!(missing.leaves_quote_unscored());

        let invalid = FxError::InvalidRate("0".into());
        assert_eq!(invalid.error_code(), "INVALID_RATE");
        assert!(!invalid.leaves_quote_unscored());

        let currency: FxError = CurrencyError("EURO".into()).into();
        assert_eq!(currency.error_code(), "INVALID_CURRENCY");
    }
}
