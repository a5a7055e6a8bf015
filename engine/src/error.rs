//! Comparison error types.

use quotestack_common::{QuoteId, QuoteKey, QuoteValidationError};
use thiserror::Error;

/// Errors returned by comparison entry points.
///
/// These are caller contract violations. A set of quotes that simply cannot
/// be ranked is not an error; it yields an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    /// Requested identifiers must be positive integers.
    #[error("Quote IDs must be positive integers: {0:?}")]
    InvalidQuoteIds(Vec<QuoteId>),

    /// Nothing was requested or nothing matched.
    #[error("Quotes not found")]
    NoQuotes,

    /// Some requested quotes do not exist in the snapshot.
    #[error("Quotes not found: {0:?}")]
    QuoteNotFound(Vec<QuoteId>),

    /// Requested quotes span more than one deal.
    #[error("Quotes must belong to the same deal")]
    MismatchedDeals,

    /// Persisted normalizations disagree on the base currency.
    #[error("Quotes must share the same base currency, found {0:?}")]
    MismatchedCurrency(Vec<String>),

    /// Board edit referenced a quote that is not on the board.
    #[error("Unknown quote: {0}")]
    UnknownQuote(QuoteKey),

    #[error(transparent)]
    InvalidQuote(#[from] QuoteValidationError),
}

impl CompareError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            CompareError::InvalidQuoteIds(_) => "INVALID_QUOTE_ID",
            CompareError::NoQuotes => "QUOTE_NOT_FOUND",
            CompareError::QuoteNotFound(_) => "QUOTE_NOT_FOUND",
            CompareError::MismatchedDeals => "MISMATCHED_DEALS",
            CompareError::MismatchedCurrency(_) => "MISMATCHED_CURRENCY",
            CompareError::UnknownQuote(_) => "QUOTE_NOT_FOUND",
            CompareError::InvalidQuote(e) => e.error_code(),
        }
    }
}

/// Result type for comparison operations.
pub type CompareResult<T> = Result<T, CompareError>;

#[cfg(test)]
mod tests {
    use super::*;
    use quotestack_common::{AmountError, CurrencyError};

    #[test]
    fn test_error_codes() {
        assert_eq!(CompareError::InvalidQuoteIds(vec![QuoteId::new(0)]).error_code(), "INVALID_QUOTE_ID");
        assert_eq!(CompareError::NoQuotes.error_code(), "QUOTE_NOT_FOUND");
        assert_eq!(CompareError::UnknownQuote(QuoteKey::Draft(2)).error_code(), "QUOTE_NOT_FOUND");
        assert_eq!(CompareError::MismatchedCurrency(Vec::new()).error_code(), "MISMATCHED_CURRENCY");
    }

    #[test]
    fn test_wrapped_validation_keeps_code() {
        let err: CompareError = QuoteValidationError::Currency {
            quote: "quote:1".into(),
            source: CurrencyError("usd1".into()),
        }
        .into();
        assert_eq!(err.error_code(), "INVALID_CURRENCY");

        let err: CompareError = QuoteValidationError::Amount {
            quote: "quote:1".into(),
            source: AmountError::Negative("-1".into()),
        }
        .into();
        assert_eq!(err.error_code(), "NEGATIVE_AMOUNT");
    }
}
