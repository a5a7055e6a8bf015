//! Error types for QuoteStack money and quote validation.

use crate::{DealId, QuoteId};
use thiserror::Error;

/// Failure to read an amount from text.
///
/// Blank input is not an error; [`crate::Amount::parse`] reports it as
/// `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Text is not a finite decimal number.
    #[error("Invalid amount: {0:?}")]
    Invalid(String),

    /// Amount is below zero.
    #[error("Amount must not be negative: {0}")]
    Negative(String),

    /// A required amount was blank.
    #[error("Amount is required")]
    Missing,
}

impl AmountError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AmountError::Invalid(_) => "INVALID_AMOUNT",
            AmountError::Negative(_) => "NEGATIVE_AMOUNT",
            AmountError::Missing => "MISSING_AMOUNT",
        }
    }
}

/// Currency code is not three ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid currency code: {0:?}")]
pub struct CurrencyError(pub String);

impl CurrencyError {
    pub fn error_code(&self) -> &'static str {
        "INVALID_CURRENCY"
    }
}

/// Caller contract violations on quote records and edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteValidationError {
    /// Quote amount text failed validation.
    #[error("Quote {quote}: {source}")]
    Amount {
        quote: String,
        #[source]
        source: AmountError,
    },

    /// Quote currency is malformed.
    #[error("Quote {quote}: {source}")]
    Currency {
        quote: String,
        #[source]
        source: CurrencyError,
    },

    /// Identifier is not a positive integer.
    #[error("Invalid quote id: {0}")]
    InvalidId(QuoteId),

    /// The same identifier appears more than once in a snapshot.
    #[error("Duplicate quote id: {0}")]
    DuplicateId(QuoteId),

    /// Quote belongs to a different deal than the snapshot.
    #[error("Quote {quote} belongs to deal {actual}, expected {expected}")]
    WrongDeal {
        quote: QuoteId,
        expected: DealId,
        actual: DealId,
    },

    /// An edit carried no fields.
    #[error("No fields provided to update")]
    NoFieldsToUpdate,
}

impl QuoteValidationError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteValidationError::Amount { source, .. } => source.error_code(),
            QuoteValidationError::Currency { source, .. } => source.error_code(),
            QuoteValidationError::InvalidId(_) => "INVALID_QUOTE_ID",
            QuoteValidationError::DuplicateId(_) => "DUPLICATE_QUOTE_ID",
            QuoteValidationError::WrongDeal { .. } => "MISMATCHED_DEALS",
            QuoteValidationError::NoFieldsToUpdate => "NO_FIELDS_TO_UPDATE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AmountError::Invalid("x".into()).error_code(), "INVALID_AMOUNT");
        assert_eq!(AmountError::Negative("-1".into()).error_code(), "NEGATIVE_AMOUNT");

        let nested = QuoteValidationError::Amount {
            quote: "quote:1".into(),
            source: AmountError::Negative("-1".into()),
        };
        assert_eq!(nested.error_code(), "NEGATIVE_AMOUNT");
        assert_eq!(QuoteValidationError::NoFieldsToUpdate.error_code(), "NO_FIELDS_TO_UPDATE");
    }
}
