//! Same-currency view of a quote.
//!
//! Normalization is pure: it reads what an earlier annotation pass left on
//! the quote and never looks up a rate itself.

use chrono::NaiveDate;
use quotestack_common::{parse_fx_date, Amount, AmountError, Currency, QuoteRecord};
use rust_decimal::Decimal;
use tracing::debug;

/// Why a quote has no amount to normalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingAmount {
    /// Amount is absent or blank.
    Blank,
    /// Amount text failed to parse.
    Invalid(AmountError),
}

/// Outcome of normalizing one quote into the deal currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalization {
    /// Quote is in the deal currency; the amount is used as is.
    Identity(Amount),
    /// Quote carries a usable conversion into the deal currency.
    Converted {
        amount_base: Amount,
        fx_rate: Option<Decimal>,
        fx_date: Option<NaiveDate>,
    },
    /// Foreign-currency quote with no usable conversion.
    Unscored,
    /// Nothing to normalize.
    NoAmount(MissingAmount),
}

impl Normalization {
    /// Amount in the deal currency, when known.
    pub fn amount_base(&self) -> Option<Amount> {
        match self {
            Normalization::Identity(amount) => Some(*amount),
            Normalization::Converted { amount_base, .. } => Some(*amount_base),
            Normalization::Unscored | Normalization::NoAmount(_) => None,
        }
    }

    pub fn is_unscored(&self) -> bool {
        matches!(self, Normalization::Unscored)
    }
}

/// Normalize `quote` into `deal_currency`.
///
/// - Same currency: the raw amount, exactly. Cached FX fields are ignored.
///   A blank or unreadable amount gives [`Normalization::NoAmount`].
/// - Foreign currency with a cached `amountBase` denominated in the deal
///   currency: that amount, whatever the state of the raw amount text.
/// - Foreign currency otherwise: [`Normalization::Unscored`]. A cached amount
///   in some other base currency is stale and is not used.
pub fn normalize(quote: &QuoteRecord, deal_currency: &Currency) -> Normalization {
    let is_identity = quote
        .quote_currency(deal_currency)
        .map(|currency| &currency == deal_currency)
        .unwrap_or(false);
    if is_identity {
        return match quote.parsed_amount() {
            Ok(Some(amount)) => Normalization::Identity(amount),
            Ok(None) => Normalization::NoAmount(MissingAmount::Blank),
            Err(e) => Normalization::NoAmount(MissingAmount::Invalid(e)),
        };
    }

    let base_matches = match quote.base_currency.as_deref() {
        None => true,
        Some(code) => Currency::parse(code).map_or(false, |c| &c == deal_currency),
    };
    if !base_matches {
        debug!(
            quote = ?quote.id,
            base_currency = ?quote.base_currency,
            deal_currency = %deal_currency,
            "Ignoring normalization in another base currency"
        );
        return Normalization::Unscored;
    }

    match quote.parsed_amount_base() {
        Ok(Some(amount_base)) => Normalization::Converted {
            amount_base,
            fx_rate: quote
                .fx_rate
                .as_deref()
                .and_then(|text| Decimal::from_str_exact(text.trim()).ok()),
            fx_date: quote.fx_date.as_deref().and_then(parse_fx_date),
        },
        _ => Normalization::Unscored,
    }
}
