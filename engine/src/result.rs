//! Comparison output.

use quotestack_common::{Amount, Currency, Money, QuoteKey};
use serde::{Deserialize, Serialize};

/// One best-value candidate with its ranks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedQuote {
    pub quote: QuoteKey,
    /// `price_rank + lead_time_rank`; lower is better.
    pub score: usize,
    /// 0-based position by normalized amount, ascending.
    pub price_rank: usize,
    /// 0-based position by lead time, ascending.
    pub lead_time_rank: usize,
    pub amount_base: Amount,
    pub lead_time_days: u32,
}

/// Result of comparing the quotes of one deal.
///
/// Derived on demand and never a source of truth. Every field is always
/// serialized; "no answer" is `null` or an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub base_currency: Currency,
    /// Best value: lowest combined price and lead-time rank.
    pub best_quote_id: Option<QuoteKey>,
    /// Lowest normalized amount.
    pub best_price_quote_id: Option<QuoteKey>,
    pub best_price: Option<Amount>,
    /// Shortest specified lead time.
    pub best_lead_time_quote_id: Option<QuoteKey>,
    pub best_lead_time_days: Option<u32>,
    /// Foreign-currency quotes with no normalized amount.
    pub unscored_quote_ids: Vec<QuoteKey>,
    /// Best-value candidates by score, ties in input order.
    pub ranking: Vec<RankedQuote>,
}

impl ComparisonResult {
    /// A result with no answers.
    pub fn empty(base_currency: Currency) -> Self {
        Self {
            base_currency,
            best_quote_id: None,
            best_price_quote_id: None,
            best_price: None,
            best_lead_time_quote_id: None,
            best_lead_time_days: None,
            unscored_quote_ids: Vec::new(),
            ranking: Vec::new(),
        }
    }

    pub fn is_unscored(&self, key: QuoteKey) -> bool {
        self.unscored_quote_ids.contains(&key)
    }

    /// The ranking row for `key`, if it was a best-value candidate.
    pub fn ranked(&self, key: QuoteKey) -> Option<&RankedQuote> {
        self.ranking.iter().find(|row| row.quote == key)
    }

    /// Best normalized price in the deal currency.
    pub fn best_price_money(&self) -> Option<Money> {
        self.best_price
            .map(|amount| Money::new(amount, self.base_currency.clone()))
    }
}
