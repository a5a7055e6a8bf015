//! Reconciling an authoritative best-value answer with the local estimate.
//!
//! While the owning service computes its comparison, the board answers from
//! a local estimate over the quotes it holds. Once the authoritative answer
//! arrives it is preferred. Any edit makes the board wait for a fresh one.
//! Both answers come from the same ranking core, so over the same snapshot
//! they agree.

use quotestack_common::{DealSnapshot, QuoteEdit, QuoteId, QuoteKey, QuoteRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::compare::compare_deal;
use crate::error::{CompareError, CompareResult};
use crate::result::ComparisonResult;

/// State of the authoritative best-value answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Authority {
    /// Not received yet, or invalidated by an edit.
    Pending,
    /// Received for the current snapshot.
    #[serde(rename_all = "camelCase")]
    Resolved { best_quote_id: Option<QuoteId> },
}

/// Where a best-value answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BestValueSource {
    Authoritative,
    LocalEstimate,
}

/// The best-value quote to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestValue {
    pub quote: Option<QuoteKey>,
    pub source: BestValueSource,
}

/// Pick the answer to present from a local estimate and the authority.
///
/// A resolved authority wins unless it names a quote that is not part of
/// `estimate`'s snapshot, which means it was computed for other data.
pub fn reconcile(estimate: &ComparisonResult, authority: Authority, known: &[QuoteKey]) -> BestValue {
    if let Authority::Resolved { best_quote_id } = authority {
        match best_quote_id {
            None => {
                return BestValue {
                    quote: None,
                    source: BestValueSource::Authoritative,
                }
            }
            Some(id) if known.contains(&QuoteKey::Id(id)) => {
                return BestValue {
                    quote: Some(QuoteKey::Id(id)),
                    source: BestValueSource::Authoritative,
                }
            }
            Some(id) => {
                warn!(quote_id = %id, "Authoritative best quote is not in the snapshot, using local estimate");
            }
        }
    }

    BestValue {
        quote: estimate.best_quote_id,
        source: BestValueSource::LocalEstimate,
    }
}

/// A deal's quotes plus the authoritative answer for them, if any.
#[derive(Debug, Clone)]
pub struct ComparisonBoard {
    deal: DealSnapshot,
    authority: Authority,
}

impl ComparisonBoard {
    /// Create a board waiting for its first authoritative answer.
    pub fn new(deal: DealSnapshot) -> Self {
        Self {
            deal,
            authority: Authority::Pending,
        }
    }

    pub fn deal(&self) -> &DealSnapshot {
        &self.deal
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    /// Local comparison over the current quotes.
    pub fn estimate(&self) -> CompareResult<ComparisonResult> {
        compare_deal(&self.deal)
    }

    /// Record the authoritative answer for the current snapshot.
    pub fn resolve(&mut self, best_quote_id: Option<QuoteId>) {
        if let Ok(estimate) = self.estimate() {
            if estimate.best_quote_id != best_quote_id.map(QuoteKey::Id) {
                warn!(
                    authoritative = ?best_quote_id,
                    estimate = ?estimate.best_quote_id,
                    "Authoritative best value differs from local estimate"
                );
            }
        }
        self.authority = Authority::Resolved { best_quote_id };
    }

    /// Best value to present: the authoritative answer when resolved,
    /// otherwise the local estimate.
    pub fn best_value(&self) -> CompareResult<BestValue> {
        let estimate = self.estimate()?;
        Ok(reconcile(&estimate, self.authority, &self.keys()))
    }

    /// Apply an edit to one quote.
    ///
    /// Returns whether the quote's normalization was cleared. The authority
    /// goes back to pending in every case.
    pub fn apply_edit(&mut self, key: QuoteKey, edit: QuoteEdit) -> CompareResult<bool> {
        let index = self.position(key).ok_or(CompareError::UnknownQuote(key))?;
        let invalidated = self.deal.quotes[index].apply_edit(edit)?;
        self.authority = Authority::Pending;

        debug!(quote = %key, invalidated, "Quote edited");
        Ok(invalidated)
    }

    /// Append an unsaved row.
    pub fn add_draft(&mut self, quote: QuoteRecord) -> QuoteKey {
        let index = self.deal.quotes.len();
        let key = quote.key(index);
        self.deal.quotes.push(quote);
        self.authority = Authority::Pending;
        key
    }

    /// Swap in a freshly fetched snapshot.
    pub fn replace_snapshot(&mut self, deal: DealSnapshot) {
        self.deal = deal;
        self.authority = Authority::Pending;
    }

    fn keys(&self) -> Vec<QuoteKey> {
        self.deal
            .quotes
            .iter()
            .enumerate()
            .map(|(index, quote)| quote.key(index))
            .collect()
    }

    fn position(&self, key: QuoteKey) -> Option<usize> {
        match key {
            QuoteKey::Id(id) => self.deal.quotes.iter().position(|q| q.id == Some(id)),
            QuoteKey::Draft(index) => self
                .deal
                .quotes
                .get(index)
                .filter(|q| q.id.is_none())
                .map(|_| index),
        }
    }
}
