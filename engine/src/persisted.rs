//! Authoritative comparison over persisted quotes.
//!
//! This is the path the owning service runs when a caller asks for a
//! comparison of specific saved quotes. It applies the request checks and
//! then runs the same ranking core as [`crate::compare`], so a local estimate
//! over the same snapshot always agrees with it.

use std::collections::{BTreeSet, HashSet};

use quotestack_common::{Currency, QuoteId, QuoteRecord};
use tracing::{info, instrument};

use crate::compare::compare;
use crate::error::{CompareError, CompareResult};
use crate::result::ComparisonResult;

/// Compare the stored quotes named by `quote_ids`.
///
/// - Every id must be positive.
/// - Duplicate ids are ignored.
/// - Every id must exist in `stored`.
/// - The selected quotes must belong to one deal and their cached
///   normalizations must share one base currency.
///
/// Selected quotes are ranked in `stored` order, not request order, so ties
/// resolve the same way as a comparison over the whole snapshot.
#[instrument(skip(stored), fields(stored = stored.len(), requested = quote_ids.len()))]
pub fn compare_persisted(
    deal_currency: &Currency,
    stored: &[QuoteRecord],
    quote_ids: &[QuoteId],
) -> CompareResult<ComparisonResult> {
    let invalid: Vec<QuoteId> = quote_ids.iter().copied().filter(|id| !id.is_valid()).collect();
    if !invalid.is_empty() {
        return Err(CompareError::InvalidQuoteIds(invalid));
    }
    if quote_ids.is_empty() {
        return Err(CompareError::NoQuotes);
    }

    let mut seen = HashSet::new();
    let requested: Vec<QuoteId> = quote_ids.iter().copied().filter(|id| seen.insert(*id)).collect();

    let selected: Vec<QuoteRecord> = stored
        .iter()
        .filter(|quote| quote.id.map_or(false, |id| seen.contains(&id)))
        .cloned()
        .collect();

    let found: HashSet<QuoteId> = selected.iter().filter_map(|quote| quote.id).collect();
    let missing: Vec<QuoteId> = requested.into_iter().filter(|id| !found.contains(id)).collect();
    if !missing.is_empty() {
        return Err(CompareError::QuoteNotFound(missing));
    }

    let deals: HashSet<_> = selected.iter().map(|quote| quote.deal_id).collect();
    if deals.len() > 1 {
        return Err(CompareError::MismatchedDeals);
    }

    let base_currencies: BTreeSet<String> = selected
        .iter()
        .filter_map(|quote| quote.base_currency.as_deref())
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
        .collect();
    if base_currencies.len() > 1 {
        return Err(CompareError::MismatchedCurrency(base_currencies.into_iter().collect()));
    }

    let result = compare(deal_currency, &selected)?;

    info!(
        best_quote = ?result.best_quote_id,
        unscored = result.unscored_quote_ids.len(),
        "Authoritative comparison complete"
    );

    Ok(result)
}
