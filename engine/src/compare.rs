//! Comparison over a snapshot of quotes.

use quotestack_common::{validate_quotes, Currency, DealSnapshot, QuoteRecord};
use quotestack_fx::normalize;
use tracing::debug;

use crate::error::CompareResult;
use crate::ranking::{best_lead_time, best_price, rank_best_value, RankInput};
use crate::result::ComparisonResult;

/// Compare `quotes` in `base_currency`.
///
/// Pure and idempotent. Inactive draft rows are ignored entirely. Quotes in
/// a foreign currency without a cached normalization are listed as unscored
/// and take no part in price or value ranking; they can still hold the best
/// lead time.
pub fn compare(base_currency: &Currency, quotes: &[QuoteRecord]) -> CompareResult<ComparisonResult> {
    validate_quotes(quotes)?;

    let mut rows = Vec::with_capacity(quotes.len());
    let mut unscored = Vec::new();

    for (index, quote) in quotes.iter().enumerate() {
        if !quote.is_active() {
            continue;
        }

        let key = quote.key(index);
        let normalization = normalize(quote, base_currency);
        if normalization.is_unscored() {
            unscored.push(key);
        }
        rows.push(RankInput::new(key, normalization.amount_base(), quote.lead_time_days()));
    }

    let mut result = ComparisonResult::empty(base_currency.clone());
    result.unscored_quote_ids = unscored;

    if let Some((key, amount)) = best_price(&rows) {
        result.best_price_quote_id = Some(key);
        result.best_price = Some(amount);
    }
    if let Some((key, days)) = best_lead_time(&rows) {
        result.best_lead_time_quote_id = Some(key);
        result.best_lead_time_days = Some(days);
    }

    result.ranking = rank_best_value(&rows);
    result.best_quote_id = result.ranking.first().map(|row| row.quote);

    debug!(
        base_currency = %base_currency,
        active = rows.len(),
        candidates = result.ranking.len(),
        unscored = result.unscored_quote_ids.len(),
        best_quote = ?result.best_quote_id,
        "Quotes compared"
    );

    Ok(result)
}

/// Compare every quote of a deal after checking the snapshot.
pub fn compare_deal(deal: &DealSnapshot) -> CompareResult<ComparisonResult> {
    deal.validate()?;
    compare(&deal.base_currency, &deal.quotes)
}
