//! Ranking primitives.
//!
//! Every function here scans rows in input order and only replaces a leader
//! on a strict improvement, so ties always go to the first row encountered.
//! Sorts are stable for the same reason.

use quotestack_common::{Amount, QuoteKey};

use crate::result::RankedQuote;

/// The ranking-relevant view of one active quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankInput {
    pub key: QuoteKey,
    /// Amount in the deal currency, when the quote could be normalized.
    pub amount_base: Option<Amount>,
    /// Zero means unspecified.
    pub lead_time_days: u32,
}

impl RankInput {
    pub fn new(key: QuoteKey, amount_base: Option<Amount>, lead_time_days: u32) -> Self {
        Self {
            key,
            amount_base,
            lead_time_days,
        }
    }

    /// Needs a positive normalized amount and a specified lead time.
    fn is_value_candidate(&self) -> bool {
        self.lead_time_days > 0 && self.amount_base.map_or(false, |a| a.is_positive())
    }
}

/// Lowest normalized amount. Zero amounts take part.
pub fn best_price(rows: &[RankInput]) -> Option<(QuoteKey, Amount)> {
    let mut best: Option<(QuoteKey, Amount)> = None;
    for row in rows {
        let Some(amount) = row.amount_base else {
            continue;
        };
        if best.map_or(true, |(_, current)| amount < current) {
            best = Some((row.key, amount));
        }
    }
    best
}

/// Shortest lead time, ignoring rows where it is unspecified.
pub fn best_lead_time(rows: &[RankInput]) -> Option<(QuoteKey, u32)> {
    let mut best: Option<(QuoteKey, u32)> = None;
    for row in rows.iter().filter(|row| row.lead_time_days > 0) {
        if best.map_or(true, |(_, current)| row.lead_time_days < current) {
            best = Some((row.key, row.lead_time_days));
        }
    }
    best
}

/// Rank-sum scoring over the best-value candidates.
///
/// Each candidate gets its 0-based position in a stable ascending sort by
/// amount and another by lead time; the score is their sum. The returned
/// rows are ordered by score, equal scores keeping input order, so the first
/// row is the best-value quote.
pub fn rank_best_value(rows: &[RankInput]) -> Vec<RankedQuote> {
    let candidates: Vec<(QuoteKey, Amount, u32)> = rows
        .iter()
        .filter(|row| row.is_value_candidate())
        .filter_map(|row| row.amount_base.map(|a| (row.key, a, row.lead_time_days)))
        .collect();

    let mut by_price: Vec<usize> = (0..candidates.len()).collect();
    by_price.sort_by(|&a, &b| candidates[a].1.compare(&candidates[b].1));

    let mut by_lead: Vec<usize> = (0..candidates.len()).collect();
    by_lead.sort_by_key(|&i| candidates[i].2);

    let price_rank = positions(&by_price);
    let lead_rank = positions(&by_lead);

    let mut ranking: Vec<RankedQuote> = candidates
        .iter()
        .enumerate()
        .map(|(i, &(quote, amount_base, lead_time_days))| RankedQuote {
            quote,
            score: price_rank[i] + lead_rank[i],
            price_rank: price_rank[i],
            lead_time_rank: lead_rank[i],
            amount_base,
            lead_time_days,
        })
        .collect();

    ranking.sort_by_key(|row| row.score);
    ranking
}

/// Invert a sorted index list into rank-by-index.
fn positions(order: &[usize]) -> Vec<usize> {
    let mut ranks = vec![0; order.len()];
    for (rank, &idx) in order.iter().enumerate() {
        ranks[idx] = rank;
    }
    ranks
}
