//! Property-based tests for comparison invariants
//!
//! These tests check properties that must hold for every snapshot of
//! quotes, not just the hand-picked cases in the unit tests.

use proptest::prelude::*;
use quotestack_common::{Amount, Currency, DealSnapshot, QuoteEdit, QuoteId, QuoteKey, QuoteRecord};
use quotestack_engine::{compare, compare_persisted, ComparisonBoard, BestValueSource};
use quotestack_fx::{normalize, Normalization};
use rust_decimal::Decimal;

// ============================================================================
// Generators
// ============================================================================

/// Amount text with up to four decimal places.
fn amount_text() -> impl Strategy<Value = String> {
    (0i64..10_000_000i64, 0u32..5u32).prop_map(|(units, scale)| Decimal::new(units, scale).to_string())
}

fn currency_code() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("USD"), Just("EUR"), Just("GBP")]
}

/// Amount text as users type it: well-formed, blank or malformed.
fn any_amount_text() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => amount_text(),
        1 => Just(String::new()),
        1 => Just("   ".to_string()),
        1 => prop_oneof![Just("12abc"), Just("1,00"), Just("n/a")].prop_map(String::from),
    ]
}

/// Currency fields as stored: mixed case, padded, blank or absent.
fn any_currency() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        4 => currency_code().prop_map(|c| Some(c.to_string())),
        1 => Just(Some("usd".to_string())),
        1 => Just(Some(" eur ".to_string())),
        1 => Just(Some(String::new())),
        1 => Just(None),
    ]
}

/// Whether a stored currency field resolves to something other than USD.
fn is_foreign(currency: &Option<String>) -> bool {
    match currency.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => !code.eq_ignore_ascii_case("USD"),
        _ => false,
    }
}

/// An active row; foreign rows carry a USD normalization about half the
/// time. The flag marks rows that get a persisted id.
fn active_row() -> impl Strategy<Value = (QuoteRecord, bool)> {
    (
        any_amount_text(),
        any_currency(),
        0u32..30u32,
        any::<bool>(),
        amount_text(),
        prop::bool::weighted(0.8),
    )
        .prop_map(|(amount, currency, lead, normalized, base, saved)| {
            let mut quote = QuoteRecord {
                supplier: Some("Walk-in".to_string()),
                amount: Some(amount),
                lead_time_days: Some(lead),
                ..Default::default()
            };
            if is_foreign(&currency) && normalized {
                quote = quote.with_amount_base(&base, "USD");
            }
            quote.currency = currency;
            (quote, saved)
        })
}

/// Saved rows get ids 1, 2, ... in row order; the rest stay drafts.
fn snapshot() -> impl Strategy<Value = Vec<QuoteRecord>> {
    prop::collection::vec(active_row(), 1..8).prop_map(|rows| {
        let mut next_id = 0;
        rows.into_iter()
            .map(|(mut quote, saved)| {
                if saved {
                    next_id += 1;
                    quote.id = Some(QuoteId::new(next_id));
                    quote.supplier = Some(format!("Supplier {}", next_id));
                }
                quote
            })
            .collect()
    })
}

/// Rows that are not active: no id, no supplier and no amount.
fn inactive_row() -> impl Strategy<Value = QuoteRecord> {
    (currency_code(), 0u32..30u32, prop::option::of(Just("  ".to_string()))).prop_map(
        |(currency, lead, supplier)| QuoteRecord {
            supplier,
            currency: Some(currency.to_string()),
            lead_time_days: Some(lead),
            ..Default::default()
        },
    )
}

fn usd() -> Currency {
    Currency::usd()
}

// ============================================================================
// Normalization Invariants
// ============================================================================

proptest! {
    /// Property: same-currency normalization returns the amount exactly
    #[test]
    fn identity_normalization_is_exact(amount in amount_text()) {
        let quote = QuoteRecord::new(QuoteId::new(1), "Acme", &amount, "USD");

        let normalization = normalize(&quote, &usd());

        let expected = Amount::parse_required(&amount).unwrap();
        prop_assert_eq!(normalization.clone(), Normalization::Identity(expected));
        prop_assert_eq!(
            normalization.amount_base().unwrap().canonical(),
            expected.canonical()
        );
    }

    /// Property: a currency edit always clears the cached normalization
    #[test]
    fn currency_edit_leaves_quote_unscored(
        amount in amount_text(),
        base in amount_text(),
        currency in prop_oneof![Just("EUR"), Just("GBP"), Just("JPY")],
    ) {
        let mut quote = QuoteRecord::new(QuoteId::new(1), "Acme", &amount, "CHF")
            .with_amount_base(&base, "USD");

        prop_assert!(quote.apply_edit(QuoteEdit::currency(currency)).unwrap());

        prop_assert!(quote.amount_base.is_none());
        prop_assert!(normalize(&quote, &usd()).is_unscored());
        let result = compare(&usd(), &[quote]).unwrap();
        prop_assert_eq!(result.unscored_quote_ids, vec![QuoteKey::Id(QuoteId::new(1))]);
    }
}

// ============================================================================
// Comparison Invariants
// ============================================================================

proptest! {
    /// Property: unscored quotes never win on price or value
    #[test]
    fn unscored_quotes_never_ranked(quotes in snapshot()) {
        let result = compare(&usd(), &quotes).unwrap();

        for key in &result.unscored_quote_ids {
            prop_assert_ne!(result.best_price_quote_id, Some(*key));
            prop_assert_ne!(result.best_quote_id, Some(*key));
            prop_assert!(result.ranked(*key).is_none());
        }

        for (index, quote) in quotes.iter().enumerate() {
            let expected = is_foreign(&quote.currency) && quote.amount_base.is_none();
            prop_assert_eq!(result.is_unscored(quote.key(index)), expected);
        }
    }

    /// Property: best lead time ignores unspecified lead times
    #[test]
    fn best_lead_time_ignores_zero(quotes in snapshot()) {
        let result = compare(&usd(), &quotes).unwrap();

        let specified: Vec<u32> = quotes
            .iter()
            .map(|q| q.lead_time_days())
            .filter(|days| *days > 0)
            .collect();

        match specified.iter().min() {
            None => {
                prop_assert_eq!(result.best_lead_time_quote_id, None);
                prop_assert_eq!(result.best_lead_time_days, None);
            }
            Some(min) => prop_assert_eq!(result.best_lead_time_days, Some(*min)),
        }
        for row in &result.ranking {
            prop_assert!(row.lead_time_days > 0);
            prop_assert!(row.amount_base.is_positive());
        }
    }

    /// Property: scores are rank sums and the ranking is sorted by score
    #[test]
    fn ranking_scores_are_rank_sums(quotes in snapshot()) {
        let result = compare(&usd(), &quotes).unwrap();
        let n = result.ranking.len();

        for row in &result.ranking {
            prop_assert_eq!(row.score, row.price_rank + row.lead_time_rank);
            prop_assert!(row.price_rank < n && row.lead_time_rank < n);
        }
        for pair in result.ranking.windows(2) {
            prop_assert!(pair[0].score <= pair[1].score);
        }
        prop_assert_eq!(result.best_quote_id, result.ranking.first().map(|r| r.quote));
    }

    /// Property: identical input gives byte-identical output
    #[test]
    fn comparison_is_idempotent(quotes in snapshot()) {
        let first = serde_json::to_vec(&compare(&usd(), &quotes).unwrap()).unwrap();
        let second = serde_json::to_vec(&compare(&usd(), &quotes).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: draft keys only ever name unsaved active rows
    #[test]
    fn draft_keys_name_active_rows(quotes in snapshot()) {
        let result = compare(&usd(), &quotes).unwrap();

        let mut keys: Vec<QuoteKey> = result.unscored_quote_ids.clone();
        keys.extend(result.ranking.iter().map(|row| row.quote));
        keys.extend(result.best_price_quote_id);
        keys.extend(result.best_lead_time_quote_id);

        for key in keys {
            if let QuoteKey::Draft(index) = key {
                prop_assert!(quotes[index].id.is_none());
                prop_assert!(quotes[index].is_active());
            }
        }
    }

    /// Property: inactive draft rows change nothing
    #[test]
    fn inactive_rows_never_appear(
        quotes in snapshot(),
        drafts in prop::collection::vec(inactive_row(), 1..4),
    ) {
        let baseline = compare(&usd(), &quotes).unwrap();

        let mut padded = quotes.clone();
        padded.extend(drafts);
        let result = compare(&usd(), &padded).unwrap();

        prop_assert_eq!(result, baseline);
    }

    /// Property: local estimate and authoritative comparison agree
    #[test]
    fn local_and_authoritative_converge(quotes in snapshot()) {
        let quotes: Vec<QuoteRecord> = quotes.into_iter().filter(|q| q.id.is_some()).collect();
        prop_assume!(!quotes.is_empty());
        let ids: Vec<QuoteId> = quotes.iter().rev().filter_map(|q| q.id).collect();
        let board = ComparisonBoard::new(DealSnapshot::new(usd(), quotes.clone()));

        let authoritative = compare_persisted(&usd(), &quotes, &ids).unwrap();
        let estimate = board.estimate().unwrap();
        prop_assert_eq!(&estimate, &authoritative);

        let mut board = board;
        board.resolve(authoritative.best_quote_id.and_then(|key| key.quote_id()));
        let best = board.best_value().unwrap();
        prop_assert_eq!(best.source, BestValueSource::Authoritative);
        prop_assert_eq!(best.quote, estimate.best_quote_id);
    }
}

// ============================================================================
// Examples
// ============================================================================

#[test]
fn rank_sum_example() {
    let quotes = vec![
        QuoteRecord::new(QuoteId::new(1), "Acme", "100", "USD").with_lead_time(5),
        QuoteRecord::new(QuoteId::new(2), "Globex", "90", "USD").with_lead_time(10),
        QuoteRecord::new(QuoteId::new(3), "Initech", "80", "USD").with_lead_time(20),
    ];

    let result = compare(&usd(), &quotes).unwrap();

    assert_eq!(result.best_price_quote_id, Some(QuoteKey::Id(QuoteId::new(3))));
    assert_eq!(result.best_lead_time_quote_id, Some(QuoteKey::Id(QuoteId::new(1))));
    assert!(result.ranking.iter().all(|row| row.score == 2));
    assert_eq!(result.best_quote_id, Some(QuoteKey::Id(QuoteId::new(1))));
}
