//! Rate source trait and the in-memory dated rate table.

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use quotestack_common::{CurrencyPair, FxRate};
use tracing::debug;

use crate::error::{FxError, FxResult};

/// Trait for FX rate sources.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Latest rate for `pair` dated on or before `as_of`.
    async fn rate_on_or_before(&self, pair: &CurrencyPair, as_of: NaiveDate) -> FxResult<FxRate>;
}

/// Dated rate table held in memory.
///
/// Each pair keeps its history sorted by date so lookups take the newest
/// rate not after the requested date.
pub struct InMemoryRateSource {
    name: String,
    rates: DashMap<CurrencyPair, Vec<FxRate>>,
}

impl InMemoryRateSource {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rates: DashMap::new(),
        }
    }

    /// Build a table from rate rows, rejecting unusable rates.
    pub fn from_rates(name: impl Into<String>, rates: Vec<FxRate>) -> FxResult<Self> {
        let source = Self::new(name);
        for rate in rates {
            source.insert(rate)?;
        }
        Ok(source)
    }

    /// Parse a JSON array of rate rows.
    pub fn from_json(name: impl Into<String>, json: &str) -> FxResult<Self> {
        let rates: Vec<FxRate> =
            serde_json::from_str(json).map_err(|e| FxError::InvalidRate(e.to_string()))?;
        Self::from_rates(name, rates)
    }

    /// Add a rate. A rate for a date already present replaces it.
    pub fn insert(&self, rate: FxRate) -> FxResult<()> {
        if !rate.is_usable() {
            return Err(FxError::InvalidRate(format!("{} for {}", rate.rate, rate.pair())));
        }

        let mut history = self.rates.entry(rate.pair()).or_default();
        match history.binary_search_by_key(&rate.as_of_date, |r| r.as_of_date) {
            Ok(pos) => history[pos] = rate,
            Err(pos) => history.insert(pos, rate),
        }
        Ok(())
    }

    /// Number of stored rates across all pairs.
    pub fn len(&self) -> usize {
        self.rates.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, pair: &CurrencyPair, as_of: NaiveDate) -> Option<FxRate> {
        let history = self.rates.get(pair)?;
        let end = history.partition_point(|r| r.as_of_date <= as_of);
        end.checked_sub(1).map(|idx| history[idx].clone())
    }
}

#[async_trait]
impl RateSource for InMemoryRateSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn rate_on_or_before(&self, pair: &CurrencyPair, as_of: NaiveDate) -> FxResult<FxRate> {
        if pair.is_identity() {
            return Ok(FxRate::identity(pair.base.clone(), as_of));
        }

        match self.lookup(pair, as_of) {
            Some(rate) => {
                debug!(
                    source = %self.name,
                    pair = %pair,
                    rate = %rate.rate,
                    as_of_date = %rate.as_of_date,
                    "Found rate"
                );
                Ok(rate)
            }
            None => Err(FxError::RateNotAvailable {
                pair: pair.clone(),
                as_of,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotestack_common::Currency;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn usd_eur() -> CurrencyPair {
        CurrencyPair::new(Currency::usd(), Currency::eur())
    }

    fn make_rate(rate: Decimal, d: u32) -> FxRate {
        FxRate::new(usd_eur(), rate, day(d), "TEST")
    }

    fn seeded() -> InMemoryRateSource {
        InMemoryRateSource::from_rates(
            "test",
            vec![make_rate(dec!(1.09), 10), make_rate(dec!(1.07), 1), make_rate(dec!(1.08), 5)],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_latest_on_or_before() {
        let source = seeded();

        let rate = source.rate_on_or_before(&usd_eur(), day(7)).await.unwrap();
        assert_eq!(rate.rate, dec!(1.08));

        let rate = source.rate_on_or_before(&usd_eur(), day(10)).await.unwrap();
        assert_eq!(rate.rate, dec!(1.09));
    }

    #[tokio::test]
    async fn test_no_rate_before_date() {
        let source = seeded();
        let pair = usd_eur();

        let result = source
            .rate_on_or_before(&pair, NaiveDate::from_ymd_opt(2024, 5, 31).unwrap())
            .await;

        assert!(matches!(result, Err(FxError::RateNotAvailable { .. })));
    }

    #[tokio::test]
    async fn test_identity_pair() {
        let source = InMemoryRateSource::new("empty");
        let pair = CurrencyPair::new(Currency::usd(), Currency::usd());

        let rate = source.rate_on_or_before(&pair, day(3)).await.unwrap();

        assert_eq!(rate.rate, Decimal::ONE);
        assert_eq!(rate.as_of_date, day(3));
    }

    #[test]
    fn test_insert_replaces_same_date() {
        let source = seeded();
        source.insert(make_rate(dec!(1.11), 5)).unwrap();

        assert_eq!(source.len(), 3);
        assert_eq!(source.lookup(&usd_eur(), day(5)).unwrap().rate, dec!(1.11));
    }

    #[test]
    fn test_rejects_unusable_rate() {
        let source = InMemoryRateSource::new("test");
        assert!(matches!(
            source.insert(make_rate(dec!(-1), 1)),
            Err(FxError::InvalidRate(_))
        ));
        assert!(source.is_empty());
    }

    #[test]
    fn test_from_json_rows() {
        let json = r#"[
            {"baseCurrency": "USD", "quoteCurrency": "EUR", "rate": "1.08", "asOfDate": "2024-06-01"}
        ]"#;

        let source = InMemoryRateSource::from_json("file", json).unwrap();

        assert_eq!(source.len(), 1);
        assert_eq!(source.lookup(&usd_eur(), day(2)).unwrap().source, "");
    }
}
