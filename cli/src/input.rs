//! Loading deal snapshots and rate tables from disk.

use std::path::Path;

use anyhow::Context;
use quotestack_common::{DealSnapshot, QuoteId};
use quotestack_fx::InMemoryRateSource;

/// Read a deal snapshot JSON file.
pub fn load_deal(path: &Path) -> anyhow::Result<DealSnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read deal file {}", path.display()))?;
    parse_deal(&text).with_context(|| format!("Invalid deal file {}", path.display()))
}

pub fn parse_deal(text: &str) -> anyhow::Result<DealSnapshot> {
    Ok(serde_json::from_str(text)?)
}

/// Read a rate table JSON file: an array of dated rate rows.
pub fn load_rates(path: &Path) -> anyhow::Result<InMemoryRateSource> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rates file {}", path.display()))?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rates".to_string());

    InMemoryRateSource::from_json(name, &text)
        .with_context(|| format!("Invalid rates file {}", path.display()))
}

/// Parse a comma separated id list such as `1,2,3`.
///
/// Range checks are left to the comparison so the caller gets the same
/// error codes as any other client.
pub fn parse_quote_ids(text: &str) -> anyhow::Result<Vec<QuoteId>> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map(QuoteId::new)
                .with_context(|| format!("Quote id is not an integer: {}", part))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotestack_common::Currency;

    #[test]
    fn test_parse_deal() {
        let deal = parse_deal(
            r#"{
                "id": 7,
                "baseCurrency": "USD",
                "quotes": [
                    {"id": 1, "supplier": "Acme", "amount": "100.00", "currency": "EUR", "leadTime": 5},
                    {"supplier": "", "amount": ""}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(deal.base_currency, Currency::usd());
        assert_eq!(deal.quotes.len(), 2);
        assert_eq!(deal.quotes[0].lead_time_days(), 5);
        assert!(!deal.quotes[1].is_active());
    }

    #[test]
    fn test_parse_deal_rejects_bad_currency() {
        assert!(parse_deal(r#"{"baseCurrency": "dollars"}"#).is_err());
    }

    #[test]
    fn test_parse_quote_ids() {
        let ids = parse_quote_ids("3, 1,,2").unwrap();
        assert_eq!(ids, vec![QuoteId::new(3), QuoteId::new(1), QuoteId::new(2)]);

        // Non-positive ids are rejected later by the comparison.
        assert_eq!(parse_quote_ids("-1").unwrap(), vec![QuoteId::new(-1)]);
        assert!(parse_quote_ids("1,x").is_err());
    }
}
