//! Printable comparison report.

use quotestack_engine::{BestValue, ComparisonResult};
use serde::Serialize;

/// What `quotestack compare` prints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareReport {
    pub comparison: ComparisonResult,
    pub best_value: BestValue,
    /// Best price formatted for people, e.g. `USD 2,500.50`.
    pub best_price_display: Option<String>,
    /// Quotes the annotation pass found no rate for.
    pub missing_rate: Vec<String>,
}

impl CompareReport {
    pub fn new(comparison: ComparisonResult, best_value: BestValue, display_decimals: u32) -> Self {
        let best_price_display = comparison
            .best_price_money()
            .map(|money| money.display(display_decimals));

        Self {
            comparison,
            best_value,
            best_price_display,
            missing_rate: Vec::new(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotestack_common::{Currency, DealSnapshot, QuoteId, QuoteRecord};
    use quotestack_engine::ComparisonBoard;

    #[test]
    fn test_report_formats_best_price() {
        let board = ComparisonBoard::new(DealSnapshot::new(
            Currency::usd(),
            vec![
                QuoteRecord::new(QuoteId::new(1), "Acme", "2500.5", "USD").with_lead_time(3),
                QuoteRecord::new(QuoteId::new(2), "Globex", "3100", "USD").with_lead_time(2),
            ],
        ));

        let report = CompareReport::new(board.estimate().unwrap(), board.best_value().unwrap(), 2);

        assert_eq!(report.best_price_display.as_deref(), Some("USD 2,500.50"));
        let json = report.to_json(false).unwrap();
        assert!(json.contains(r#""bestValue":{"quote":1,"source":"local_estimate"}"#));
    }

    #[test]
    fn test_report_without_prices() {
        let board = ComparisonBoard::new(DealSnapshot::new(Currency::eur(), Vec::new()));

        let report = CompareReport::new(board.estimate().unwrap(), board.best_value().unwrap(), 2);

        assert_eq!(report.best_price_display, None);
        assert!(report.to_json(true).unwrap().contains("\"bestQuoteId\": null"));
    }
}
