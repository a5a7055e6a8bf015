//! Pre-populates quotes with their deal-currency amount.
//!
//! This is the FX collaborator that runs before a comparison: it looks up a
//! dated rate for each foreign-currency quote and writes `amountBase`,
//! `baseCurrency`, `fxRate` and `fxDate` onto the record.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use quotestack_common::{
    format_fx_date, Currency, CurrencyPair, DealSnapshot, FxRate, Money, QuoteKey, QuoteRecord,
};
use tracing::{debug, info, instrument, warn};

use crate::conversion::convert;
use crate::error::{FxError, FxResult};
use crate::normalize::{normalize, Normalization};
use crate::provider::RateSource;

/// Configuration for the annotator.
#[derive(Debug, Clone, Default)]
pub struct FxAnnotatorConfig {
    /// Rates older than this relative to the lookup date are not used.
    pub max_rate_age: Option<Duration>,
    /// Recompute quotes that already carry a usable normalization.
    pub refresh_existing: bool,
}

/// What happened to one quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    /// Quote is in the deal currency; rate 1.
    Identity,
    /// Converted with a looked-up rate.
    Converted,
    /// Already carried a usable normalization and was left alone.
    Kept,
    /// No amount, nothing to convert.
    Skipped,
}

/// Summary of annotating a deal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationReport {
    pub identity: usize,
    pub converted: usize,
    pub kept: usize,
    pub skipped: usize,
    /// Quotes left without a normalization because no usable rate exists.
    pub missing_rate: Vec<QuoteKey>,
}

/// Annotates quotes using an explicitly supplied rate source.
pub struct FxAnnotator {
    source: Arc<dyn RateSource>,
    config: FxAnnotatorConfig,
}

impl FxAnnotator {
    /// Create a new annotator with the given source.
    pub fn new(source: Arc<dyn RateSource>, config: FxAnnotatorConfig) -> Self {
        Self { source, config }
    }

    /// Get a rate, enforcing the configured maximum age.
    #[instrument(skip(self), fields(source = self.source.name(), pair = %pair))]
    pub async fn get_rate(&self, pair: &CurrencyPair, as_of: NaiveDate) -> FxResult<FxRate> {
        let rate = self.source.rate_on_or_before(pair, as_of).await?;

        if let Some(max_age) = self.config.max_rate_age {
            if as_of.signed_duration_since(rate.as_of_date) > max_age {
                return Err(FxError::RateExpired {
                    pair: pair.clone(),
                    rate_date: rate.as_of_date,
                    as_of,
                });
            }
        }

        Ok(rate)
    }

    /// Annotate one quote.
    ///
    /// Fails with [`FxError::RateNotAvailable`] when a foreign-currency quote
    /// has no rate; in that case the quote's cached fields are cleared.
    pub async fn annotate_quote(
        &self,
        quote: &mut QuoteRecord,
        deal_currency: &Currency,
        as_of: NaiveDate,
    ) -> FxResult<Annotation> {
        let amount = match quote.parsed_amount() {
            Ok(Some(amount)) => amount,
            Ok(None) | Err(_) => {
                quote.clear_normalization();
                return Ok(Annotation::Skipped);
            }
        };

        if !self.config.refresh_existing {
            if let Normalization::Converted { .. } = normalize(quote, deal_currency) {
                return Ok(Annotation::Kept);
            }
        }

        let quote_currency = quote.quote_currency(deal_currency)?;
        if quote.currency.as_deref().map_or(true, |c| c.trim().is_empty()) {
            quote.currency = Some(quote_currency.code().to_string());
        }

        let pair = CurrencyPair::new(deal_currency.clone(), quote_currency.clone());
        let rate = if pair.is_identity() {
            FxRate::identity(deal_currency.clone(), as_of)
        } else {
            match self.get_rate(&pair, as_of).await {
                Ok(rate) => rate,
                Err(e) => {
                    quote.clear_normalization();
                    return Err(e);
                }
            }
        };

        let conversion = convert(&Money::new(amount, quote_currency), &rate)?;

        quote.amount_base = Some(conversion.output.amount.to_string());
        quote.base_currency = Some(deal_currency.code().to_string());
        quote.fx_rate = Some(conversion.rate.to_string());
        quote.fx_date = Some(format_fx_date(conversion.fx_date));

        debug!(
            quote = ?quote.id,
            pair = %pair,
            amount_base = %conversion.output.amount,
            "Quote annotated"
        );

        Ok(if conversion.is_identity() {
            Annotation::Identity
        } else {
            Annotation::Converted
        })
    }

    /// Annotate every quote of a deal.
    ///
    /// Quotes without a usable rate are left unannotated, so the comparison
    /// reports them as unscored. Other failures abort.
    #[instrument(skip(self, deal), fields(deal_id = ?deal.id, quotes = deal.quotes.len()))]
    pub async fn annotate_deal(
        &self,
        deal: &mut DealSnapshot,
        as_of: NaiveDate,
    ) -> FxResult<AnnotationReport> {
        let mut report = AnnotationReport::default();
        let deal_currency = deal.base_currency.clone();

        for (index, quote) in deal.quotes.iter_mut().enumerate() {
            if !quote.is_active() {
                continue;
            }

            match self.annotate_quote(quote, &deal_currency, as_of).await {
                Ok(Annotation::Identity) => report.identity += 1,
                Ok(Annotation::Converted) => report.converted += 1,
                Ok(Annotation::Kept) => report.kept += 1,
                Ok(Annotation::Skipped) => report.skipped += 1,
                Err(e) if e.leaves_quote_unscored() => {
                    warn!(
                        quote = %quote.key(index),
                        error = %e,
                        code = e.error_code(),
                        "No usable FX rate, quote will be unscored"
                    );
                    report.missing_rate.push(quote.key(index));
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            identity = report.identity,
            converted = report.converted,
            kept = report.kept,
            skipped = report.skipped,
            missing_rate = report.missing_rate.len(),
            "Deal annotated"
        );

        Ok(report)
    }
}
