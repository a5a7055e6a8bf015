//! Quote records, deal snapshots and the edit invalidation rule.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{AmountError, CurrencyError, QuoteValidationError};
use crate::identifiers::{DealId, QuoteId, QuoteKey};
use crate::monetary::{Amount, Currency};

/// One supplier's proposal for a deal, as supplied to the comparison engine.
///
/// Text fields are kept as the caller supplied them so the engine can tell a
/// blank amount from a malformed one. Every field is always present in the
/// serialized form; unknown values are `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    /// Persisted identifier; `None` for an unsaved draft row.
    #[serde(default)]
    pub id: Option<QuoteId>,
    #[serde(default)]
    pub deal_id: Option<DealId>,
    #[serde(default)]
    pub supplier: Option<String>,
    /// Decimal text in `currency`.
    #[serde(default)]
    pub amount: Option<String>,
    /// Quote currency; blank means the deal currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// `amount` converted into `base_currency`.
    #[serde(default)]
    pub amount_base: Option<String>,
    #[serde(default)]
    pub base_currency: Option<String>,
    #[serde(default)]
    pub fx_rate: Option<String>,
    #[serde(default)]
    pub fx_date: Option<String>,
    /// Lead time in days; zero or absent means unspecified.
    #[serde(default, alias = "leadTime")]
    pub lead_time_days: Option<u32>,
    /// Minimum order quantity. Informational only.
    #[serde(default)]
    pub moq: Option<u32>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |text| text.trim().is_empty())
}

impl QuoteRecord {
    /// Create a saved quote with an amount in the given currency.
    pub fn new(id: QuoteId, supplier: impl Into<String>, amount: &str, currency: &str) -> Self {
        Self {
            id: Some(id),
            supplier: Some(supplier.into()),
            amount: Some(amount.to_string()),
            currency: Some(currency.to_string()),
            ..Default::default()
        }
    }

    /// Set the lead time.
    pub fn with_lead_time(mut self, days: u32) -> Self {
        self.lead_time_days = Some(days);
        self
    }

    /// Set a previously computed normalization.
    pub fn with_amount_base(mut self, amount_base: &str, base_currency: &str) -> Self {
        self.amount_base = Some(amount_base.to_string());
        self.base_currency = Some(base_currency.to_string());
        self
    }

    pub fn with_deal(mut self, deal_id: DealId) -> Self {
        self.deal_id = Some(deal_id);
        self
    }

    /// Key used to reference this record at `index` in a snapshot.
    pub fn key(&self, index: usize) -> QuoteKey {
        QuoteKey::for_row(self.id, index)
    }

    pub fn has_supplier(&self) -> bool {
        !is_blank(&self.supplier)
    }

    pub fn has_amount_text(&self) -> bool {
        !is_blank(&self.amount)
    }

    /// A row takes part in ranking once it has a supplier, an amount or an id.
    /// Blank draft rows do not.
    pub fn is_active(&self) -> bool {
        self.id.is_some() || self.has_supplier() || self.has_amount_text()
    }

    /// Lead time with "absent" folded into zero.
    pub fn lead_time_days(&self) -> u32 {
        self.lead_time_days.unwrap_or(0)
    }

    /// Parse the raw amount. See [`Amount::parse`].
    pub fn parsed_amount(&self) -> Result<Option<Amount>, AmountError> {
        match self.amount.as_deref() {
            Some(text) => Amount::parse(text),
            None => Ok(None),
        }
    }

    /// Parse the cached normalized amount.
    pub fn parsed_amount_base(&self) -> Result<Option<Amount>, AmountError> {
        match self.amount_base.as_deref() {
            Some(text) => Amount::parse(text),
            None => Ok(None),
        }
    }

    /// The quote currency, defaulting to the deal currency when blank.
    pub fn quote_currency(&self, deal_currency: &Currency) -> Result<Currency, CurrencyError> {
        match self.currency.as_deref() {
            Some(code) if !code.trim().is_empty() => Currency::parse(code),
            _ => Ok(deal_currency.clone()),
        }
    }

    /// Whether cached FX fields are present.
    pub fn has_normalization(&self) -> bool {
        self.amount_base.is_some()
            || self.base_currency.is_some()
            || self.fx_rate.is_some()
            || self.fx_date.is_some()
    }

    /// Drop cached FX fields so the quote is normalized again.
    pub fn clear_normalization(&mut self) {
        self.amount_base = None;
        self.base_currency = None;
        self.fx_rate = None;
        self.fx_date = None;
    }

    /// Apply a partial update.
    ///
    /// Any edit touching `amount`, `currency` or `deal_id` clears the cached
    /// normalization. Returns `true` when that happened, meaning the quote
    /// has to be normalized again before it can be scored.
    pub fn apply_edit(&mut self, edit: QuoteEdit) -> Result<bool, QuoteValidationError> {
        if edit.is_empty() {
            return Err(QuoteValidationError::NoFieldsToUpdate);
        }
        edit.validate(&self.label())?;

        let invalidates = edit.amount.is_some() || edit.currency.is_some() || edit.deal_id.is_some();

        if let Some(deal_id) = edit.deal_id {
            self.deal_id = Some(deal_id);
        }
        if let Some(amount) = edit.amount {
            self.amount = Some(amount);
        }
        if let Some(currency) = edit.currency {
            self.currency = Some(currency.trim().to_uppercase());
        }
        if let Some(supplier) = edit.supplier {
            self.supplier = Some(supplier);
        }
        if let Some(days) = edit.lead_time_days {
            self.lead_time_days = Some(days);
        }
        if let Some(moq) = edit.moq {
            self.moq = Some(moq);
        }

        if invalidates {
            self.clear_normalization();
        }
        Ok(invalidates)
    }

    /// Check caller contract: positive id, non-negative amounts, well-formed
    /// currency codes. Malformed amount text is not a violation; it is
    /// reported as "no usable value" during normalization.
    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        if let Some(id) = self.id {
            if !id.is_valid() {
                return Err(QuoteValidationError::InvalidId(id));
            }
        }

        let label = self.label();
        for text in [self.amount.as_deref(), self.amount_base.as_deref()].into_iter().flatten() {
            if let Err(source @ AmountError::Negative(_)) = Amount::parse(text) {
                return Err(QuoteValidationError::Amount { quote: label, source });
            }
        }

        for code in [self.currency.as_deref(), self.base_currency.as_deref()].into_iter().flatten() {
            if code.trim().is_empty() {
                continue;
            }
            if let Err(source) = Currency::parse(code) {
                return Err(QuoteValidationError::Currency { quote: label, source });
            }
        }

        Ok(())
    }

    fn label(&self) -> String {
        match self.id {
            Some(id) => format!("quote:{}", id),
            None => "draft".to_string(),
        }
    }
}

/// Partial update to a quote. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEdit {
    #[serde(default)]
    pub deal_id: Option<DealId>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, alias = "leadTime")]
    pub lead_time_days: Option<u32>,
    #[serde(default)]
    pub moq: Option<u32>,
}

impl QuoteEdit {
    pub fn amount(amount: impl Into<String>) -> Self {
        Self {
            amount: Some(amount.into()),
            ..Default::default()
        }
    }

    pub fn currency(currency: impl Into<String>) -> Self {
        Self {
            currency: Some(currency.into()),
            ..Default::default()
        }
    }

    pub fn lead_time(days: u32) -> Self {
        Self {
            lead_time_days: Some(days),
            ..Default::default()
        }
    }

    /// No field is set.
    pub fn is_empty(&self) -> bool {
        self.deal_id.is_none()
            && self.amount.is_none()
            && self.supplier.is_none()
            && self.currency.is_none()
            && self.lead_time_days.is_none()
            && self.moq.is_none()
    }

    fn validate(&self, label: &str) -> Result<(), QuoteValidationError> {
        if let Some(amount) = self.amount.as_deref() {
            if let Err(source @ AmountError::Negative(_)) = Amount::parse(amount) {
                return Err(QuoteValidationError::Amount {
                    quote: label.to_string(),
                    source,
                });
            }
        }
        if let Some(code) = self.currency.as_deref() {
            if let Err(source) = Currency::parse(code) {
                return Err(QuoteValidationError::Currency {
                    quote: label.to_string(),
                    source,
                });
            }
        }
        Ok(())
    }
}

/// A deal and the quotes collected against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealSnapshot {
    #[serde(default)]
    pub id: Option<DealId>,
    pub base_currency: Currency,
    #[serde(default)]
    pub quotes: Vec<QuoteRecord>,
}

impl DealSnapshot {
    pub fn new(base_currency: Currency, quotes: Vec<QuoteRecord>) -> Self {
        Self {
            id: None,
            base_currency,
            quotes,
        }
    }

    /// Validate every quote, reject duplicate ids and quotes filed against
    /// another deal.
    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        validate_quotes(&self.quotes)?;

        if let Some(expected) = self.id {
            for quote in &self.quotes {
                if let (Some(id), Some(actual)) = (quote.id, quote.deal_id) {
                    if actual != expected {
                        return Err(QuoteValidationError::WrongDeal {
                            quote: id,
                            expected,
                            actual,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Validate a list of quotes and reject duplicate ids.
pub fn validate_quotes(quotes: &[QuoteRecord]) -> Result<(), QuoteValidationError> {
    let mut seen = HashSet::new();
    for quote in quotes {
        quote.validate()?;
        if let Some(id) = quote.id {
            if !seen.insert(id) {
                return Err(QuoteValidationError::DuplicateId(id));
            }
        }
    }
    Ok(())
}
