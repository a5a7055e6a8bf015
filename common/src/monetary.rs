//! Monetary types for QuoteStack.
//!
//! Amounts are exact base-10 decimals. Nothing in this module goes through
//! binary floating point, so `"100"` and `"100.00"` compare equal and an
//! identity conversion never drifts.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::{AmountError, CurrencyError};

/// Largest number of fractional digits a [`Decimal`] can carry.
const MAX_SCALE: u32 = 28;

/// A non-negative, exact decimal amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(Decimal);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Parse an amount from user or storage text.
    ///
    /// Returns `Ok(None)` for empty or whitespace-only input, which callers
    /// treat as "no amount". Malformed text and negative values are errors.
    /// Parsing is exact: text with more precision than a decimal can hold is
    /// rejected rather than rounded.
    pub fn parse(text: &str) -> Result<Option<Self>, AmountError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let parsed = match trimmed.split_once(|c: char| c == 'e' || c == 'E') {
            Some((mantissa, exponent)) => parse_scientific_exact(mantissa, exponent),
            None => Decimal::from_str_exact(trimmed).ok(),
        };
        let value = parsed.ok_or_else(|| AmountError::Invalid(trimmed.to_string()))?;

        Self::from_decimal(value)
            .map(Some)
            .map_err(|_| AmountError::Negative(trimmed.to_string()))
    }

    /// Parse an amount that must be present.
    pub fn parse_required(text: &str) -> Result<Self, AmountError> {
        Self::parse(text)?.ok_or(AmountError::Missing)
    }

    /// Wrap a decimal, rejecting negative values.
    pub fn from_decimal(value: Decimal) -> Result<Self, AmountError> {
        if value.is_zero() {
            // Drop the sign of "-0" but keep its scale.
            return Ok(Self(value.abs()));
        }
        if value.is_sign_negative() {
            return Err(AmountError::Negative(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Get the underlying decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Exact three-way comparison.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }

    /// Check if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Canonical text with trailing fractional zeros removed.
    pub fn canonical(&self) -> String {
        self.0.normalize().to_string()
    }

    /// Render with `,` thousands separators and exactly `decimals` fractional
    /// digits, rounding half away from zero.
    pub fn to_display_string(&self, decimals: u32) -> String {
        let decimals = decimals.min(MAX_SCALE);
        let rounded = self
            .0
            .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
        let text = format!("{:.*}", decimals as usize, rounded);

        match text.split_once('.') {
            Some((whole, fraction)) => format!("{}.{}", group_thousands(whole), fraction),
            None => group_thousands(&text),
        }
    }
}

/// Scientific notation without rounding: `None` when the value needs more
/// than 28 fractional digits or does not fit in 96 bits.
fn parse_scientific_exact(mantissa: &str, exponent: &str) -> Option<Decimal> {
    let mantissa = Decimal::from_str_exact(mantissa).ok()?;
    let exponent: i64 = exponent.parse().ok()?;

    let scale = i64::from(mantissa.scale()) - exponent;
    if scale > i64::from(MAX_SCALE) {
        return None;
    }
    if scale >= 0 {
        return Decimal::try_from_i128_with_scale(mantissa.mantissa(), scale as u32).ok();
    }

    let factor = 10i128.checked_pow(u32::try_from(-scale).ok()?)?;
    let digits = mantissa.mantissa().checked_mul(factor)?;
    Decimal::try_from_i128_with_scale(digits, 0).ok()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse_required(&text)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}

/// ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Create a currency from a code, trimming and uppercasing it.
    ///
    /// Does not validate; use [`Currency::parse`] for untrusted input.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Parse a three-letter currency code.
    pub fn parse(code: &str) -> Result<Self, CurrencyError> {
        let currency = Self::new(code);
        if currency.is_valid() {
            Ok(currency)
        } else {
            Err(CurrencyError(code.to_string()))
        }
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Exactly three ASCII uppercase letters.
    pub fn is_valid(&self) -> bool {
        self.0.len() == 3 && self.0.bytes().all(|b| b.is_ascii_uppercase())
    }

    /// Get the standard decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "KRW" | "VND" => 0,
            "BHD" | "KWD" | "OMR" => 3,
            _ => 2,
        }
    }

    /// Common currencies
    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn gbp() -> Self {
        Self::new("GBP")
    }

    pub fn jpy() -> Self {
        Self::new("JPY")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Currency {
    type Error = CurrencyError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::parse(&code)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

/// An amount denominated in a currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Amount,
    pub currency: Currency,
}

impl Money {
    /// Create a new Money instance.
    pub fn new(amount: Amount, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create from a string value.
    pub fn from_str(value: &str, currency: Currency) -> Result<Self, AmountError> {
        Ok(Self {
            amount: Amount::parse_required(value)?,
            currency,
        })
    }

    /// Display text with the currency code prefixed, e.g. `USD 1,234.50`.
    pub fn display(&self, decimals: u32) -> String {
        format!("{} {}", self.currency, self.amount.to_display_string(decimals))
    }

    /// Display text using the currency's standard decimal places.
    pub fn display_default(&self) -> String {
        self.display(self.currency.decimal_places())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}

/// A currency pair for FX operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Currency amounts are converted into (the deal currency).
    pub base: Currency,
    /// Currency amounts are quoted in.
    pub quote: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }

    /// Both sides are the same currency.
    pub fn is_identity(&self) -> bool {
        self.base == self.quote
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// A dated FX rate.
///
/// Multiplying an amount in `quote_currency` by `rate` yields the amount in
/// `base_currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxRate {
    pub base_currency: Currency,
    pub quote_currency: Currency,
    pub rate: Decimal,
    /// Date the rate was captured.
    pub as_of_date: NaiveDate,
    /// Rate source.
    #[serde(default)]
    pub source: String,
}

impl FxRate {
    /// Create a new FX rate.
    pub fn new(
        pair: CurrencyPair,
        rate: Decimal,
        as_of_date: NaiveDate,
        source: impl Into<String>,
    ) -> Self {
        Self {
            base_currency: pair.base,
            quote_currency: pair.quote,
            rate,
            as_of_date,
            source: source.into(),
        }
    }

    /// The rate between a currency and itself.
    pub fn identity(currency: Currency, as_of_date: NaiveDate) -> Self {
        Self::new(
            CurrencyPair::new(currency.clone(), currency),
            Decimal::ONE,
            as_of_date,
            "IDENTITY",
        )
    }

    /// Get the currency pair.
    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.base_currency.clone(), self.quote_currency.clone())
    }

    /// Rates must be strictly positive to be usable.
    pub fn is_usable(&self) -> bool {
        self.rate > Decimal::ZERO
    }
}
