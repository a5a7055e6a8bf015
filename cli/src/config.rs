//! CLI configuration.

use chrono::NaiveDate;
use quotestack_common::parse_fx_date;

/// Largest scale a decimal amount can carry.
const MAX_DISPLAY_DECIMALS: u32 = 28;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Some(LogFormat::Plain),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Main CLI configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Log output format.
    pub log_format: LogFormat,
    /// Decimal places used when displaying amounts.
    pub display_decimals: u32,
    /// Date used for rate lookups; today when unset.
    pub as_of: Option<NaiveDate>,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Plain,
            display_decimals: 2,
            as_of: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Values that fail to parse leave the default in place; `validate`
    /// catches values that parse but are out of range.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(format) = lookup("QUOTESTACK_LOG_FORMAT").as_deref().and_then(LogFormat::parse) {
            config.log_format = format;
        }

        if let Some(decimals) = lookup("QUOTESTACK_DISPLAY_DECIMALS") {
            if let Ok(decimals) = decimals.trim().parse() {
                config.display_decimals = decimals;
            }
        }

        if let Some(date) = lookup("QUOTESTACK_AS_OF") {
            config.as_of = parse_fx_date(&date);
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.display_decimals > MAX_DISPLAY_DECIMALS {
            return Err(format!(
                "Display decimals cannot exceed {}",
                MAX_DISPLAY_DECIMALS
            ));
        }

        if self.log_level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        Ok(())
    }
}
