//! QuoteStack CLI
//!
//! Normalizes a deal's supplier quotes into the deal currency and compares
//! them.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use quotestack_common::{parse_fx_date, today, DealSnapshot, QuoteId};
use quotestack_engine::{compare_deal, compare_persisted, ComparisonBoard};
use quotestack_fx::{FxAnnotator, FxAnnotatorConfig};

mod config;
mod input;
mod report;

use config::{AppConfig, LogFormat};
use report::CompareReport;

/// QuoteStack CLI
#[derive(Parser, Debug)]
#[command(name = "quotestack")]
#[command(about = "Normalize and compare supplier quotes")]
struct Args {
    /// Log as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare the quotes of a deal
    Compare {
        /// Deal snapshot JSON file
        #[arg(long)]
        deal: PathBuf,

        /// Rate table JSON file; quotes are annotated before comparing
        #[arg(long)]
        rates: Option<PathBuf>,

        /// Rate lookup date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        as_of: Option<NaiveDate>,

        /// Compare only these saved quotes, e.g. 1,2,3
        #[arg(long)]
        quote_ids: Option<String>,

        /// Best quote id reported by the owning service
        #[arg(long)]
        authoritative: Option<i64>,

        /// Decimal places for displayed amounts
        #[arg(long)]
        decimals: Option<u32>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Annotate a deal's quotes with deal-currency amounts and print it
    Normalize {
        /// Deal snapshot JSON file
        #[arg(long)]
        deal: PathBuf,

        /// Rate table JSON file
        #[arg(long)]
        rates: PathBuf,

        /// Rate lookup date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        as_of: Option<NaiveDate>,

        /// Recompute quotes that are already normalized
        #[arg(long)]
        refresh: bool,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_fx_date(value).ok_or_else(|| format!("not a date: {}", value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if args.json_logs {
        config.log_format = LogFormat::Json;
    }
    if let Command::Compare { decimals: Some(decimals), .. } = &args.command {
        config.display_decimals = *decimals;
    }

    init_logging(&config);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    match args.command {
        Command::Compare {
            deal,
            rates,
            as_of,
            quote_ids,
            authoritative,
            pretty,
            ..
        } => {
            let mut snapshot = input::load_deal(&deal)?;
            let as_of = as_of.or(config.as_of).unwrap_or_else(today);

            let missing_rate = match rates {
                Some(path) => annotate(&mut snapshot, &path, as_of, false).await?,
                None => Vec::new(),
            };

            let quote_ids = quote_ids.as_deref().map(input::parse_quote_ids).transpose()?;
            let mut report = run_compare(snapshot, quote_ids, authoritative, &config)?;
            report.missing_rate = missing_rate;

            println!("{}", report.to_json(pretty)?);
        }
        Command::Normalize {
            deal,
            rates,
            as_of,
            refresh,
        } => {
            let mut snapshot = input::load_deal(&deal)?;
            let as_of = as_of.or(config.as_of).unwrap_or_else(today);

            annotate(&mut snapshot, &rates, as_of, refresh).await?;

            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}

fn init_logging(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
    );

    // Logs go to stderr so stdout stays machine readable.
    let layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Plain => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry().with(filter).with(layer).init();
}

/// Annotate `snapshot` in place and return the quotes left without a rate.
async fn annotate(
    snapshot: &mut DealSnapshot,
    rates: &std::path::Path,
    as_of: NaiveDate,
    refresh_existing: bool,
) -> anyhow::Result<Vec<String>> {
    let source = Arc::new(input::load_rates(rates)?);
    info!(rates = source.len(), as_of = %as_of, "Rate table loaded");

    let annotator = FxAnnotator::new(
        source,
        FxAnnotatorConfig {
            refresh_existing,
            ..Default::default()
        },
    );

    let report = annotator
        .annotate_deal(snapshot, as_of)
        .await
        .context("Failed to normalize quotes")?;

    Ok(report.missing_rate.iter().map(ToString::to_string).collect())
}

fn run_compare(
    snapshot: DealSnapshot,
    quote_ids: Option<Vec<QuoteId>>,
    authoritative: Option<i64>,
    config: &AppConfig,
) -> anyhow::Result<CompareReport> {
    let (comparison, snapshot) = match quote_ids {
        Some(ids) => {
            let comparison = compare_persisted(&snapshot.base_currency, &snapshot.quotes, &ids)
                .map_err(|e| anyhow::anyhow!("{} ({})", e, e.error_code()))?;
            (comparison, select(snapshot, &ids))
        }
        None => {
            let comparison = compare_deal(&snapshot)
                .map_err(|e| anyhow::anyhow!("{} ({})", e, e.error_code()))?;
            (comparison, snapshot)
        }
    };

    let mut board = ComparisonBoard::new(snapshot);
    if let Some(id) = authoritative {
        board.resolve(Some(QuoteId::new(id)));
    }
    let best_value = board
        .best_value()
        .map_err(|e| anyhow::anyhow!("{} ({})", e, e.error_code()))?;

    info!(
        best_quote = ?best_value.quote,
        source = ?best_value.source,
        unscored = comparison.unscored_quote_ids.len(),
        "Comparison complete"
    );

    Ok(CompareReport::new(comparison, best_value, config.display_decimals))
}

/// Keep only the saved quotes named by `ids`, in snapshot order.
fn select(mut snapshot: DealSnapshot, ids: &[QuoteId]) -> DealSnapshot {
    snapshot
        .quotes
        .retain(|quote| quote.id.map_or(false, |id| ids.contains(&id)));
    snapshot
}
