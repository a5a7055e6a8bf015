//! QuoteStack FX
//!
//! Puts heterogeneous supplier quotes on a common currency footing.
//!
//! # Features
//!
//! - Pure normalization of a quote into the deal currency
//! - Exact conversion with dated rates
//! - A rate source trait with an in-memory dated rate table
//! - An annotator that pre-populates quotes before a comparison runs
//!
//! # Example
//!
//! ```rust,ignore
//! use quotestack_fx::{FxAnnotator, FxAnnotatorConfig, InMemoryRateSource};
//!
//! let source = Arc::new(InMemoryRateSource::from_json("rates", &json)?);
//! let annotator = FxAnnotator::new(source, FxAnnotatorConfig::default());
//!
//! // Write amountBase/fxRate/fxDate onto every quote of the deal
//! let report = annotator.annotate_deal(&mut deal, today()).await?;
//! ```

pub mod annotator;
pub mod conversion;
pub mod error;
pub mod normalize;
pub mod provider;

pub use annotator::{Annotation, AnnotationReport, FxAnnotator, FxAnnotatorConfig};
pub use conversion::{convert, Conversion};
pub use error::{FxError, FxResult};
pub use normalize::{normalize, MissingAmount, Normalization};
pub use provider::{InMemoryRateSource, RateSource};
