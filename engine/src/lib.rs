//! QuoteStack Engine
//!
//! Compares the supplier quotes of one deal and answers three questions:
//! which quote is cheapest once normalized into the deal currency, which
//! ships soonest, and which offers the best balance of the two.
//!
//! # Features
//!
//! - Best price over normalized amounts, zero included
//! - Best lead time over specified lead times
//! - Rank-sum best value with first-encountered tie breaking
//! - Unscored reporting for foreign quotes without a normalization
//! - Authoritative comparison over persisted quotes with request checks
//! - A board that reconciles the authoritative answer with a local estimate
//!
//! # Example
//!
//! ```rust,ignore
//! use quotestack_engine::compare_deal;
//!
//! let result = compare_deal(&deal)?;
//! if let Some(best) = result.best_quote_id {
//!     println!("best value: {}", best);
//! }
//! ```

pub mod board;
pub mod compare;
pub mod error;
pub mod persisted;
pub mod ranking;
pub mod result;

pub use board::{reconcile, Authority, BestValue, BestValueSource, ComparisonBoard};
pub use compare::{compare, compare_deal};
pub use error::{CompareError, CompareResult};
pub use persisted::compare_persisted;
pub use ranking::{best_lead_time, best_price, rank_best_value, RankInput};
pub use result::{ComparisonResult, RankedQuote};
