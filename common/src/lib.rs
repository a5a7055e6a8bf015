//! QuoteStack Common Types
//!
//! This crate contains the types shared across the QuoteStack comparison
//! engine: identifiers, the exact decimal money model, quote records and
//! their validation errors.

pub mod identifiers;
pub mod monetary;
pub mod quote;
pub mod error;
pub mod time;

pub use identifiers::*;
pub use monetary::*;
pub use quote::*;
pub use error::*;
pub use time::*;
