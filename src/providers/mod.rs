//! Quote source interface and implementations.

pub mod rest;
pub mod traits;

pub use rest::RestQuoteSource;
pub use traits::{QuoteSource, QuoteSourceError};
