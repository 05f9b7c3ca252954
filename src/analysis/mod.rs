//! Analysis modules.
//!
//! Aggregation of semester records into result rows and summary figures.

pub mod aggregator;

pub use aggregator::*;
