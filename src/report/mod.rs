//! Reporting utilities: curve tables, comparisons, and drift summaries.

pub mod format;

pub use format::*;
