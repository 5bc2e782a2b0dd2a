//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - per-sample cache outcomes (`CacheStat`, `MissRatePoint`)
//! - caller-selected options (`SizeAxis`, `LineGrammar`)

pub mod types;

pub use types::*;
