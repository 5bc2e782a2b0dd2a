//! Miss rate curve model: construction from lines, series extraction, and
//! pointwise comparison.

pub mod mrc;

pub use mrc::*;
