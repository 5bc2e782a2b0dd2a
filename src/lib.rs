//! `mrc-plot` library crate.
//!
//! Parses text-encoded cache miss rate curves (one `count size pct% (hits/total)`
//! line per sampled cache size), compares curves by mean absolute hit-ratio
//! error, and renders them.
//!
//! The binary (`mrc`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the parser and curve model can be used without the CLI layer

pub mod app;
pub mod cli;
pub mod clients;
pub mod curve;
pub mod domain;
pub mod error;
pub mod io;
pub mod parse;
pub mod plot;
pub mod report;
pub mod sample;
