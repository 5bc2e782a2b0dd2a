//! Text grammar for MRC lines.

pub mod line;

pub use line::*;
