//! Input/output helpers.
//!
//! - single MRC text files (`curve`)
//! - per-client JSON documents (`client_file`)
//! - client directories (`dataset`)
//! - series exports (CSV) (`export`)

pub mod client_file;
pub mod curve;
pub mod dataset;
pub mod export;

pub use client_file::*;
pub use curve::*;
pub use dataset::*;
pub use export::*;
