//! Client/timestamp grouping of miss rate curves.

pub mod timeline;

pub use timeline::*;
