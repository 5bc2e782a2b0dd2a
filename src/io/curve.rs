//! Read a single MRC text file.
//!
//! The file holds one point per line, in ascending cache size. Blank lines are
//! ignored; any other malformed line fails the whole file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::curve::MissRateCurve;
use crate::domain::LineGrammar;
use crate::error::{AppError, EXIT_INPUT};

/// Read and parse an MRC text file.
///
/// Blank lines are skipped, so the curve can hold fewer points than the file
/// has lines. Error line numbers still refer to the physical line.
pub fn read_curve_file(path: &Path, grammar: LineGrammar) -> Result<MissRateCurve, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read MRC file '{}': {e}", path.display())))?;

    let curve = MissRateCurve::parse_text(&text, grammar)
        .map_err(|e| AppError::from(e).context(path.display()))?;

    debug!(path = %path.display(), points = curve.len(), "parsed miss rate curve");
    Ok(curve)
}
