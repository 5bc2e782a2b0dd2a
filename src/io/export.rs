//! Export a curve's plot series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or plotting scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::curve::MissRateCurve;
use crate::domain::SizeAxis;
use crate::error::{AppError, EXIT_INPUT};

/// Write `x,miss_ratio` rows (plus raw counts) for every point of `curve`.
pub fn write_series_csv(path: &Path, curve: &MissRateCurve, axis: SizeAxis) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    write_series(&mut out, curve, axis)?;
    out.flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV: {e}")))
}

fn write_series<W: Write>(out: &mut W, curve: &MissRateCurve, axis: SizeAxis) -> Result<(), AppError> {
    // Ratios first so a degenerate sample leaves no half-written rows.
    let (xs, ys) = curve.series_for_plot(axis)?;

    let x_name = match axis {
        SizeAxis::Count => "count",
        SizeAxis::Size => "size",
    };
    writeln!(out, "{x_name},miss_ratio,hit_count,miss_count")
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV header: {e}")))?;

    for ((x, y), p) in xs.iter().zip(&ys).zip(curve.points()) {
        writeln!(out, "{x},{y:.10},{},{}", p.stat.hit_count, p.stat.miss_count)
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}
