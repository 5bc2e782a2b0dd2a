//! Rendering of miss rate curves.
//!
//! - terminal plots on a caller-owned character canvas (`ascii`)
//! - SVG line charts via Plotters (`svg`)

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;

use crate::curve::{CurveError, MissRateCurve};
use crate::domain::SizeAxis;

/// One labelled `(x, miss ratio)` line, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl PlotSeries {
    pub fn from_curve(label: impl Into<String>, curve: &MissRateCurve, axis: SizeAxis) -> Result<Self, CurveError> {
        let (xs, ys) = curve.series_for_plot(axis)?;
        Ok(Self {
            label: label.into(),
            points: xs.into_iter().zip(ys).collect(),
        })
    }
}

/// Smallest and largest x over all series, if any point exists.
pub fn x_bounds(series: &[PlotSeries]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in series.iter().flat_map(|s| s.points.iter()) {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() {
        Some((min_x, max_x))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_pairs_axis_with_miss_ratio() {
        let curve = MissRateCurve::parse(["64 4096 25.0% (1/4)", "128 8192 50.0% (2/4)"]).unwrap();
        let s = PlotSeries::from_curve("t=1", &curve, SizeAxis::Count).unwrap();
        assert_eq!(s.points, vec![(64.0, 0.75), (128.0, 0.5)]);
        assert_eq!(x_bounds(&[s]), Some((64.0, 128.0)));
    }

    #[test]
    fn no_points_no_bounds() {
        assert_eq!(x_bounds(&[]), None);
    }
}
