//! SVG line charts rendered with Plotters.
//!
//! One line per series, miss ratio on y in `[0, 1]`, a legend keyed by series
//! label. The chart is rendered into memory and written out in one go.

use std::fs;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::SizeAxis;
use crate::error::{AppError, EXIT_INPUT, EXIT_NUMERIC};
use crate::plot::{PlotSeries, x_bounds};

/// Render `series` to an SVG document.
pub fn render_svg(series: &[PlotSeries], axis: SizeAxis, size: (u32, u32)) -> Result<String, AppError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_chart(&root, series, axis)?;
        root.present().map_err(draw_err)?;
    }
    Ok(svg)
}

/// Render `series` and write the SVG to `path`.
pub fn write_svg(path: &Path, series: &[PlotSeries], axis: SizeAxis, size: (u32, u32)) -> Result<(), AppError> {
    let svg = render_svg(series, axis, size)?;
    fs::write(path, svg)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write SVG '{}': {e}", path.display())))
}

fn draw_chart(root: &DrawingArea<SVGBackend<'_>, Shift>, series: &[PlotSeries], axis: SizeAxis) -> Result<(), AppError> {
    let (mut x0, mut x1) = x_bounds(series).ok_or_else(|| AppError::new(EXIT_NUMERIC, "Nothing to plot: no points."))?;
    if x1 <= x0 {
        // A single sampled size still needs a non-empty range.
        x0 -= 0.5;
        x1 += 0.5;
    }

    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(root)
        .caption("Miss rate curve", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x0..x1, 0f64..1f64)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc(axis.label())
        .y_desc("miss ratio")
        .x_labels(8)
        .y_labels(6)
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()
        .map_err(draw_err)?;

    for (i, s) in series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(s.points.iter().copied(), &color))
            .map_err(draw_err)?
            .label(s.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_err)?;

    Ok(())
}

fn draw_err(e: impl std::fmt::Display) -> AppError {
    AppError::new(EXIT_INPUT, format!("Failed to render chart: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_svg_document() {
        let series = vec![
            PlotSeries {
                label: "t=100".to_string(),
                points: vec![(64.0, 0.9), (128.0, 0.7), (256.0, 0.4)],
            },
            PlotSeries {
                label: "t=200".to_string(),
                points: vec![(64.0, 0.8), (128.0, 0.6), (256.0, 0.3)],
            },
        ];
        let svg = render_svg(&series, SizeAxis::Count, (640, 480)).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(render_svg(&[], SizeAxis::Size, (320, 240)).is_err());
    }
}
