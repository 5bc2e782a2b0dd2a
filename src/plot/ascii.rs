//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The `Canvas` is owned by the caller and passed explicitly to every draw call,
//! so several curves (e.g. one client's snapshots) can share one plot. The
//! y-axis is always the miss ratio in `[0, 1]`.

use crate::domain::SizeAxis;
use crate::plot::{PlotSeries, x_bounds};

/// Glyphs handed out to successive series.
pub const GLYPHS: [char; 8] = ['*', 'o', '+', 'x', '#', '@', '%', '&'];

pub fn glyph_for(index: usize) -> char {
    GLYPHS[index % GLYPHS.len()]
}

/// A fixed-size character grid with an x-range and a `[0, 1]` y-range.
#[derive(Debug, Clone)]
pub struct Canvas {
    grid: Vec<Vec<char>>,
    x_min: f64,
    x_max: f64,
    log_x: bool,
    x_label: String,
    legend: Vec<(char, String)>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, x_range: (f64, f64), x_label: impl Into<String>) -> Self {
        let width = width.max(10);
        let height = height.max(5);
        Self {
            grid: vec![vec![' '; width]; height],
            x_min: x_range.0,
            x_max: x_range.1,
            log_x: false,
            x_label: x_label.into(),
            legend: Vec::new(),
        }
    }

    /// Use a base-2 log scale for x. Ignored unless the whole range is positive.
    pub fn with_log_x(mut self) -> Self {
        self.log_x = self.x_min > 0.0;
        self
    }

    pub fn width(&self) -> usize {
        self.grid[0].len()
    }

    pub fn height(&self) -> usize {
        self.grid.len()
    }

    /// Draw `series` as a polyline. Cells already drawn by earlier series are
    /// kept, except for this series' first point.
    pub fn draw(&mut self, series: &PlotSeries, glyph: char) {
        self.legend.push((glyph, series.label.clone()));

        let mut prev = None;
        for &(x, y) in &series.points {
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            let col = self.map_x(x);
            let row = self.map_y(y);
            match prev {
                Some((c0, r0)) => self.draw_line(c0, r0, col, row, glyph),
                None => self.grid[row][col] = glyph,
            }
            prev = Some((col, row));
        }
    }

    pub fn render(&self) -> String {
        let scale = if self.log_x { " (log2)" } else { "" };
        let mut out = format!(
            "Plot: x=[{:.0}, {:.0}] {}{scale} | miss ratio=[0.00, 1.00]\n",
            self.x_min, self.x_max, self.x_label
        );

        for row in &self.grid {
            out.push_str(&row.iter().collect::<String>());
            out.push('\n');
        }
        for (glyph, label) in &self.legend {
            out.push_str(&format!("  {glyph} {label}\n"));
        }
        out
    }

    fn map_x(&self, x: f64) -> usize {
        let (x, lo, hi) = if self.log_x {
            (x.max(self.x_min).log2(), self.x_min.log2(), self.x_max.log2())
        } else {
            (x, self.x_min, self.x_max)
        };
        let span = hi - lo;
        let u = if span > 0.0 { ((x - lo) / span).clamp(0.0, 1.0) } else { 0.0 };
        (u * (self.width() as f64 - 1.0)).round() as usize
    }

    fn map_y(&self, y: f64) -> usize {
        let height = self.height() as f64;
        let u = y.clamp(0.0, 1.0);
        // y=1 is the top row.
        (height - 1.0 - u * (height - 1.0)).round() as usize
    }

    /// Integer line drawing (Bresenham-ish) into blank cells only.
    fn draw_line(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
        let mut x0 = x0 as isize;
        let mut y0 = y0 as isize;
        let x1 = x1 as isize;
        let y1 = y1 as isize;

        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if let Some(cell) = self
                .grid
                .get_mut(y0 as usize)
                .and_then(|row| row.get_mut(x0 as usize))
            {
                if *cell == ' ' {
                    *cell = ch;
                }
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/// Plot every series on one fresh canvas.
pub fn render_curves(series: &[PlotSeries], axis: SizeAxis, width: usize, height: usize, log_x: bool) -> String {
    let range = x_bounds(series).unwrap_or((0.0, 1.0));
    let mut canvas = Canvas::new(width, height, range, axis.label());
    if log_x {
        canvas = canvas.with_log_x();
    }
    for (i, s) in series.iter().enumerate() {
        canvas.draw(s, glyph_for(i));
    }
    canvas.render()
}
