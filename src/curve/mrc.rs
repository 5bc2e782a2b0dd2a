//! Miss rate curves: an ordered run of parsed MRC points.
//!
//! Points keep input order. Nothing is sorted or deduplicated; a curve is
//! whatever the lines said, in the order they said it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{LineGrammar, MissRatePoint, SizeAxis};
use crate::parse::{ParseError, parse_point};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    /// Line `line` (zero-based) did not match the grammar.
    #[error("line {line_no}: {source}", line_no = .line + 1)]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },
    /// Point `index` has `total_count == 0`, so it has no ratio.
    #[error("point {index} is a degenerate sample (0 lookups)")]
    DegenerateSample { index: usize },
}

/// An ordered sequence of `MissRatePoint`s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissRateCurve {
    points: Vec<MissRatePoint>,
}

impl MissRateCurve {
    pub fn from_points(points: Vec<MissRatePoint>) -> Self {
        Self { points }
    }

    /// Parse one point per line with the canonical grammar.
    ///
    /// All-or-nothing: the first bad line fails the whole call.
    pub fn parse<I, S>(lines: I) -> Result<Self, CurveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::parse_with(lines, LineGrammar::Canonical)
    }

    /// Like [`MissRateCurve::parse`], with an explicit line grammar.
    pub fn parse_with<I, S>(lines: I, grammar: LineGrammar) -> Result<Self, CurveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let points = lines
            .into_iter()
            .enumerate()
            .map(|(line, text)| {
                parse_point(text.as_ref(), grammar).map_err(|source| CurveError::Parse { line, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { points })
    }

    /// Parse a whole block of text, skipping blank lines.
    ///
    /// Error line numbers refer to the physical line in `text`.
    pub fn parse_text(text: &str, grammar: LineGrammar) -> Result<Self, CurveError> {
        let mut points = Vec::new();
        for (line, raw) in text.lines().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            let point = parse_point(raw, grammar).map_err(|source| CurveError::Parse { line, source })?;
            points.push(point);
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[MissRatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Entry-count dimension of every point, in order.
    pub fn counts(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.count).collect()
    }

    /// Byte-size dimension of every point, in order.
    pub fn sizes(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.size).collect()
    }

    pub fn hit_ratios(&self) -> Result<Vec<f64>, CurveError> {
        self.points
            .iter()
            .enumerate()
            .map(|(index, p)| hit_ratio(p, index))
            .collect()
    }

    pub fn miss_ratios(&self) -> Result<Vec<f64>, CurveError> {
        self.points
            .iter()
            .enumerate()
            .map(|(index, p)| p.stat.miss_ratio().ok_or(CurveError::DegenerateSample { index }))
            .collect()
    }

    /// `(xs, ys)` for a line chart: `xs` along `axis`, `ys` the miss ratio.
    pub fn series_for_plot(&self, axis: SizeAxis) -> Result<(Vec<f64>, Vec<f64>), CurveError> {
        let ys = self.miss_ratios()?;
        let xs = self.points.iter().map(|p| p.x(axis) as f64).collect();
        Ok((xs, ys))
    }

    /// Mean absolute difference in hit ratio, paired by position.
    ///
    /// Only the first `min(self.len(), other.len())` points are compared and no
    /// check is made that paired points share a cache size. Returns `0.0` when
    /// either curve is empty.
    pub fn mean_absolute_error(&self, other: &MissRateCurve) -> Result<f64, CurveError> {
        let pairs = self.points.len().min(other.points.len());
        if pairs == 0 {
            return Ok(0.0);
        }

        let mut error_sum = 0.0;
        for (index, (a, b)) in self.points.iter().zip(&other.points).enumerate() {
            error_sum += (hit_ratio(a, index)? - hit_ratio(b, index)?).abs();
        }
        Ok(error_sum / pairs as f64)
    }
}

impl FromStr for MissRateCurve {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_text(s, LineGrammar::Canonical)
    }
}

impl<'a> IntoIterator for &'a MissRateCurve {
    type Item = &'a MissRatePoint;
    type IntoIter = std::slice::Iter<'a, MissRatePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

fn hit_ratio(p: &MissRatePoint, index: usize) -> Result<f64, CurveError> {
    p.stat.hit_ratio().ok_or(CurveError::DegenerateSample { index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CacheStat;
    use crate::parse::{ParseErrorKind, Token};

    const PT1: &str = "65536 79889888 19.3% (5973/30974)";
    const PT2: &str = "131072 154146720 20.2% (6253/30974)";

    fn point(count: u64, hits: u64, misses: u64) -> MissRatePoint {
        MissRatePoint {
            count,
            size: count * 1000,
            stat: CacheStat::new(hits, misses),
        }
    }

    #[test]
    fn parses_curve_in_line_order() {
        let curve = MissRateCurve::parse([PT1, PT2]).unwrap();
        let expected = MissRateCurve::from_points(vec![
            MissRatePoint {
                count: 65536,
                size: 79889888,
                stat: CacheStat::new(5973, 25001),
            },
            MissRatePoint {
                count: 131072,
                size: 154146720,
                stat: CacheStat::new(6253, 24721),
            },
        ]);
        assert_eq!(curve, expected);
    }

    #[test]
    fn empty_input_is_empty_curve() {
        let curve = MissRateCurve::parse(Vec::<String>::new()).unwrap();
        assert!(curve.is_empty());
    }

    #[test]
    fn one_bad_line_fails_the_whole_curve() {
        let err = MissRateCurve::parse([PT1, "1 2 3% (4/5", PT2]).unwrap_err();
        match err {
            CurveError::Parse { line, source } => {
                assert_eq!(line, 1);
                assert_eq!(source.kind, ParseErrorKind::Expected(Token::CloseParen));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicates_and_disorder_pass_through() {
        let curve = MissRateCurve::parse([PT2, PT1, PT1]).unwrap();
        assert_eq!(curve.counts(), vec![131072, 65536, 65536]);
        assert_eq!(curve.sizes(), vec![154146720, 79889888, 79889888]);
    }

    #[test]
    fn parse_text_skips_blank_lines_and_reports_physical_line() {
        let text = format!("{PT1}\n\n{PT2}\n");
        let curve: MissRateCurve = text.parse().unwrap();
        assert_eq!(curve.len(), 2);

        let err = MissRateCurve::parse_text(&format!("{PT1}\n\nbad\n"), LineGrammar::Canonical).unwrap_err();
        assert!(matches!(err, CurveError::Parse { line: 2, .. }));
        assert!(err.to_string().starts_with("line 3: at byte 0"));
    }

    #[test]
    fn series_uses_selected_axis_and_miss_ratio() {
        let curve = MissRateCurve::parse([PT1, PT2]).unwrap();

        let (xs, ys) = curve.series_for_plot(SizeAxis::Count).unwrap();
        assert_eq!(xs, vec![65536.0, 131072.0]);
        assert!((ys[0] - 25001.0 / 30974.0).abs() < 1e-12);
        assert!((ys[1] - 24721.0 / 30974.0).abs() < 1e-12);

        let (xs, _) = curve.series_for_plot(SizeAxis::Size).unwrap();
        assert_eq!(xs, vec![79889888.0, 154146720.0]);
    }

    #[test]
    fn series_rejects_degenerate_sample() {
        let curve = MissRateCurve::from_points(vec![point(1, 1, 1), point(2, 0, 0)]);
        assert_eq!(
            curve.series_for_plot(SizeAxis::Count),
            Err(CurveError::DegenerateSample { index: 1 })
        );
    }

    #[test]
    fn curve_serializes_as_point_array() {
        let curve = MissRateCurve::from_points(vec![point(64, 1, 3)]);
        let json = serde_json::to_string(&curve).unwrap();
        assert_eq!(
            json,
            r#"[{"count":64,"size":64000,"stat":{"hit_count":1,"miss_count":3}}]"#
        );
        let back: MissRateCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back, curve);
    }

    #[test]
    fn mae_of_curve_with_itself_is_zero() {
        let curve = MissRateCurve::parse([PT1, PT2]).unwrap();
        assert_eq!(curve.mean_absolute_error(&curve).unwrap(), 0.0);
    }

    #[test]
    fn mae_against_swapped_curve() {
        let a = MissRateCurve::parse([PT1, PT2]).unwrap();
        let b = MissRateCurve::parse([PT2, PT1]).unwrap();
        let expected = (5973.0_f64 / 30974.0 - 6253.0 / 30974.0).abs();
        let mae = a.mean_absolute_error(&b).unwrap();
        assert!((mae - expected).abs() < 1e-15);
    }

    #[test]
    fn mae_is_symmetric() {
        let a = MissRateCurve::from_points(vec![point(1, 1, 3), point(2, 5, 5), point(3, 9, 1)]);
        let b = MissRateCurve::from_points(vec![point(1, 2, 2), point(2, 1, 9)]);
        assert_eq!(a.mean_absolute_error(&b).unwrap(), b.mean_absolute_error(&a).unwrap());
    }

    #[test]
    fn mae_only_compares_common_prefix() {
        let a = MissRateCurve::from_points(vec![point(1, 1, 1), point(2, 1, 3)]);
        let b = MissRateCurve::from_points(vec![point(1, 1, 1)]);
        assert_eq!(a.mean_absolute_error(&b).unwrap(), 0.0);
    }

    #[test]
    fn mae_against_empty_is_zero() {
        let a = MissRateCurve::parse([PT1]).unwrap();
        let empty = MissRateCurve::default();
        assert_eq!(a.mean_absolute_error(&empty).unwrap(), 0.0);
        assert_eq!(empty.mean_absolute_error(&a).unwrap(), 0.0);
        assert_eq!(empty.mean_absolute_error(&empty).unwrap(), 0.0);
    }

    #[test]
    fn mae_rejects_degenerate_sample_on_either_side() {
        let good = MissRateCurve::from_points(vec![point(1, 1, 1), point(2, 1, 1)]);
        let bad = MissRateCurve::from_points(vec![point(1, 1, 1), point(2, 0, 0)]);
        assert_eq!(good.mean_absolute_error(&bad), Err(CurveError::DegenerateSample { index: 1 }));
        assert_eq!(bad.mean_absolute_error(&good), Err(CurveError::DegenerateSample { index: 1 }));
    }
}
