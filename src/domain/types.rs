//! Shared domain types.
//!
//! These types are intentionally kept small and serializable so they can be:
//!
//! - built by the line parser
//! - grouped per client/timestamp
//! - exported for plotting or comparisons

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Hit/miss counts for one sampled cache size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStat {
    pub hit_count: u64,
    pub miss_count: u64,
}

impl CacheStat {
    pub fn new(hit_count: u64, miss_count: u64) -> Self {
        Self { hit_count, miss_count }
    }

    /// `hit_count + miss_count`, saturating on overflow.
    pub fn total_count(&self) -> u64 {
        self.hit_count.saturating_add(self.miss_count)
    }

    /// Fraction of lookups served by the cache.
    ///
    /// Returns `None` for a degenerate sample (`total_count == 0`).
    pub fn hit_ratio(&self) -> Option<f64> {
        self.ratio_of(self.hit_count)
    }

    /// Fraction of lookups that fell through.
    ///
    /// Returns `None` for a degenerate sample (`total_count == 0`).
    pub fn miss_ratio(&self) -> Option<f64> {
        self.ratio_of(self.miss_count)
    }

    fn ratio_of(&self, n: u64) -> Option<f64> {
        match self.total_count() {
            0 => None,
            total => Some(n as f64 / total as f64),
        }
    }
}

/// One `(cache size, outcome)` sample on a miss rate curve.
///
/// `count` (entries) and `size` (bytes) are independent dimensions; nothing here
/// enforces that one grows with the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissRatePoint {
    pub count: u64,
    pub size: u64,
    pub stat: CacheStat,
}

impl MissRatePoint {
    /// The coordinate of this point along `axis`.
    pub fn x(&self, axis: SizeAxis) -> u64 {
        match axis {
            SizeAxis::Count => self.count,
            SizeAxis::Size => self.size,
        }
    }
}

/// Which size dimension is used as the x-axis of a plotted curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SizeAxis {
    /// Number of entries the cache can hold.
    #[default]
    Count,
    /// Cache capacity in bytes.
    Size,
}

impl SizeAxis {
    pub fn label(self) -> &'static str {
        match self {
            SizeAxis::Count => "cache entries",
            SizeAxis::Size => "cache bytes",
        }
    }
}

/// Textual layout of one MRC line.
///
/// Both layouts exist in the wild; the caller picks one, the parser never guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LineGrammar {
    /// `count size pct% (hits/total)`
    #[default]
    Canonical,
    /// `ratio count size pct% (hits/total)`: a raw hit ratio leads the line.
    ///
    /// The ratio must be separated from `count` by whitespace. Output that prints
    /// the ratio and count back to back (`0.1928...65536`) is not readable, since
    /// the digits cannot be split unambiguously.
    RatioPrefixed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_reconcile_to_one() {
        let stat = CacheStat::new(5973, 25001);
        assert_eq!(stat.total_count(), 30974);
        let sum = stat.hit_ratio().unwrap() + stat.miss_ratio().unwrap();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_sample_has_no_ratio() {
        let stat = CacheStat::new(0, 0);
        assert_eq!(stat.hit_ratio(), None);
        assert_eq!(stat.miss_ratio(), None);
    }

    #[test]
    fn axis_selects_dimension() {
        let p = MissRatePoint {
            count: 65536,
            size: 79889888,
            stat: CacheStat::new(1, 1),
        };
        assert_eq!(p.x(SizeAxis::Count), 65536);
        assert_eq!(p.x(SizeAxis::Size), 79889888);
    }
}
