//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the parsing/comparison code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use chrono::DateTime;

use crate::clients::{ClientTimeline, DriftPoint};
use crate::curve::{CurveError, MissRateCurve};

/// One row per point: sizes, raw counts, and both ratios.
pub fn format_curve_table(curve: &MissRateCurve) -> Result<String, CurveError> {
    let hit = curve.hit_ratios()?;
    let miss = curve.miss_ratios()?;

    let mut out = String::new();
    out.push_str(&format!(
        "{:>12} {:>14} {:>12} {:>12} {:>9} {:>9}\n",
        "count", "size", "hits", "misses", "hit%", "miss%"
    ));
    for (i, p) in curve.points().iter().enumerate() {
        out.push_str(&format!(
            "{:>12} {:>14} {:>12} {:>12} {:>8.2}% {:>8.2}%\n",
            p.count,
            p.size,
            p.stat.hit_count,
            p.stat.miss_count,
            hit[i] * 100.0,
            miss[i] * 100.0
        ));
    }
    out.push_str(&format!("({} points)\n", curve.len()));
    Ok(out)
}

/// MAE between two curves, with how many positions were compared.
pub fn format_comparison(a_name: &str, b_name: &str, a: &MissRateCurve, b: &MissRateCurve, mae: f64) -> String {
    let pairs = a.len().min(b.len());
    let mut out = format!("MAE({a_name}, {b_name}) = {mae:.6} over {pairs} points\n");
    if a.len() != b.len() {
        out.push_str(&format!(
            "note: curves differ in length ({} vs {}); only the common prefix was compared\n",
            a.len(),
            b.len()
        ));
    }
    out
}

/// Drift table for one client.
pub fn format_drift(client: &str, timeline: &ClientTimeline, drift: &[DriftPoint]) -> String {
    let mut out = format!(
        "=== client {client} | window {} .. {} | {} snapshots ===\n",
        format_timestamp(timeline.first_ts),
        format_timestamp(timeline.last_ts),
        timeline.len()
    );
    out.push_str(&format!("{:<32} {:>12} {:>12}\n", "snapshot", "vs previous", "vs first"));
    for d in drift {
        out.push_str(&format!(
            "{:<32} {:>12.6} {:>12.6}\n",
            format_timestamp(d.timestamp),
            d.vs_previous,
            d.vs_first
        ));
    }
    out
}

/// Seconds since the epoch, with a UTC rendering when representable.
pub fn format_timestamp(ts: u64) -> String {
    i64::try_from(ts)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| format!("{ts} ({})", dt.format("%Y-%m-%d %H:%M:%S")))
        .unwrap_or_else(|| ts.to_string())
}
