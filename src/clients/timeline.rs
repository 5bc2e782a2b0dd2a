//! Per-client MRC snapshots keyed by timestamp.
//!
//! Both maps are `BTreeMap`s so iteration is always sorted: clients by id,
//! snapshots by timestamp.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::curve::{CurveError, MissRateCurve};

/// A snapshot that could not be compared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("snapshot {timestamp}: {source}")]
pub struct SnapshotError {
    pub timestamp: u64,
    #[source]
    pub source: CurveError,
}

/// MAE of one snapshot against its predecessor and against the first snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriftPoint {
    pub timestamp: u64,
    pub vs_previous: f64,
    pub vs_first: f64,
}

/// The time series of curves recorded for one client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientTimeline {
    pub first_ts: u64,
    pub last_ts: u64,
    snapshots: BTreeMap<u64, MissRateCurve>,
}

impl ClientTimeline {
    pub fn new(first_ts: u64, last_ts: u64) -> Self {
        Self {
            first_ts,
            last_ts,
            snapshots: BTreeMap::new(),
        }
    }

    /// Add a snapshot, returning the one it replaced.
    pub fn insert(&mut self, timestamp: u64, curve: MissRateCurve) -> Option<MissRateCurve> {
        self.snapshots.insert(timestamp, curve)
    }

    pub fn get(&self, timestamp: u64) -> Option<&MissRateCurve> {
        self.snapshots.get(&timestamp)
    }

    /// Snapshots in ascending timestamp order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &MissRateCurve)> {
        self.snapshots.iter().map(|(&ts, c)| (ts, c))
    }

    pub fn latest(&self) -> Option<(u64, &MissRateCurve)> {
        self.snapshots.last_key_value().map(|(&ts, c)| (ts, c))
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// How far each snapshot's curve has moved over time.
    ///
    /// Snapshots are assumed to sample the same cache sizes in the same order;
    /// comparison is positional. The first entry is always `0.0 / 0.0`. Every
    /// snapshot must be free of degenerate samples, and a bad one is reported
    /// under its own timestamp.
    pub fn drift(&self) -> Result<Vec<DriftPoint>, SnapshotError> {
        let ratios = self
            .iter()
            .map(|(timestamp, curve)| {
                curve
                    .hit_ratios()
                    .map(|r| (timestamp, r))
                    .map_err(|source| SnapshotError { timestamp, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let Some((_, first)) = ratios.first() else {
            return Ok(Vec::new());
        };

        let mut out = Vec::with_capacity(ratios.len());
        let mut previous = first;
        for (timestamp, current) in &ratios {
            out.push(DriftPoint {
                timestamp: *timestamp,
                vs_previous: positional_mae(current, previous),
                vs_first: positional_mae(current, first),
            });
            previous = current;
        }
        Ok(out)
    }
}

/// Mean absolute difference over the common prefix; `0.0` when either is empty.
fn positional_mae(a: &[f64], b: &[f64]) -> f64 {
    let pairs = a.len().min(b.len());
    if pairs == 0 {
        return 0.0;
    }
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum();
    sum / pairs as f64
}

/// All clients of a trace, keyed by client id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientSet {
    clients: BTreeMap<String, ClientTimeline>,
}

impl ClientSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, client: impl Into<String>, timeline: ClientTimeline) -> Option<ClientTimeline> {
        self.clients.insert(client.into(), timeline)
    }

    pub fn get(&self, client: &str) -> Option<&ClientTimeline> {
        self.clients.get(client)
    }

    /// Clients in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClientTimeline)> {
        self.clients.iter().map(|(id, t)| (id.as_str(), t))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.clients.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Keep only the listed clients.
    pub fn retain_ids<S: AsRef<str>>(&mut self, keep: &[S]) {
        self.clients
            .retain(|id, _| keep.iter().any(|k| k.as_ref() == id.as_str()));
    }
}

impl FromIterator<(String, ClientTimeline)> for ClientSet {
    fn from_iter<I: IntoIterator<Item = (String, ClientTimeline)>>(iter: I) -> Self {
        Self {
            clients: iter.into_iter().collect(),
        }
    }
}
