//! Per-client JSON documents.
//!
//! Each client file looks like:
//!
//! ```json
//! {"first_ts":100,"last_ts":900,"mrcs":{"100":["64 4096 10.0% (1/10)", "..."], "500":"..."}}
//! ```
//!
//! `mrcs` maps a snapshot timestamp to its curve, either as an array of lines or
//! as one newline-joined string.

use std::collections::BTreeMap;
use std::io::{Read, Seek, SeekFrom};
use std::sync::LazyLock;

use regex::bytes::Regex;
use serde::Deserialize;
use tracing::trace;

use crate::clients::ClientTimeline;
use crate::curve::{CurveError, MissRateCurve};
use crate::domain::LineGrammar;
use crate::error::{AppError, EXIT_INPUT};

/// How many leading bytes the fast path inspects.
const PREFIX_LEN: u64 = 256;

static TIMESTAMP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\{"first_ts":(\d+),"last_ts":(\d+)"#).expect("timestamp prefix pattern is valid")
});

/// Observation window of a client trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Timestamps {
    pub first_ts: u64,
    pub last_ts: u64,
}

/// Curve payload for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MrcLines {
    Lines(Vec<String>),
    Text(String),
}

impl MrcLines {
    pub fn parse(&self, grammar: LineGrammar) -> Result<MissRateCurve, CurveError> {
        match self {
            MrcLines::Lines(lines) => MissRateCurve::parse_with(lines, grammar),
            MrcLines::Text(text) => MissRateCurve::parse_text(text, grammar),
        }
    }
}

/// Raw client document as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientFile {
    pub first_ts: u64,
    pub last_ts: u64,
    #[serde(default)]
    pub mrcs: BTreeMap<u64, MrcLines>,
}

impl ClientFile {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        serde_json::from_reader(reader).map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid client JSON: {e}")))
    }

    /// Parse every snapshot into a timeline. The first bad snapshot fails the file.
    pub fn into_timeline(self, grammar: LineGrammar) -> Result<ClientTimeline, AppError> {
        let mut timeline = ClientTimeline::new(self.first_ts, self.last_ts);
        for (ts, lines) in self.mrcs {
            let curve = lines
                .parse(grammar)
                .map_err(|e| AppError::from(e).context(format!("snapshot {ts}")))?;
            timeline.insert(ts, curve);
        }
        Ok(timeline)
    }
}

/// Read just the observation window of a client file.
///
/// Files written by the simulator start with `{"first_ts":N,"last_ts":N`, so the
/// first bytes are usually enough. Anything else falls back to a full parse.
pub fn scan_timestamps<R: Read + Seek>(mut reader: R) -> Result<Timestamps, AppError> {
    let mut prefix = Vec::with_capacity(PREFIX_LEN as usize);
    (&mut reader)
        .take(PREFIX_LEN)
        .read_to_end(&mut prefix)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read client file: {e}")))?;

    if let Some(ts) = match_prefix(&prefix) {
        return Ok(ts);
    }

    trace!("timestamp prefix not found, falling back to full JSON parse");
    reader
        .seek(SeekFrom::Start(0))
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to rewind client file: {e}")))?;
    let file = ClientFile::from_reader(reader)?;
    Ok(Timestamps {
        first_ts: file.first_ts,
        last_ts: file.last_ts,
    })
}

fn match_prefix(prefix: &[u8]) -> Option<Timestamps> {
    let caps = TIMESTAMP_PREFIX.captures(prefix)?;
    let number = |i: usize| -> Option<u64> { std::str::from_utf8(caps.get(i)?.as_bytes()).ok()?.parse().ok() };
    Some(Timestamps {
        first_ts: number(1)?,
        last_ts: number(2)?,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::error::EXIT_PARSE;

    const DOC: &str = r#"{"first_ts":100,"last_ts":900,"mrcs":{
        "500":"64 4096 20.0% (2/10)\n128 8192 30.0% (3/10)\n",
        "100":["64 4096 10.0% (1/10)","128 8192 20.0% (2/10)"]
    }}"#;

    #[test]
    fn fast_path_reads_prefix() {
        let ts = scan_timestamps(Cursor::new(DOC)).unwrap();
        assert_eq!(ts, Timestamps { first_ts: 100, last_ts: 900 });
    }

    #[test]
    fn slow_path_handles_reordered_keys() {
        let doc = r#"{ "last_ts": 9, "mrcs": {}, "first_ts": 3 }"#;
        let ts = scan_timestamps(Cursor::new(doc)).unwrap();
        assert_eq!(ts, Timestamps { first_ts: 3, last_ts: 9 });
    }

    #[test]
    fn slow_path_reports_bad_json() {
        let err = scan_timestamps(Cursor::new("not json")).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }

    #[test]
    fn overflowing_prefix_falls_back() {
        assert_eq!(match_prefix(br#"{"first_ts":99999999999999999999999,"last_ts":1"#), None);
    }

    #[test]
    fn both_payload_shapes_become_sorted_timeline() {
        let file = ClientFile::from_reader(DOC.as_bytes()).unwrap();
        let timeline = file.into_timeline(LineGrammar::Canonical).unwrap();

        assert_eq!((timeline.first_ts, timeline.last_ts), (100, 900));
        let stamps: Vec<u64> = timeline.iter().map(|(ts, _)| ts).collect();
        assert_eq!(stamps, vec![100, 500]);
        assert_eq!(timeline.get(500).unwrap().counts(), vec![64, 128]);
    }

    #[test]
    fn bad_snapshot_names_timestamp() {
        let doc = r#"{"first_ts":1,"last_ts":2,"mrcs":{"7":["64 4096 10.0% (11/10)"]}}"#;
        let err = ClientFile::from_reader(doc.as_bytes())
            .unwrap()
            .into_timeline(LineGrammar::Canonical)
            .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_PARSE);
        assert!(err.to_string().starts_with("snapshot 7: line 1"), "{err}");
    }

    #[test]
    fn missing_mrcs_is_empty_timeline() {
        let file = ClientFile::from_reader(r#"{"first_ts":1,"last_ts":2}"#.as_bytes()).unwrap();
        assert!(file.into_timeline(LineGrammar::Canonical).unwrap().is_empty());
    }
}
