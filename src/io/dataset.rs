//! Directory traversal: one client JSON file per client.
//!
//! The client id is the file stem (`1234.json` -> client `1234`). Files are
//! independent, so they are parsed in parallel; the result is ordered by
//! client id regardless of scheduling.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::clients::{ClientSet, ClientTimeline};
use crate::domain::LineGrammar;
use crate::error::{AppError, EXIT_INPUT};
use crate::io::client_file::{ClientFile, Timestamps, scan_timestamps};

/// Client JSON files in `dir`, sorted by path.
pub fn client_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read directory '{}': {e}", dir.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to list '{}': {e}", dir.display())))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Client id for a client file path.
pub fn client_id(path: &Path) -> Result<String, AppError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_owned)
        .ok_or_else(|| AppError::new(EXIT_INPUT, format!("Cannot derive client id from '{}'", path.display())))
}

/// Load and parse one client file.
pub fn load_client_file(path: &Path, grammar: LineGrammar) -> Result<ClientTimeline, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open client file '{}': {e}", path.display())))?;
    ClientFile::from_reader(BufReader::new(file))
        .and_then(|doc| doc.into_timeline(grammar))
        .map_err(|e| e.context(path.display()))
}

/// Observation window of a client file, without parsing its curves.
pub fn load_client_window(path: &Path) -> Result<Timestamps, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open client file '{}': {e}", path.display())))?;
    scan_timestamps(BufReader::new(file)).map_err(|e| e.context(path.display()))
}

/// Load every client in `dir`.
///
/// If `only` is given, files for other clients are not opened. Any failing file
/// fails the whole load.
pub fn load_client_dir(dir: &Path, grammar: LineGrammar, only: Option<&[String]>) -> Result<ClientSet, AppError> {
    let mut files = client_files(dir)?;
    if let Some(keep) = only {
        files.retain(|path| client_id(path).is_ok_and(|id| keep.contains(&id)));
    }
    debug!(dir = %dir.display(), files = files.len(), "loading client files");

    let loaded = files
        .par_iter()
        .map(|path| -> Result<(String, ClientTimeline), AppError> {
            Ok((client_id(path)?, load_client_file(path, grammar)?))
        })
        .collect::<Result<Vec<_>, AppError>>()?;
    let set: ClientSet = loaded.into_iter().collect();

    info!(clients = set.len(), "loaded client curves");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_PARSE;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn loads_json_files_sorted_by_client() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "b.json",
            r#"{"first_ts":1,"last_ts":2,"mrcs":{"1":["64 4096 10.0% (1/10)"]}}"#,
        );
        write(
            dir.path(),
            "a.json",
            r#"{"first_ts":3,"last_ts":4,"mrcs":{"3":["64 4096 20.0% (2/10)"]}}"#,
        );
        write(dir.path(), "notes.txt", "ignored");

        let set = load_client_dir(dir.path(), LineGrammar::Canonical, None).unwrap();
        assert_eq!(set.ids(), vec!["a", "b"]);
        assert_eq!(set.get("a").unwrap().first_ts, 3);
    }

    #[test]
    fn only_filter_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "good.json", r#"{"first_ts":1,"last_ts":2}"#);
        write(dir.path(), "broken.json", "{");

        let only = vec!["good".to_string()];
        let set = load_client_dir(dir.path(), LineGrammar::Canonical, Some(&only)).unwrap();
        assert_eq!(set.ids(), vec!["good"]);
    }

    #[test]
    fn one_bad_file_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ok.json", r#"{"first_ts":1,"last_ts":2}"#);
        write(
            dir.path(),
            "bad.json",
            r#"{"first_ts":1,"last_ts":2,"mrcs":{"1":["64 4096 10.0% (1/10"]}}"#,
        );

        let err = load_client_dir(dir.path(), LineGrammar::Canonical, None).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_PARSE);
        assert!(err.to_string().contains("bad.json"), "{err}");
    }

    #[test]
    fn window_uses_fast_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "c.json", r#"{"first_ts":10,"last_ts":20,"mrcs":{}}"#);
        let ts = load_client_window(&dir.path().join("c.json")).unwrap();
        assert_eq!(ts, Timestamps { first_ts: 10, last_ts: 20 });
    }
}
