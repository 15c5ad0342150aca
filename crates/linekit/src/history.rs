//! Plain-text history files.
//!
//! One entry per line, oldest first. Handlers typically call [`load_history`]
//! from `start` and [`save_history`] from `stop`.

use log::debug;
use std::fs;
use std::io;
use std::path::Path;

/// Default number of entries kept by [`save_history`] callers.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Read history entries from `path`.
///
/// A missing file is an empty history. Blank lines are skipped.
pub fn load_history(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let entries: Vec<String> = contents
        .lines()
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    debug!("loaded {} history entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Write the newest `limit` non-empty entries to `path`, replacing its contents.
pub fn save_history(path: impl AsRef<Path>, entries: &[String], limit: usize) -> io::Result<()> {
    let path = path.as_ref();
    let kept: Vec<&str> = entries
        .iter()
        .map(String::as_str)
        .filter(|entry| !entry.is_empty())
        .collect();
    let start = kept.len().saturating_sub(limit);

    let mut contents = String::new();
    for entry in &kept[start..] {
        contents.push_str(entry);
        contents.push('\n');
    }
    fs::write(path, contents)?;
    debug!("saved {} history entries to {}", kept.len() - start, path.display());
    Ok(())
}
