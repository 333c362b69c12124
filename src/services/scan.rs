use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use super::filer::NOTE_FILE_EXTENSION;
use crate::{log_warn, models::SearcherDoc};

const ENABLE_LOGS: bool = true;

/// Reads every top-level `.md` file of a notes folder into searcher docs.
/// Sub-folders are not descended into.
pub fn scan_note_files(folder: &Path) -> Result<Vec<SearcherDoc>> {
    let entries = fs::read_dir(folder)
        .with_context(|| format!("Failed to read notes folder {}", folder.display()))?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.to_string_lossy().ends_with(NOTE_FILE_EXTENSION))
        .collect();
    paths.sort();

    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        // Lossy: one non-UTF-8 note must not fail the whole folder.
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                log_warn!("Skipping unreadable note {}: {}", path.display(), err);
                continue;
            }
        };
        let content = String::from_utf8_lossy(&bytes).into_owned();
        let modified_at = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .map(|time| DateTime::<Utc>::from(time).timestamp())
            .unwrap_or_default();

        docs.push(SearcherDoc {
            content,
            filepath: path.to_string_lossy().into_owned(),
            modified_at,
            searcher_index: docs.len(),
        });
    }

    Ok(docs)
}
