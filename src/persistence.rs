// File: src/persistence.rs
use crate::error::LexiconError;
use crate::lexicon::CmuDict;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const SNAPSHOT_VERSION: u32 = 1;

/// On-disk image of a parsed dictionary.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    dict: CmuDict,
}

/// Writes the dictionary next to `path` and renames it into place, so a
/// reader never sees a half-written snapshot.
pub fn save_snapshot(dict: &CmuDict, path: &Path) -> Result<(), LexiconError> {
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir).map_err(|e| LexiconError::io("creating snapshot dir", e))?;

    let temp_file = NamedTempFile::new_in(parent_dir)
        .map_err(|e| LexiconError::io("creating snapshot temp file", e))?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            dict,
        };
        bincode::serialize_into(&mut writer, &snapshot)
            .map_err(|e| LexiconError::snapshot("encoding snapshot", e))?;
        writer
            .flush()
            .map_err(|e| LexiconError::io("flushing snapshot", e))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| LexiconError::io("persisting snapshot", e.error))?;
    tracing::debug!(path = %path.display(), words = dict.len(), "dictionary snapshot written");
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<CmuDict, LexiconError> {
    let file = File::open(path).map_err(|e| LexiconError::io("opening snapshot", e))?;
    let reader = BufReader::new(file);
    let snapshot: Snapshot = bincode::deserialize_from(reader)
        .map_err(|e| LexiconError::snapshot("decoding snapshot", e))?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(LexiconError::snapshot(
            "checking snapshot version",
            Box::new(bincode::ErrorKind::Custom(format!(
                "snapshot version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            ))),
        ));
    }
    Ok(snapshot.dict)
}

/// Borrowing twin of [`Snapshot`] so saving needs no clone.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    dict: &'a CmuDict,
}
