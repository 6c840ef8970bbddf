//! Finds record files (`<8 digits>.<extension>`) in a directory and checks
//! that their numbers form one unbroken run.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, error, info};

use crate::error::{SalesError, SalesResult};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecordFile {
    pub sequence: u32,
    pub name: String,
    pub path: PathBuf,
}

fn record_name_pattern(extension: &str) -> SalesResult<Regex> {
    Regex::new(&format!(r"^([0-9]{{8}})\.{}$", regex::escape(extension)))
        .map_err(SalesError::unknown)
}

/// Lists matching regular files, sorted by sequence number.
///
/// Fails with [`SalesError::NonSequentialFiles`] when two neighbours differ by
/// more than one. Nothing is read from the files themselves.
pub fn discover_records<P: AsRef<Path>>(
    dir: P,
    extension: &str,
) -> SalesResult<Vec<RecordFile>> {
    let dir = dir.as_ref();
    let pattern = record_name_pattern(extension)?;

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(caps) = pattern.captures(name) else {
            continue;
        };
        let path = entry.path();
        if !path.is_file() {
            debug!(name, "Skipping non-file entry");
            continue;
        }
        let sequence = caps[1].parse::<u32>().map_err(SalesError::unknown)?;
        files.push(RecordFile {
            sequence,
            name: name.to_owned(),
            path,
        });
    }

    // Stems are fixed width, so this is name order as well.
    files.sort();

    for pair in files.windows(2) {
        if pair[1].sequence - pair[0].sequence != 1 {
            error!(previous = %pair[0].name, next = %pair[1].name, "Gap in record numbering");
            return Err(SalesError::NonSequentialFiles {
                previous: pair[0].name.clone(),
                next: pair[1].name.clone(),
            });
        }
    }

    info!(count = files.len(), "Record files discovered");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        fs::write(dir.path().join(name), "").unwrap();
    }

    fn names(files: &[RecordFile]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn keeps_only_matching_files_in_order() {
        let dir = TempDir::new().unwrap();
        for name in [
            "00000002.rcd",
            "00000001.rcd",
            "00000003.txt",
            "0000003.rcd",
            "000000030.rcd",
            "00000003.rcd.bak",
            "abcdefgh.rcd",
            "branch.lst",
        ] {
            touch(&dir, name);
        }
        fs::create_dir(dir.path().join("00000003.rcd")).unwrap();

        let files = discover_records(dir.path(), "rcd").unwrap();
        assert_eq!(names(&files), ["00000001.rcd", "00000002.rcd"]);
        assert_eq!(files[1].sequence, 2);
    }

    #[test]
    fn extension_dot_is_literal() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "00000001xrcd");
        assert!(discover_records(dir.path(), "rcd").unwrap().is_empty());
    }

    #[test]
    fn empty_and_single_file_are_valid() {
        let dir = TempDir::new().unwrap();
        assert!(discover_records(dir.path(), "rcd").unwrap().is_empty());

        touch(&dir, "00000042.rcd");
        let files = discover_records(dir.path(), "rcd").unwrap();
        assert_eq!(names(&files), ["00000042.rcd"]);
    }

    #[test]
    fn consecutive_run_from_any_start_is_valid() {
        let dir = TempDir::new().unwrap();
        for name in ["00000099.rcd", "00000100.rcd", "00000101.rcd"] {
            touch(&dir, name);
        }
        assert_eq!(discover_records(dir.path(), "rcd").unwrap().len(), 3);
    }

    #[test]
    fn gap_is_rejected() {
        let dir = TempDir::new().unwrap();
        for name in ["00000001.rcd", "00000002.rcd", "00000004.rcd"] {
            touch(&dir, name);
        }
        let err = discover_records(dir.path(), "rcd").unwrap_err();
        match err {
            SalesError::NonSequentialFiles { previous, next } => {
                assert_eq!(previous, "00000002.rcd");
                assert_eq!(next, "00000004.rcd");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn custom_extension() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "00000001.sal");
        touch(&dir, "00000002.rcd");
        let files = discover_records(dir.path(), "sal").unwrap();
        assert_eq!(names(&files), ["00000001.sal"]);
    }
}
