//! Writes `<code>,<name>,<total>` summary files.

use std::fs::{self, File};
use std::path::Path;

use serde::Serialize;
use tracing::{error, info};

use crate::error::{SalesError, SalesResult};
use crate::master::{MasterList, TotalsTable};

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    code: &'a str,
    name: &'a str,
    total: u64,
}

/// Writes one row per code of `master`, in master-list order, to
/// `<dir>/<file_name>`.
///
/// Output goes to a sibling `.tmp` file first and is renamed into place once
/// complete, so the final name never holds a partial report.
pub fn write_report<P: AsRef<Path>>(
    dir: P,
    file_name: &str,
    master: &MasterList,
    totals: &TotalsTable,
) -> SalesResult<()> {
    let path = dir.as_ref().join(file_name);
    let temp_path = dir.as_ref().join(format!("{file_name}.tmp"));

    let write_error = |reason: String| {
        error!(file = file_name, %reason, "Report write failed");
        let _ = fs::remove_file(&temp_path);
        SalesError::WriteError {
            file: file_name.to_owned(),
            reason,
        }
    };

    let file = File::create(&temp_path).map_err(|e| write_error(e.to_string()))?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);

    for entry in master.entries() {
        let row = ReportRow {
            code: &entry.code,
            name: &entry.name,
            total: totals.get(&entry.code).unwrap_or(0),
        };
        wtr.serialize(row).map_err(|e| write_error(e.to_string()))?;
    }

    // Closing the file is a separate failure from writing rows into it.
    let file = wtr.into_inner().map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        SalesError::unknown(e)
    })?;
    file.sync_all().map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        SalesError::unknown(e)
    })?;
    drop(file);

    fs::rename(&temp_path, &path).map_err(|e| write_error(e.to_string()))?;

    info!(file = file_name, rows = master.len(), "Report written");
    Ok(())
}
