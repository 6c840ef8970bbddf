//! Drives a full run: masters, discovery, validation, aggregation, reports.
//! The first failure at any step ends the run.

use std::path::Path;

use tracing::info;

use crate::aggregate::accumulate;
use crate::config::{CompiledCategory, MasterCategory, RunConfig};
use crate::discover::{discover_records, RecordFile};
use crate::error::SalesResult;
use crate::master::{load_master, MasterList, TotalsTable};
use crate::records::validate_record;
use crate::report::write_report;

/// Master lists and running totals for every category of a run.
#[derive(Debug)]
pub struct Tally {
    categories: Vec<MasterCategory>,
    masters: Vec<MasterList>,
    totals: Vec<TotalsTable>,
}

impl Tally {
    /// Loads every category's definition file, stopping at the first failure.
    pub fn load<P: AsRef<Path>>(dir: P, compiled: &[CompiledCategory]) -> SalesResult<Self> {
        let mut tally = Self {
            categories: Vec::with_capacity(compiled.len()),
            masters: Vec::with_capacity(compiled.len()),
            totals: Vec::with_capacity(compiled.len()),
        };
        for category in compiled {
            let (master, totals) = load_master(dir.as_ref(), category)?;
            tally.categories.push(category.category.clone());
            tally.masters.push(master);
            tally.totals.push(totals);
        }
        Ok(tally)
    }

    /// Validates one record file and adds its amount to every category.
    pub fn ingest(&mut self, file: &RecordFile) -> SalesResult<()> {
        let record = validate_record(file, &self.masters)?;
        accumulate(&record, &mut self.totals)
    }

    /// Writes one report per category, in category order.
    pub fn write_reports<P: AsRef<Path>>(&self, dir: P) -> SalesResult<()> {
        let reports = self
            .categories
            .iter()
            .zip(&self.masters)
            .zip(&self.totals);
        for ((category, master), totals) in reports {
            write_report(dir.as_ref(), &category.output_file, master, totals)?;
        }
        Ok(())
    }

    /// Running totals for the category called `name`.
    pub fn totals(&self, name: &str) -> Option<&TotalsTable> {
        self.categories
            .iter()
            .position(|c| c.name == name)
            .map(|idx| &self.totals[idx])
    }
}

/// What a successful run processed.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub record_files: usize,
    pub reports: Vec<String>,
}

/// Runs every step against `dir` with the given layout.
pub fn run_pipeline<P: AsRef<Path>>(dir: P, config: &RunConfig) -> SalesResult<RunSummary> {
    let dir = dir.as_ref();
    let compiled = config.compile()?;

    info!(dir = %dir.display(), categories = compiled.len(), "Loading master lists");
    let mut tally = Tally::load(dir, &compiled)?;

    let files = discover_records(dir, &config.record_extension)?;
    for file in &files {
        tally.ingest(file)?;
    }
    info!(files = files.len(), "Record files aggregated");

    tally.write_reports(dir)?;

    Ok(RunSummary {
        record_files: files.len(),
        reports: config
            .categories
            .iter()
            .map(|c| c.output_file.clone())
            .collect(),
    })
}
