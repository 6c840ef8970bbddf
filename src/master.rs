//! Master list loading: `<code>,<name>` definition files.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, error, info};

use crate::config::CompiledCategory;
use crate::error::{SalesError, SalesResult};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CodeEntry {
    pub code: String,
    pub name: String,
}

/// Codes of one category, in the order they first appear in the definition file.
#[derive(Debug, Clone, Default)]
pub struct MasterList {
    category: String,
    entries: Vec<CodeEntry>,
    positions: HashMap<String, usize>,
}

impl MasterList {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    /// Adds an entry. A repeated code replaces the earlier name but keeps its
    /// first position.
    pub fn insert(&mut self, entry: CodeEntry) {
        match self.positions.get(&entry.code) {
            Some(&idx) => self.entries[idx] = entry,
            None => {
                self.positions.insert(entry.code.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn contains(&self, code: &str) -> bool {
        self.positions.contains_key(code)
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.positions
            .get(code)
            .map(|&idx| self.entries[idx].name.as_str())
    }

    pub fn entries(&self) -> &[CodeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulated amount per code. Keys are fixed at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TotalsTable {
    totals: HashMap<String, u64>,
}

impl TotalsTable {
    /// Every code of `master` starting at zero.
    pub fn for_master(master: &MasterList) -> Self {
        Self {
            totals: master
                .entries()
                .iter()
                .map(|entry| (entry.code.clone(), 0))
                .collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<u64> {
        self.totals.get(code).copied()
    }

    /// Overwrites the total of a code that is already present. Unknown codes
    /// are ignored so the key set never grows.
    pub(crate) fn set(&mut self, code: &str, total: u64) {
        if let Some(slot) = self.totals.get_mut(code) {
            *slot = total;
        }
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.totals.iter().map(|(code, total)| (code.as_str(), *total))
    }
}

/// Parses `<dir>/<definition_file>` for one category.
///
/// Each line must hold exactly two comma-separated fields, the first matching
/// the category's code pattern and the second non-empty. Any bad line fails the
/// whole load.
pub fn load_master<P: AsRef<Path>>(
    dir: P,
    compiled: &CompiledCategory,
) -> SalesResult<(MasterList, TotalsTable)> {
    let category = &compiled.category;
    let path = dir.as_ref().join(&category.definition_file);

    let mut file = match File::open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            error!(path = %path.display(), "Definition file missing");
            return Err(SalesError::FileNotFound {
                category: category.name.clone(),
            });
        }
        Err(e) => return Err(SalesError::unknown(e)),
    };
    if !file.metadata()?.is_file() {
        error!(path = %path.display(), "Definition path is not a regular file");
        return Err(SalesError::FileNotFound {
            category: category.name.clone(),
        });
    }

    let mut content = String::new();
    file.read_to_string(&mut content)?;

    // The csv reader drops empty lines, so they are caught here.
    if let Some(idx) = content.lines().position(str::is_empty) {
        error!(category = %category.name, line = idx + 1, "Blank definition line");
        return Err(SalesError::invalid_definition(&category.name));
    }

    // Names are passed through verbatim, so quotes carry no meaning here.
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(content.as_bytes());

    let mut master = MasterList::new(&category.name);
    for result in rdr.records() {
        let record = result.map_err(SalesError::unknown)?;
        let line = record.position().map_or(0, |p| p.line());

        if record.len() != 2
            || !compiled.code_pattern.is_match(&record[0])
            || record[1].is_empty()
        {
            error!(category = %category.name, line, "Malformed definition line");
            return Err(SalesError::invalid_definition(&category.name));
        }

        let entry: CodeEntry = record.deserialize(None).map_err(SalesError::unknown)?;
        debug!(category = %category.name, code = %entry.code, "Loaded code");
        master.insert(entry);
    }

    let totals = TotalsTable::for_master(&master);
    info!(category = %category.name, codes = master.len(), "Master list loaded");
    Ok((master, totals))
}
