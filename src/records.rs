//! Record file validation against the loaded master lists.

use std::fs::File;
use std::io::{BufRead, BufReader};

use tracing::{debug, error};

use crate::discover::RecordFile;
use crate::error::{SalesError, SalesResult};
use crate::master::MasterList;

/// One validated record file: a code per master category, in category
/// order, and the sale amount.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub file: String,
    pub codes: Vec<String>,
    pub amount: u64,
}

/// Reads `file` and checks it against the loaded master lists.
///
/// The file must have exactly one line per master list followed by one amount
/// line. Checks run in line order, so the first bad line decides the error.
pub fn validate_record(file: &RecordFile, masters: &[MasterList]) -> SalesResult<SalesRecord> {
    let reader = BufReader::new(File::open(&file.path)?);
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;

    if lines.len() != masters.len() + 1 {
        error!(
            file = %file.name,
            lines = lines.len(),
            expected = masters.len() + 1,
            "Wrong line count"
        );
        return Err(SalesError::invalid_record(&file.name));
    }

    let mut codes = Vec::with_capacity(masters.len());
    for (master, code) in masters.iter().zip(&lines) {
        if !master.contains(code) {
            error!(
                file = %file.name,
                category = master.category(),
                code = %code,
                "Code not in master list"
            );
            return Err(SalesError::unknown_code(&file.name, master.category()));
        }
        codes.push(code.clone());
    }

    let amount = parse_amount(&file.name, &lines[masters.len()])?;
    debug!(file = %file.name, ?codes, amount, "Record validated");

    Ok(SalesRecord {
        file: file.name.clone(),
        codes,
        amount,
    })
}

fn parse_amount(file: &str, raw: &str) -> SalesResult<u64> {
    if !raw.chars().all(|c| c.is_ascii_digit()) {
        error!(file, amount = raw, "Amount is not a plain decimal number");
        return Err(SalesError::unknown(format!("non-numeric amount in {file}")));
    }
    if raw.is_empty() {
        error!(file, "Amount line is empty");
        return Err(SalesError::invalid_record(file));
    }
    // Only digits remain, so the parse can only fail on size.
    raw.parse::<u64>().map_err(|_| {
        error!(file, amount = raw, "Amount does not fit in 64 bits");
        SalesError::AmountOverflow {
            file: file.to_owned(),
        }
    })
}
