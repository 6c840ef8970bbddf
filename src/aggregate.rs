//! Per-record accumulation into the category totals.

use tracing::{debug, error};

use crate::error::{SalesError, SalesResult};
use crate::master::TotalsTable;
use crate::records::SalesRecord;

/// Exclusive upper bound for any accumulated total (ten decimal digits).
pub const TOTAL_CEILING: u64 = 10_000_000_000;

/// Adds `record.amount` to the total of each of its codes.
///
/// `totals` is indexed like `record.codes`. Every new total is checked before
/// any is stored, so a record that overflows one table leaves all tables
/// untouched.
pub fn accumulate(record: &SalesRecord, totals: &mut [TotalsTable]) -> SalesResult<()> {
    if record.codes.len() != totals.len() {
        return Err(SalesError::unknown(format!(
            "{} carries {} codes for {} tables",
            record.file,
            record.codes.len(),
            totals.len()
        )));
    }

    let mut updates = Vec::with_capacity(totals.len());
    for (code, table) in record.codes.iter().zip(totals.iter()) {
        let Some(current) = table.get(code) else {
            return Err(SalesError::unknown(format!(
                "{} references {code} which has no total",
                record.file
            )));
        };
        let new_total = current
            .checked_add(record.amount)
            .filter(|total| *total < TOTAL_CEILING)
            .ok_or_else(|| {
                error!(
                    file = %record.file,
                    code = %code,
                    current,
                    amount = record.amount,
                    "Total exceeds ten digits"
                );
                SalesError::AmountOverflow {
                    file: record.file.clone(),
                }
            })?;
        updates.push(new_total);
    }

    for ((code, table), new_total) in record.codes.iter().zip(totals.iter_mut()).zip(updates) {
        table.set(code, new_total);
        debug!(file = %record.file, code = %code, total = new_total, "Total updated");
    }
    Ok(())
}
