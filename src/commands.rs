//! One handler per user action. Handlers print their outcome to `out`;
//! rejected input and locked files are reported there and are not errors.

use std::{error::Error, io::Write, path::Path};

use crate::analytics::{summarize_file, LocalSummary, Summary};
use crate::error::StoreError;
use crate::format::{
    format_dataset_summary, format_local_summary, format_record_detail, format_records_table,
};
use crate::records::NewRecord;
use crate::store::RecordStore;

/// Returns whether the record was stored.
pub fn add_customer<W: Write>(
    store: &RecordStore,
    new: NewRecord,
    out: &mut W,
) -> Result<bool, StoreError> {
    match store.append(new) {
        Ok(record) => {
            writeln!(out, "Record added! Total Bill = {}", record.amount)?;
            Ok(true)
        }
        Err(StoreError::InvalidRoomType(_)) => {
            writeln!(out, "Invalid room type! Use Single, Double or Deluxe.")?;
            Ok(false)
        }
        Err(StoreError::InvalidDays(_)) => {
            writeln!(out, "Invalid number of days. Operation cancelled.")?;
            Ok(false)
        }
        Err(StoreError::FileLocked { .. }) => {
            writeln!(
                out,
                "Failed to write file after several attempts. Please close any program locking the file."
            )?;
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

pub fn view_customers<W: Write>(store: &RecordStore, out: &mut W) -> Result<(), StoreError> {
    let rows = store.rows()?;
    if rows.is_empty() {
        writeln!(out, "No records found!")?;
    } else {
        writeln!(out, "{}", format_records_table(&rows))?;
    }
    Ok(())
}

pub fn search_customer<W: Write>(
    store: &RecordStore,
    key: &str,
    out: &mut W,
) -> Result<(), StoreError> {
    let found = store.find(key)?;
    if found.is_empty() {
        writeln!(out, "Customer not found!")?;
    }
    for row in &found {
        writeln!(out, "\nCustomer Found:\n{}", format_record_detail(row))?;
    }
    Ok(())
}

pub fn delete_customer<W: Write>(
    store: &RecordStore,
    key: &str,
    out: &mut W,
) -> Result<(), StoreError> {
    match store.remove(key) {
        Ok(true) => writeln!(out, "Record deleted successfully!")?,
        Ok(false) => writeln!(out, "Customer not found!")?,
        Err(StoreError::FileLocked { .. }) => writeln!(
            out,
            "Permission denied while writing file. Close the CSV and try again."
        )?,
        Err(e) => return Err(e),
    }
    Ok(())
}

pub fn show_stats<W: Write>(
    store: &RecordStore,
    dataset: Option<&Path>,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let summary = match dataset {
        Some(path) => {
            writeln!(out, "Dataset path chosen: {}", path.display())?;
            summarize_file(path)?
        }
        None => Summary::Local(LocalSummary::from_records(&store.list()?)),
    };

    match summary {
        Summary::Local(summary) => write!(out, "{}", format_local_summary(&summary))?,
        Summary::Dataset(summary) => write!(out, "{}", format_dataset_summary(&summary))?,
    }
    writeln!(out, "\nAnalysis complete.")?;
    Ok(())
}
