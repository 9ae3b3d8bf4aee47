use chrono::{Local, NaiveDate};
use std::{
    fs::{self, File, OpenOptions},
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::records::{NewRecord, Record, StoredRow, HEADER};

/// Bounded retry for writes that hit a file held open by another program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Runs `op` until it succeeds, fails with something other than a lock
    /// conflict, or `max_attempts` is used up.
    pub fn run<T, F>(&self, path: &Path, mut op: F) -> Result<T, StoreError>
    where
        F: FnMut() -> io::Result<T>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if is_lock_conflict(&e) => {
                    warn!(
                        path = %path.display(),
                        attempt,
                        max_attempts,
                        error = %e,
                        "data file is locked, make sure it is not open in another program"
                    );
                    if attempt >= max_attempts {
                        return Err(StoreError::FileLocked {
                            path: path.to_path_buf(),
                            attempts: attempt,
                        });
                    }
                    attempt += 1;
                    thread::sleep(self.backoff);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn is_lock_conflict(e: &io::Error) -> bool {
    if matches!(e.kind(), ErrorKind::PermissionDenied | ErrorKind::WouldBlock) {
        return true;
    }
    // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
    cfg!(windows) && matches!(e.raw_os_error(), Some(32) | Some(33))
}

/// Handle to the customer data file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    retry: RetryPolicy,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retry: RetryPolicy::default(),
        }
    }

    #[cfg(test)]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the data file with its header row if it is missing or empty.
    /// Returns true when the header was written.
    pub fn initialize(&self) -> Result<bool, StoreError> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => return Ok(false),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let header = header_bytes()?;
        fs::write(&self.path, header).map_err(|e| creation_error(&self.path, e))?;

        info!(path = %self.path.display(), "created new data file");
        Ok(true)
    }

    /// Validates, prices and appends a record checked in today.
    pub fn append(&self, new: NewRecord) -> Result<Record, StoreError> {
        self.append_on(new, Local::now().date_naive())
    }

    pub(crate) fn append_on(
        &self,
        new: NewRecord,
        check_in: NaiveDate,
    ) -> Result<Record, StoreError> {
        let record = new.into_record(check_in)?;
        let header = header_bytes()?;
        let row = record_bytes(std::slice::from_ref(&record))?;

        self.retry.run(&self.path, || {
            let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            if file.metadata()?.len() == 0 {
                file.write_all(&header)?;
            }
            file.write_all(&row)
        })?;

        info!(
            customer_id = %record.customer_id,
            room_type = %record.room_type,
            days = record.days,
            amount = record.amount,
            "record added"
        );
        Ok(record)
    }

    /// Rows in file order with their cells as stored. A missing file has no
    /// rows.
    pub fn rows(&self) -> Result<Vec<StoredRow>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "data file does not exist yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        // flexible so a row with missing or extra cells can still be removed
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let rows = rdr
            .records()
            .map(|cells| cells.map(StoredRow::new))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = rows.len(), "loaded rows");
        Ok(rows)
    }

    /// All records in file order. Fails on the first row that does not parse.
    pub fn list(&self) -> Result<Vec<Record>, StoreError> {
        let records = self
            .rows()?
            .iter()
            .map(StoredRow::to_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Every row whose id or name equals `key`, ignoring case. Rows that do
    /// not parse as records are matched too.
    pub fn find(&self, key: &str) -> Result<Vec<StoredRow>, StoreError> {
        Ok(self
            .rows()?
            .into_iter()
            .filter(|row| row.matches_key(key))
            .collect())
    }

    /// Drops every row whose id or name equals `key` and rewrites the file.
    /// Other rows are written back unchanged. Returns whether anything was
    /// removed.
    pub fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let (removed, kept): (Vec<StoredRow>, Vec<StoredRow>) = self
            .rows()?
            .into_iter()
            .partition(|row| row.matches_key(key));

        if removed.is_empty() {
            return Ok(false);
        }

        let mut contents = header_bytes()?;
        contents.extend(row_bytes(&kept)?);
        self.retry.run(&self.path, || fs::write(&self.path, &contents))?;

        info!(
            key = key.trim(),
            removed = removed.len(),
            remaining = kept.len(),
            "records removed"
        );
        Ok(true)
    }
}

/// A failed create is fatal; permission problems get their own variant.
fn creation_error(path: &Path, e: io::Error) -> StoreError {
    match e.kind() {
        ErrorKind::PermissionDenied => StoreError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => StoreError::Io(e),
    }
}

fn header_bytes() -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(HEADER)?;
    wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}

fn record_bytes(records: &[Record]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}

fn row_bytes(rows: &[StoredRow]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        wtr.write_record(row.cells())?;
    }
    wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}
