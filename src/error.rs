use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures surfaced by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid room type '{0}': use Single, Double or Deluxe")]
    InvalidRoomType(String),
    #[error("invalid number of days '{0}': expected a non-negative whole number")]
    InvalidDays(String),
    #[error("'{}' is held by another program, gave up after {attempts} attempts", path.display())]
    FileLocked { path: PathBuf, attempts: u32 },
    #[error("permission denied: cannot create '{}'", path.display())]
    PermissionDenied { path: PathBuf },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

