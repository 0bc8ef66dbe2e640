use std::io;
use std::path::PathBuf;

use thiserror::Error;

// ENOMEM
const OUT_OF_MEMORY_CODE: i32 = 12;

/// Failures of the hash table itself.
///
/// None of them are recoverable: they signal either memory exhaustion
/// or a table built with a nonsensical capacity.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Table capacity must be at least 1")]
    ZeroCapacity,
    #[error("Failed to allocate memory for {what}")]
    Allocation { what: &'static str },
    #[error("Bucket index {index} out of range, table capacity is {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },
}

impl TableError {
    /// OS error code matching this failure, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            TableError::Allocation { .. } => Some(OUT_OF_MEMORY_CODE),
            TableError::ZeroCapacity | TableError::IndexOutOfRange { .. } => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open dict file {}", path.display())]
    OpenDictionary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read dict file {}", path.display())]
    ReadDictionary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// OS error code behind this error, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Error::OpenDictionary { source, .. } | Error::ReadDictionary { source, .. } => {
                source.raw_os_error()
            }
            Error::Io(err) => err.raw_os_error(),
            Error::Table(err) => err.raw_os_error(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
