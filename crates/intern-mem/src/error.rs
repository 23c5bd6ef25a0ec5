//! Error types for the interning engine.

use std::fmt;

/// Errors reported by a [`Repository`](crate::Repository).
///
/// Every variant is reported before any state is changed, so a failed call
/// leaves the repository exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The string plus its terminator does not fit in a single page.
    StringTooLarge {
        /// Length of the rejected string in bytes.
        len: usize,
        /// Configured page size in bytes.
        page_size: usize,
    },

    /// The snapshot does not describe a state this repository can return to.
    ///
    /// Either it was taken after a later restore discarded the state it
    /// refers to, or it belongs to another repository.
    InvalidSnapshot {
        /// Mark recorded in the snapshot.
        snapshot_mark: u32,
        /// Mark of the repository at the time of the restore.
        current_mark: u32,
    },

    /// The system allocator could not provide a new page.
    AllocationFailure {
        /// Requested page size in bytes.
        size: usize,
    },

    /// The requested page size cannot be used.
    InvalidPageSize {
        /// The rejected size in bytes.
        page_size: usize,
    },

    /// Every id up to `u32::MAX` is already live.
    IdSpaceExhausted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::StringTooLarge { len, page_size } => write!(
                f,
                "string of {len} bytes does not fit in a page of {page_size} bytes"
            ),
            Error::InvalidSnapshot {
                snapshot_mark,
                current_mark,
            } => write!(
                f,
                "invalid snapshot: mark {snapshot_mark} is not reachable from mark {current_mark}"
            ),
            Error::AllocationFailure { size } => {
                write!(f, "failed to allocate a page of {size} bytes")
            }
            Error::InvalidPageSize { page_size } => {
                write!(f, "invalid page size: {page_size} bytes")
            }
            Error::IdSpaceExhausted => write!(f, "string id space exhausted"),
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias for interning operations.
pub type Result<T> = std::result::Result<T, Error>;
