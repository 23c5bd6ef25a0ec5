//! Checkpoints of a repository's mark.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one repository instance for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RepositoryTag(u64);

impl RepositoryTag {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A point a repository can be restored to.
///
/// A snapshot records how many strings were live when it was taken. Restoring
/// it drops every string interned afterwards. It stays valid until the
/// repository is restored to an earlier point; after that, restoring it fails
/// with [`Error::InvalidSnapshot`](crate::Error::InvalidSnapshot).
///
/// Snapshots are only accepted by the repository that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub(crate) tag: RepositoryTag,
    pub(crate) mark: u32,
}

impl Snapshot {
    /// Number of strings that were live when the snapshot was taken.
    #[must_use]
    pub const fn mark(&self) -> u32 {
        self.mark
    }
}
