//! Per-id occurrence counts used to re-layout a repository.
//!
//! A [`Frequency`] is not tied to any repository. Counts can come from the
//! repository's own traffic, from [`Frequency::add_all`], or from statistics
//! gathered elsewhere; [`Repository::optimize`](crate::Repository::optimize)
//! only consults the ids that are live in the repository it runs on.

use hashbrown::HashMap;

use crate::id::StringId;
use crate::repository::Repository;

/// Sparse map from id to occurrence count.
///
/// # Examples
///
/// ```
/// use intern_mem::{Frequency, Repository};
///
/// let mut repository = Repository::new();
/// let mut frequency = Frequency::new();
///
/// for s in ["foo", "bar", "qux", "qux", "qux", "foo"] {
///     frequency.add(repository.intern(s)?);
/// }
///
/// let qux = repository.lookup("qux").unwrap();
/// assert_eq!(frequency.count(qux), 3);
/// assert_eq!(frequency.len(), 3);
/// # Ok::<(), intern_mem::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Frequency {
    counts: HashMap<StringId, u64>,
}

impl Frequency {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more occurrence of `id`.
    pub fn add(&mut self, id: StringId) {
        let count = self.counts.entry(id).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Counts one occurrence of every string live in `repository`.
    ///
    /// This makes every live string part of the next optimized repository
    /// without changing the order set by earlier counts.
    pub fn add_all(&mut self, repository: &Repository) {
        self.counts.reserve(repository.count() as usize);
        for (id, _) in repository {
            self.add(id);
        }
    }

    /// Occurrences recorded for `id`, 0 if it was never added.
    #[must_use]
    pub fn count(&self, id: StringId) -> u64 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Number of distinct ids tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over `(id, count)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (StringId, u64)> + '_ {
        self.counts.iter().map(|(&id, &count)| (id, count))
    }
}

impl Extend<StringId> for Frequency {
    fn extend<I: IntoIterator<Item = StringId>>(&mut self, ids: I) {
        for id in ids {
            self.add(id);
        }
    }
}
