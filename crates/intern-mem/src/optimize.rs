//! Frequency-ordered re-layout of a repository.

use std::cmp::Reverse;

use intern_log::debug;

use crate::error::Result;
use crate::frequency::Frequency;
use crate::id::StringId;
use crate::repository::Repository;

impl Repository {
    /// Builds a new repository holding the strings counted in `frequency`,
    /// most frequent first.
    ///
    /// Only ids that are both tracked in `frequency` and live in this
    /// repository are carried over; everything else is left out. Strings are
    /// ordered by descending count, ties by ascending original id, and
    /// interned in that order, so the most frequent string gets id 1 and the
    /// frequent strings end up packed together in the first pages.
    ///
    /// The new repository has the same page size. `self` is not modified.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`](crate::Error::AllocationFailure)
    /// if a page of the new repository cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use intern_mem::{Frequency, Repository};
    ///
    /// let mut repository = Repository::new();
    /// let mut frequency = Frequency::new();
    /// for s in ["foo", "bar", "qux", "qux", "qux", "foo"] {
    ///     frequency.add(repository.intern(s)?);
    /// }
    ///
    /// let optimized = repository.optimize(&frequency)?;
    /// let order: Vec<&str> = optimized
    ///     .iter()
    ///     .map(|(_, s)| std::str::from_utf8(s).unwrap())
    ///     .collect();
    /// assert_eq!(order, ["qux", "foo", "bar"]);
    /// # Ok::<(), intern_mem::Error>(())
    /// ```
    pub fn optimize(&self, frequency: &Frequency) -> Result<Repository> {
        let live = self.count();
        let mut ranked: Vec<(StringId, u64)> = frequency
            .iter()
            .filter(|(id, _)| id.as_u32() <= live)
            .collect();

        // Ids are distinct, so the unstable sort is still deterministic.
        ranked.sort_unstable_by_key(|&(id, count)| (Reverse(count), id));

        let mut optimized = self.factory().create_repository();
        optimized.reserve(ranked.len());
        for (id, _) in &ranked {
            if let Some(bytes) = self.lookup_id(*id) {
                optimized.intern(bytes)?;
            }
        }

        debug!(
            "optimized {} of {} strings into {} bytes of pages",
            optimized.count(),
            live,
            optimized.allocated_bytes()
        );
        Ok(optimized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(repository: &Repository) -> Vec<&str> {
        repository
            .iter()
            .map(|(_, bytes)| std::str::from_utf8(bytes).unwrap())
            .collect()
    }

    fn sample() -> Repository {
        let mut repository = Repository::new();
        for s in ["foo", "bar", "baz"] {
            repository.intern(s).unwrap();
        }
        repository
    }

    #[test]
    fn test_optimize_is_a_projection() {
        let repository = sample();
        let mut frequency = Frequency::new();
        frequency.add(repository.lookup("bar").unwrap());

        let optimized = repository.optimize(&frequency).unwrap();
        assert_eq!(strings(&optimized), ["bar"]);
        assert_eq!(optimized.lookup("bar").unwrap().as_u32(), 1);
        assert_eq!(optimized.lookup("foo"), None);
    }

    #[test]
    fn test_optimize_orders_by_descending_count() {
        let repository = sample();
        let mut frequency = Frequency::new();
        let bar = repository.lookup("bar").unwrap();
        let baz = repository.lookup("baz").unwrap();

        frequency.add(bar);
        frequency.add(baz);
        frequency.add(baz);
        assert_eq!(strings(&repository.optimize(&frequency).unwrap()), ["baz", "bar"]);

        frequency.add_all(&repository);
        frequency.add(baz);
        frequency.add(bar);
        assert_eq!(
            strings(&repository.optimize(&frequency).unwrap()),
            ["baz", "bar", "foo"]
        );
    }

    #[test]
    fn test_ties_keep_original_order() {
        let repository = sample();
        let mut frequency = Frequency::new();
        frequency.add_all(&repository);

        assert_eq!(
            strings(&repository.optimize(&frequency).unwrap()),
            ["foo", "bar", "baz"]
        );
    }

    #[test]
    fn test_ids_beyond_count_are_ignored() {
        let repository = sample();
        let mut frequency = Frequency::new();
        frequency.add(StringId::new(99).unwrap());
        frequency.add(StringId::new(1).unwrap());

        let optimized = repository.optimize(&frequency).unwrap();
        assert_eq!(strings(&optimized), ["foo"]);
    }

    #[test]
    fn test_source_is_untouched_and_page_size_kept() {
        let mut repository = Repository::with_page_size(64).unwrap();
        for s in ["a", "b", "c"] {
            repository.intern(s).unwrap();
        }
        let mut frequency = Frequency::new();
        frequency.add(StringId::new(3).unwrap());

        let optimized = repository.optimize(&frequency).unwrap();
        assert_eq!(optimized.page_size(), 64);
        assert_eq!(repository.count(), 3);
        assert_eq!(strings(&repository), ["a", "b", "c"]);
    }

    #[test]
    fn test_empty_frequency_gives_empty_repository() {
        let repository = sample();
        let optimized = repository.optimize(&Frequency::new()).unwrap();
        assert!(optimized.is_empty());
        assert_eq!(optimized.allocated_bytes(), 0);
    }

    #[test]
    fn test_optimized_repository_has_its_own_snapshots() {
        let repository = sample();
        let mut frequency = Frequency::new();
        frequency.add_all(&repository);
        let mut optimized = repository.optimize(&frequency).unwrap();

        let foreign = repository.snapshot();
        assert!(optimized.restore(foreign).is_err());

        let own = optimized.snapshot();
        optimized.intern("new").unwrap();
        optimized.restore(own).unwrap();
        assert_eq!(optimized.count(), 3);
    }
}
