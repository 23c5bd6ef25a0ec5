//! The string repository: interning, two-way lookup and checkpoints.
//!
//! # Design
//!
//! A repository combines three parts:
//! - a [`PageArena`] that owns the bytes of every string
//! - an index mapping ids to arena slots and string contents back to ids
//! - a mark, the number of live strings, which is also the highest live id
//!
//! New strings get `mark + 1`. [`Repository::restore`] lowers the mark and
//! forgets every string above it, so the ids of forgotten strings are handed
//! out again:
//!
//! ```
//! use intern_mem::Repository;
//!
//! let mut repository = Repository::new();
//! repository.intern("foo")?;
//!
//! let snapshot = repository.snapshot();
//! assert_eq!(repository.intern("bar")?.as_u32(), 2);
//! assert_eq!(repository.intern("qux")?.as_u32(), 3);
//!
//! repository.restore(snapshot)?;
//!
//! // Id 2 belonged to "bar" before the restore.
//! assert_eq!(repository.intern("xyz")?.as_u32(), 2);
//! assert_eq!(repository.lookup_id(2u32), Some(&b"xyz"[..]));
//! assert_eq!(repository.lookup("bar"), None);
//! # Ok::<(), intern_mem::Error>(())
//! ```
//!
//! Ids are therefore unique among live strings only, not across the whole
//! history of a repository.
//!
//! # Concurrency
//!
//! Interning and restoring take `&mut self`; lookups take `&self`. A
//! repository can be moved between threads but has no internal locking;
//! share it behind a `Mutex` if several threads need it.

use std::fmt;

use intern_log::{debug, warn};

use crate::arena::{PageArena, PageStats};
use crate::cursor::{Cursor, Iter};
use crate::error::{Error, Result};
use crate::factory::RepositoryFactory;
use crate::id::StringId;
use crate::index::{Index, hash_bytes};
use crate::snapshot::{RepositoryTag, Snapshot};

/// A deduplicated store of byte strings with compact integer ids.
///
/// # Examples
///
/// ```
/// use intern_mem::Repository;
///
/// let mut repository = Repository::new();
///
/// let foo = repository.intern("foo")?;
/// let bar = repository.intern("bar")?;
/// assert_eq!(repository.intern("foo")?, foo);
///
/// assert_eq!(foo.as_u32(), 1);
/// assert_eq!(bar.as_u32(), 2);
/// assert_eq!(repository.count(), 2);
///
/// assert_eq!(repository.lookup("bar"), Some(bar));
/// assert_eq!(repository.lookup_str(foo), Some("foo"));
/// # Ok::<(), intern_mem::Error>(())
/// ```
pub struct Repository {
    tag: RepositoryTag,
    factory: RepositoryFactory,
    arena: PageArena,
    index: Index,
}

impl Repository {
    /// Creates an empty repository with the default page size.
    #[must_use]
    pub fn new() -> Self {
        Self::from_factory(RepositoryFactory::default())
    }

    /// Creates an empty repository with pages of `page_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPageSize`] if the size is zero or does not fit
    /// in 32 bits.
    pub fn with_page_size(page_size: usize) -> Result<Self> {
        Ok(RepositoryFactory::new(page_size)?.create_repository())
    }

    pub(crate) fn from_factory(factory: RepositoryFactory) -> Self {
        Repository {
            tag: RepositoryTag::next(),
            factory,
            arena: PageArena::new(factory.page_size()),
            index: Index::new(),
        }
    }

    /// The factory describing this repository's configuration.
    #[must_use]
    pub const fn factory(&self) -> RepositoryFactory {
        self.factory
    }

    /// Interns a string and returns its id.
    ///
    /// A string seen before gets its existing id back and nothing is
    /// allocated. A new string is copied into the arena and gets the next id.
    ///
    /// # Errors
    ///
    /// - [`Error::StringTooLarge`] if the string is not shorter than the page
    ///   size
    /// - [`Error::AllocationFailure`] if a page cannot be allocated
    /// - [`Error::IdSpaceExhausted`] if `u32::MAX` strings are already live
    ///
    /// The repository is unchanged when an error is returned.
    pub fn intern(&mut self, s: impl AsRef<[u8]>) -> Result<StringId> {
        let bytes = s.as_ref();
        let hash = hash_bytes(bytes);

        if let Some(id) = self.index.find(&self.arena, hash, bytes) {
            return Ok(id);
        }

        if self.index.len() == u32::MAX {
            return Err(Error::IdSpaceExhausted);
        }

        let slot = self.arena.push(bytes)?;
        Ok(self.index.insert(hash, slot))
    }

    /// Returns the id of a string, if it has been interned.
    #[must_use]
    pub fn lookup(&self, s: impl AsRef<[u8]>) -> Option<StringId> {
        let bytes = s.as_ref();
        self.index.find(&self.arena, hash_bytes(bytes), bytes)
    }

    /// Returns the string with the given id.
    ///
    /// Accepts either a [`StringId`] or a raw `u32`. Zero and any id above
    /// [`count`](Self::count) are not found.
    ///
    /// ```
    /// use intern_mem::Repository;
    ///
    /// let mut repository = Repository::new();
    /// let id = repository.intern("foo")?;
    ///
    /// assert_eq!(repository.lookup_id(id), Some(&b"foo"[..]));
    /// assert_eq!(repository.lookup_id(0u32), None);
    /// assert_eq!(repository.lookup_id(2u32), None);
    /// # Ok::<(), intern_mem::Error>(())
    /// ```
    #[must_use]
    pub fn lookup_id(&self, id: impl Into<u32>) -> Option<&[u8]> {
        let id = StringId::new(id.into())?;
        let slot = self.index.slot(id)?;
        Some(self.arena.get(slot))
    }

    /// Like [`lookup_id`](Self::lookup_id), for strings that are valid UTF-8.
    #[must_use]
    pub fn lookup_str(&self, id: impl Into<u32>) -> Option<&str> {
        std::str::from_utf8(self.lookup_id(id)?).ok()
    }

    /// Number of live strings. Also the highest live id.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.index.len()
    }

    /// Returns true if no strings are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Capacity of every page, and one more than the longest storable string.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.arena.page_size()
    }

    /// Total bytes of all pages allocated so far.
    ///
    /// Never decreases: pages emptied by a restore are kept for reuse.
    #[must_use]
    pub fn allocated_bytes(&self) -> u64 {
        self.arena.allocated_bytes()
    }

    /// Page usage statistics.
    #[must_use]
    pub fn stats(&self) -> PageStats {
        self.arena.stats()
    }

    /// Reserves index room for at least `additional` more strings.
    pub fn reserve(&mut self, additional: usize) {
        self.index.reserve(additional);
    }

    /// Creates a cursor positioned before the first string.
    #[must_use]
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self)
    }

    /// Iterates over `(id, bytes)` pairs in id order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Captures the current mark.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tag: self.tag,
            mark: self.count(),
        }
    }

    /// Rolls the repository back to `snapshot`.
    ///
    /// Every string interned after the snapshot was taken is forgotten, and
    /// the next new string receives id `snapshot.mark() + 1`. Restoring the
    /// current state is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSnapshot`] without changing anything if the
    /// snapshot's mark is above the current mark (an intervening restore
    /// discarded the state it describes) or if another repository created it.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<()> {
        let current = self.count();

        if snapshot.tag != self.tag || snapshot.mark > current {
            warn!(
                "rejected snapshot at mark {} (current mark {}, same repository: {})",
                snapshot.mark,
                current,
                snapshot.tag == self.tag
            );
            return Err(Error::InvalidSnapshot {
                snapshot_mark: snapshot.mark,
                current_mark: current,
            });
        }

        if snapshot.mark == current {
            return Ok(());
        }

        self.index.truncate(snapshot.mark);
        let tail = StringId::new(snapshot.mark).and_then(|id| self.index.slot(id));
        self.arena.rewind(tail);

        debug!(
            "restored mark {} -> {} ({} bytes in use)",
            current,
            snapshot.mark,
            self.arena.used_bytes()
        );
        Ok(())
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("count", &self.count())
            .field("page_size", &self.page_size())
            .field("allocated_bytes", &self.allocated_bytes())
            .finish()
    }
}

impl<'a> IntoIterator for &'a Repository {
    type Item = (StringId, &'a [u8]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
