//! Forward traversal of a repository in id order.
//!
//! [`Cursor`] is a positioned reader: it starts before the first string, and
//! [`Cursor::advance`] steps to the next id until it runs past the last one.
//! [`Iter`] is the same walk as a standard iterator.
//!
//! Both borrow the repository, so it cannot be interned into or restored while
//! a cursor or iterator is alive.

use std::iter::FusedIterator;

use crate::id::StringId;
use crate::repository::Repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Before,
    At(StringId),
    Exhausted,
}

/// A forward-only cursor over the live strings of a repository.
///
/// # Examples
///
/// ```
/// use intern_mem::Repository;
///
/// let mut repository = Repository::new();
/// for s in ["foo", "bar", "baz"] {
///     repository.intern(s)?;
/// }
///
/// let mut cursor = repository.cursor();
/// assert_eq!(cursor.id(), None);
///
/// let mut seen = Vec::new();
/// while cursor.advance() {
///     seen.push((cursor.raw_id(), cursor.as_str().unwrap()));
/// }
/// assert_eq!(seen, [(1, "foo"), (2, "bar"), (3, "baz")]);
///
/// // Once exhausted the cursor has no id and an empty string.
/// assert_eq!(cursor.raw_id(), 0);
/// assert!(cursor.bytes().is_empty());
/// # Ok::<(), intern_mem::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    repository: &'a Repository,
    position: Position,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(repository: &'a Repository) -> Self {
        Cursor {
            repository,
            position: Position::Before,
        }
    }

    /// Moves to the next string. Returns false, and stays exhausted, once
    /// every string has been visited.
    pub fn advance(&mut self) -> bool {
        let next = match self.position {
            Position::Before => Some(StringId::FIRST),
            Position::At(id) => id.next(),
            Position::Exhausted => None,
        };

        self.position = match next {
            Some(id) if id.as_u32() <= self.repository.count() => Position::At(id),
            _ => Position::Exhausted,
        };
        matches!(self.position, Position::At(_))
    }

    /// Id of the current string, or `None` before the first `advance` and
    /// after the last.
    #[must_use]
    pub fn id(&self) -> Option<StringId> {
        match self.position {
            Position::At(id) => Some(id),
            Position::Before | Position::Exhausted => None,
        }
    }

    /// Id of the current string, or 0 when the cursor is not on a string.
    #[must_use]
    pub fn raw_id(&self) -> u32 {
        self.id().map_or(0, StringId::as_u32)
    }

    /// Bytes of the current string, or an empty slice when the cursor is not
    /// on a string.
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.id()
            .and_then(|id| self.repository.lookup_id(id))
            .unwrap_or_default()
    }

    /// The current string as UTF-8, if the cursor is on a valid UTF-8 string.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        self.id().and_then(|id| self.repository.lookup_str(id))
    }
}

/// Iterator over `(id, bytes)` pairs of a repository, in id order.
///
/// # Examples
///
/// ```
/// use intern_mem::Repository;
///
/// let mut repository = Repository::new();
/// repository.intern("a")?;
/// repository.intern("b")?;
///
/// let strings: Vec<&[u8]> = repository.iter().map(|(_, bytes)| bytes).collect();
/// assert_eq!(strings, [&b"a"[..], &b"b"[..]]);
/// # Ok::<(), intern_mem::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    repository: &'a Repository,
    /// Next raw id to yield; one past the end once exhausted.
    next: u64,
    end: u64,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(repository: &'a Repository) -> Self {
        Iter {
            repository,
            next: 1,
            end: u64::from(repository.count()),
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (StringId, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.end {
            return None;
        }
        let id = StringId::new(u32::try_from(self.next).ok()?)?;
        self.next += 1;
        Some((id, self.repository.lookup_id(id)?))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end + 1).saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
