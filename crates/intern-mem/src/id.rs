//! Identifiers handed out by a repository.
//!
//! Ids start at 1 and grow by one for every new string. Zero is never issued,
//! which lets `Option<StringId>` stay four bytes wide and gives callers that
//! speak raw integers a natural "not found" value.
//!
//! # Examples
//!
//! ```
//! use intern_mem::StringId;
//!
//! let id = StringId::new(42).unwrap();
//! assert_eq!(id.as_u32(), 42);
//! assert!(StringId::new(0).is_none());
//! assert_eq!(std::mem::size_of::<Option<StringId>>(), 4);
//! ```

use std::fmt;
use std::num::NonZeroU32;

/// The id of an interned string.
///
/// An id is only meaningful together with the repository that issued it, and
/// only while that repository has not been restored to a point before it was
/// issued. After such a restore the same id may be given to another string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StringId(NonZeroU32);

impl StringId {
    /// The first id a repository issues.
    pub const FIRST: StringId = StringId(NonZeroU32::MIN);

    /// Wraps a raw id, returning `None` for zero.
    #[must_use]
    pub const fn new(id: u32) -> Option<Self> {
        match NonZeroU32::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0.get()
    }

    /// Returns the raw id value as usize.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0.get() as usize
    }

    /// Position of this id in a zero-based dense table.
    pub(crate) const fn index(self) -> usize {
        self.as_usize() - 1
    }

    /// The id following this one, if any.
    pub(crate) const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<NonZeroU32> for StringId {
    fn from(id: NonZeroU32) -> Self {
        Self(id)
    }
}

impl From<StringId> for u32 {
    fn from(id: StringId) -> Self {
        id.as_u32()
    }
}
