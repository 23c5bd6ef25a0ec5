//! Factory for creating repositories with a fixed page size.
//!
//! `RepositoryFactory` holds a page size that has already been validated, so
//! creating a repository from it cannot fail. Repositories remember the
//! factory they came from; [`Repository::optimize`] uses it to build its
//! output with the same page size as the input.
//!
//! # Examples
//!
//! ```
//! use intern_mem::RepositoryFactory;
//!
//! let factory = RepositoryFactory::new(256).unwrap();
//!
//! let mut a = factory.create_repository();
//! let mut b = factory.create_repository();
//!
//! // Each repository is independent.
//! assert_eq!(a.intern("x").unwrap().as_u32(), 1);
//! assert_eq!(b.intern("y").unwrap().as_u32(), 1);
//! assert_eq!(a.page_size(), 256);
//! ```
//!
//! [`Repository::optimize`]: crate::Repository::optimize

use crate::arena::DEFAULT_PAGE_SIZE;
use crate::error::{Error, Result};
use crate::repository::Repository;

/// Smallest usable page: room for the empty string and its terminator.
pub const MIN_PAGE_SIZE: usize = 1;

/// Largest page whose offsets still fit the 32-bit slot fields.
pub const MAX_PAGE_SIZE: usize = u32::MAX as usize;

/// Creates repositories sharing one page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryFactory {
    page_size: usize,
}

impl RepositoryFactory {
    /// Creates a factory for pages of `page_size` bytes.
    ///
    /// The page size bounds the longest string a repository accepts: strings
    /// of `page_size` bytes or more are rejected with
    /// [`Error::StringTooLarge`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPageSize`] if `page_size` is zero or larger
    /// than [`MAX_PAGE_SIZE`].
    pub const fn new(page_size: usize) -> Result<Self> {
        if page_size < MIN_PAGE_SIZE || page_size > MAX_PAGE_SIZE {
            return Err(Error::InvalidPageSize { page_size });
        }
        Ok(Self { page_size })
    }

    /// Page size of repositories created by this factory.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Creates an empty repository. No memory is allocated for pages until
    /// the first string is interned.
    #[must_use]
    pub fn create_repository(&self) -> Repository {
        Repository::from_factory(*self)
    }
}

impl Default for RepositoryFactory {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
