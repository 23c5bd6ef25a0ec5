//! Page-based string interning.
//!
//! This crate stores distinct byte strings once and hands out compact `u32`
//! ids for them:
//!
//! - **Repository**: interning, id↔string lookup, cursors and checkpoints
//! - **Page arena**: fixed-size pages that keep string bytes contiguous
//! - **Snapshots**: cheap marks a repository can be rolled back to
//! - **Frequency / optimize**: rebuild a repository with the most used
//!   strings first
//!
//! # Examples
//!
//! ```
//! use intern_mem::Repository;
//!
//! let mut repository = Repository::new();
//!
//! assert_eq!(repository.intern("foo")?.as_u32(), 1);
//! assert_eq!(repository.intern("bar")?.as_u32(), 2);
//! assert_eq!(repository.intern("foo")?.as_u32(), 1);
//! assert_eq!(repository.intern("qux")?.as_u32(), 3);
//!
//! assert_eq!(repository.lookup("bar").map(|id| id.as_u32()), Some(2));
//! assert_eq!(repository.lookup_str(3u32), Some("qux"));
//! # Ok::<(), intern_mem::Error>(())
//! ```
//!
//! A repository is not synchronized. Wrap it in a lock to share it between
//! threads.

pub mod arena;
pub mod cursor;
pub mod error;
pub mod factory;
pub mod frequency;
pub mod id;
mod index;
mod optimize;
pub mod repository;
pub mod snapshot;

pub use arena::{DEFAULT_PAGE_SIZE, PageStats};
pub use cursor::{Cursor, Iter};
pub use error::{Error, Result};
pub use factory::RepositoryFactory;
pub use frequency::Frequency;
pub use id::StringId;
pub use repository::Repository;
pub use snapshot::Snapshot;
