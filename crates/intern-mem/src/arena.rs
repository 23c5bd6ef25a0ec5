//! Page arena holding the bytes of every interned string.
//!
//! The arena is a list of fixed-capacity pages. Strings are appended to the
//! current page, each followed by a single NUL byte, and are addressed by a
//! [`Slot`] of (page, offset, length). Pages never move or grow, so a slot
//! stays valid for as long as the string it names is live.
//!
//! Appends always go forward: to the current page while it has room, then to
//! the next page. [`PageArena::rewind`] moves the append position back to the
//! end of a given slot and empties every later page; those pages are kept and
//! filled again by later appends, so the allocated size never shrinks.
//!
//! The arena is single-threaded. It is `Send` but not `Sync`.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use intern_log::trace;

use crate::error::{Error, Result};

/// Page size used when none is configured (4 KiB).
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Bytes written after each string.
pub const FRAMING: usize = 1;

/// Location of a string inside a [`PageArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Index of the page holding the string.
    pub page: u32,
    /// Byte offset of the first byte within the page.
    pub offset: u32,
    /// Length of the string in bytes, excluding framing.
    pub len: u32,
}

impl Slot {
    /// Offset just past this string's framing.
    const fn end(self) -> usize {
        self.offset as usize + self.len as usize + FRAMING
    }
}

/// Arena usage statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageStats {
    /// Number of pages ever allocated.
    pub page_count: usize,
    /// Bytes currently occupied by live strings and their framing.
    pub used_bytes: usize,
    /// Total capacity of all pages in bytes.
    pub allocated_bytes: u64,
}

/// A fixed-capacity byte buffer filled front to back.
///
/// # Safety
///
/// - `start` points to `capacity` bytes obtained from the global allocator
/// - bytes below `len` are initialized; nothing at or above `len` is ever read
/// - the buffer is released exactly once, in `Drop`
struct Page {
    start: NonNull<u8>,
    capacity: usize,
    len: usize,
}

// SAFETY: a page exclusively owns its buffer, and nothing in it refers to
// thread-local state.
unsafe impl Send for Page {}

impl Page {
    fn new(capacity: usize) -> Result<Self> {
        let layout = Layout::from_size_align(capacity, 1)
            .map_err(|_| Error::AllocationFailure { size: capacity })?;
        if layout.size() == 0 {
            return Err(Error::InvalidPageSize {
                page_size: capacity,
            });
        }

        // SAFETY: the layout has a non-zero size (checked above).
        let start = unsafe { alloc::alloc(layout) };
        let start =
            NonNull::new(start).ok_or(Error::AllocationFailure { size: capacity })?;

        Ok(Page {
            start,
            capacity,
            len: 0,
        })
    }

    const fn remaining(&self) -> usize {
        self.capacity - self.len
    }

    /// Appends `bytes` plus framing, returning the offset of the first byte.
    fn push(&mut self, bytes: &[u8]) -> Option<usize> {
        let needed = bytes.len() + FRAMING;
        if needed > self.remaining() {
            return None;
        }

        let offset = self.len;
        // SAFETY: offset + needed <= capacity (checked above), so the whole
        // write stays inside this page's buffer. The source is a live slice
        // that cannot overlap memory owned by the page.
        unsafe {
            let dst = self.start.as_ptr().add(offset);
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), dst, bytes.len());
            dst.add(bytes.len()).write(0);
        }
        self.len += needed;

        Some(offset)
    }

    fn get(&self, offset: usize, len: usize) -> &[u8] {
        assert!(offset + len < self.len, "slot outside the filled region");
        // SAFETY: the range lies below `len` (asserted above), so it is inside
        // the buffer and was initialized by `push`.
        unsafe { std::slice::from_raw_parts(self.start.as_ptr().add(offset), len) }
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        // SAFETY: same size and alignment as the allocation in `Page::new`.
        unsafe {
            let layout = Layout::from_size_align_unchecked(self.capacity, 1);
            alloc::dealloc(self.start.as_ptr(), layout);
        }
    }
}

/// Append-only store of string bytes split over fixed-size pages.
///
/// # Examples
///
/// ```
/// use intern_mem::arena::PageArena;
///
/// let mut arena = PageArena::new(64);
/// assert_eq!(arena.allocated_bytes(), 0);
///
/// let slot = arena.push(b"hello").unwrap();
/// assert_eq!(arena.get(slot), b"hello");
/// assert_eq!(arena.allocated_bytes(), 64);
/// ```
pub struct PageArena {
    pages: Vec<Page>,
    /// Page receiving appends. Equal to 0 while `pages` is empty.
    current: usize,
    page_size: usize,
}

impl PageArena {
    /// Creates an empty arena. No page is allocated until the first push.
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        PageArena {
            pages: Vec::new(),
            current: 0,
            page_size,
        }
    }

    /// Capacity of every page in bytes.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Largest string length a page can hold.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.page_size.saturating_sub(FRAMING)
    }

    /// Copies `bytes` into the arena and returns where they landed.
    ///
    /// # Errors
    ///
    /// - [`Error::StringTooLarge`] if `bytes.len() >= page_size`
    /// - [`Error::AllocationFailure`] if a new page is needed and cannot be
    ///   allocated
    pub fn push(&mut self, bytes: &[u8]) -> Result<Slot> {
        if bytes.len() > self.max_len() {
            return Err(Error::StringTooLarge {
                len: bytes.len(),
                page_size: self.page_size,
            });
        }

        loop {
            if let Some(page) = self.pages.get_mut(self.current) {
                if let Some(offset) = page.push(bytes) {
                    // Lossless: offset and length are below page_size, which
                    // is capped at u32::MAX.
                    return Ok(Slot {
                        page: self.current as u32,
                        offset: offset as u32,
                        len: bytes.len() as u32,
                    });
                }

                if self.current + 1 < self.pages.len() {
                    self.current += 1;
                    trace!("reusing page {} of {}", self.current, self.pages.len());
                    continue;
                }
            }

            self.grow()?;
        }
    }

    #[cold]
    fn grow(&mut self) -> Result<()> {
        let page = Page::new(self.page_size)?;
        self.pages.push(page);
        self.current = self.pages.len() - 1;
        trace!(
            "allocated page {} ({} bytes, {} bytes total)",
            self.current,
            self.page_size,
            self.allocated_bytes()
        );
        Ok(())
    }

    /// Returns the bytes stored at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` was not returned by [`push`](Self::push) on this
    /// arena, or was discarded by a later [`rewind`](Self::rewind).
    #[must_use]
    pub fn get(&self, slot: Slot) -> &[u8] {
        self.pages[slot.page as usize].get(slot.offset as usize, slot.len as usize)
    }

    /// Discards everything stored after `tail`, or everything when `tail` is
    /// `None`.
    ///
    /// Emptied pages stay allocated and are filled again by later pushes.
    pub fn rewind(&mut self, tail: Option<Slot>) {
        let (keep_page, keep_len) = match tail {
            Some(slot) => (slot.page as usize, slot.end()),
            None => (0, 0),
        };

        for (index, page) in self.pages.iter_mut().enumerate().skip(keep_page) {
            page.len = if index == keep_page { keep_len } else { 0 };
        }
        self.current = keep_page;
    }

    /// Number of pages ever allocated.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total capacity of all pages ever allocated.
    #[must_use]
    pub fn allocated_bytes(&self) -> u64 {
        self.pages.iter().map(|page| page.capacity as u64).sum()
    }

    /// Bytes currently holding live strings and their framing.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.pages.iter().map(|page| page.len).sum()
    }

    /// Returns usage statistics for this arena.
    #[must_use]
    pub fn stats(&self) -> PageStats {
        PageStats {
            page_count: self.page_count(),
            used_bytes: self.used_bytes(),
            allocated_bytes: self.allocated_bytes(),
        }
    }
}

impl std::fmt::Debug for PageArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageArena")
            .field("page_size", &self.page_size)
            .field("pages", &self.pages.len())
            .field("current", &self.current)
            .finish()
    }
}
