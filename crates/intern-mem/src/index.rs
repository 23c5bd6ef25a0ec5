//! Two-way index between string contents and ids.
//!
//! The forward table is a dense vector: entry `i` describes id `i + 1`. The
//! reverse table is a `hashbrown::HashTable` of raw ids; it holds no string
//! bytes of its own and compares candidates against the bytes in the
//! [`PageArena`]. Each entry caches its hash so the table can rehash and
//! remove entries without touching the arena.

use hashbrown::HashTable;

use crate::arena::{PageArena, Slot};
use crate::id::StringId;

/// Hashes string contents for the reverse table.
#[inline]
pub(crate) fn hash_bytes(bytes: &[u8]) -> u64 {
    fxhash::hash64(bytes)
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    slot: Slot,
    hash: u64,
}

/// Forward and reverse tables for one repository.
#[derive(Default)]
pub(crate) struct Index {
    entries: Vec<Entry>,
    table: HashTable<u32>,
}

impl Index {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of live ids, which is also the highest live id.
    pub(crate) fn len(&self) -> u32 {
        // Lossless: `insert` never lets the table grow past u32::MAX.
        self.entries.len() as u32
    }

    /// Looks up `bytes`, whose hash the caller already computed.
    pub(crate) fn find(&self, arena: &PageArena, hash: u64, bytes: &[u8]) -> Option<StringId> {
        let entries = &self.entries;
        self.table
            .find(hash, |&id| {
                let entry = &entries[id as usize - 1];
                entry.hash == hash && arena.get(entry.slot) == bytes
            })
            .and_then(|&id| StringId::new(id))
    }

    /// Location of the string with `id`, if it is live.
    pub(crate) fn slot(&self, id: StringId) -> Option<Slot> {
        self.entries.get(id.index()).map(|entry| entry.slot)
    }

    /// Records a new string under the next id.
    ///
    /// The caller must have checked that the bytes are not present yet and
    /// that the id space is not exhausted.
    pub(crate) fn insert(&mut self, hash: u64, slot: Slot) -> StringId {
        self.entries.push(Entry { slot, hash });
        let id = self.len();

        let entries = &self.entries;
        self.table
            .insert_unique(hash, id, |&id| entries[id as usize - 1].hash);

        // `id` is the new length, so it is at least 1.
        StringId::new(id).unwrap_or(StringId::FIRST)
    }

    /// Drops every id above `len` from both tables.
    pub(crate) fn truncate(&mut self, len: u32) {
        let keep = len as usize;
        if keep >= self.entries.len() {
            return;
        }

        for (offset, entry) in self.entries.drain(keep..).enumerate() {
            let id = (keep + offset + 1) as u32;
            if let Ok(found) = self.table.find_entry(entry.hash, |&candidate| candidate == id) {
                found.remove();
            }
        }
    }

    /// Reserves room for at least `additional` more strings.
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
        let entries = &self.entries;
        self.table
            .reserve(additional, |&id| entries[id as usize - 1].hash);
    }
}
