//! Fixed-capacity ring of log entries for a single priority level.
//!
//! # Design
//!
//! A ring is a slot table plus one cursor:
//! - Writes fill the slot under the cursor and advance it, wrapping at
//!   capacity. A full ring silently overwrites its oldest entry.
//! - Pops step the cursor back one slot and take that entry, so entries
//!   leave newest first (LIFO within a priority).
//! - An empty slot is `None`. Popping clears the slot, which is how the
//!   ring knows when it has nothing left to give.
//!
//! Because pops move the same cursor back, a write after a pop reuses the
//! slot that was just drained instead of clobbering an older unread entry.

/// A fixed-capacity circular buffer of entries.
///
/// The ring itself is not synchronised; the store serialises all access.
#[derive(Debug, Clone)]
pub struct Ring {
    /// Entry slots. `None` means the slot holds nothing unread.
    slots: Box<[Option<Vec<u8>>]>,
    /// Index of the next slot to be written.
    cursor: usize,
}

impl Ring {
    /// Creates a ring with `capacity` empty slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Stores validate capacity before any
    /// ring is built.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be non-zero");
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            cursor: 0,
        }
    }

    /// Returns the number of slots in the ring.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the slot immediately behind the cursor.
    #[inline]
    fn prev_index(&self) -> usize {
        (self.cursor + self.slots.len() - 1) % self.slots.len()
    }

    /// Writes an entry into the next slot and advances the cursor.
    ///
    /// Returns the unread entry that was overwritten, if the ring was full.
    pub fn push(&mut self, entry: Vec<u8>) -> Option<Vec<u8>> {
        let evicted = self.slots[self.cursor].replace(entry);
        self.cursor = (self.cursor + 1) % self.slots.len();
        evicted
    }

    /// Removes and returns the most recently written unread entry.
    ///
    /// Returns `None` without moving the cursor when the ring is drained.
    pub fn pop(&mut self) -> Option<Vec<u8>> {
        let prev = self.prev_index();
        let entry = self.slots[prev].take()?;
        self.cursor = prev;
        Some(entry)
    }

    /// Returns `true` if the next [`pop`](Self::pop) would yield an entry.
    #[inline]
    pub fn has_unread(&self) -> bool {
        self.slots[self.prev_index()].is_some()
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns `true` if no slot holds an entry.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
