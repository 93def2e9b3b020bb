//! Priority ring store: one bounded ring per priority level.
//!
//! # Design
//!
//! The store coordinates the per-priority [`Ring`]s:
//! - Rings live in a fixed array indexed by priority rank and are allocated
//!   the first time their priority is written.
//! - Every ring has the same capacity, fixed at construction.
//! - `high` tracks the highest priority known to hold an unread entry.
//!   Writes only ever raise it. Pops lower it lazily by scanning down from
//!   its current value to the first ring with something left to read.
//! - Writes and pops share one mutex; both move ring cursors.
//!
//! # Ordering
//!
//! [`pop`](PriorityRingStore::pop) always returns the newest unread entry at
//! the highest priority that has one. Priority dominates recency; within a
//! priority the order is strictly last-in, first-out.
//!
//! # Example
//!
//! ```rust
//! use plog::{Priority, PriorityRingStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PriorityRingStore::new(Priority::Minor, 3)?;
//!
//! store.write(b"routine")?;
//! store.pwrite(Priority::Critical, b"disk full")?;
//!
//! assert_eq!(store.pop()?, "disk full");
//! assert_eq!(store.pop()?, "routine");
//! assert!(store.pop().unwrap_err().is_empty_buffer());
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::buffer::PriorityBuffer;
use crate::config::StoreConfig;
use crate::error::{PopError, Result};
use crate::priority::Priority;
use crate::ring::Ring;

/// An entry removed from the store, tagged with the priority it was
/// written at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Priority the entry was written at.
    pub priority: Priority,
    /// The raw entry bytes.
    pub payload: Vec<u8>,
}

impl Entry {
    /// Returns the payload as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    /// Consumes the entry and returns its payload as text.
    pub fn into_string(self) -> String {
        match String::from_utf8(self.payload) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}

/// Mutable state guarded by the store lock.
#[derive(Debug)]
struct RingState {
    /// One lazily allocated ring per priority rank.
    rings: [Option<Ring>; Priority::COUNT],
    /// Highest priority known to hold an unread entry.
    high: Priority,
}

impl RingState {
    fn new() -> Self {
        Self {
            rings: Default::default(),
            high: Priority::Trivial,
        }
    }

    fn has_unread(&self, priority: Priority) -> bool {
        self.rings[priority.index()]
            .as_ref()
            .is_some_and(Ring::has_unread)
    }

    /// Lowers `high` to the first priority at or below it with an unread
    /// entry. Falls back to the lowest priority when nothing is left.
    fn rescan_high(&mut self) {
        self.high = Priority::ALL[..=self.high.index()]
            .iter()
            .rev()
            .copied()
            .find(|&p| self.has_unread(p))
            .unwrap_or(Priority::Trivial);
    }
}

/// Bounded, priority-ordered log buffer.
///
/// # Thread Safety
///
/// All methods take `&self`. Writes and pops are serialised by a single
/// internal mutex, so a pop never observes a partially written entry. Share
/// the store between threads with `Arc` or scoped borrows.
#[derive(Debug)]
pub struct PriorityRingStore {
    /// Slots per ring.
    capacity: usize,
    /// Rank of the default write priority.
    default_priority: AtomicU8,
    /// Rings and the highest-priority marker.
    state: Mutex<RingState>,
}

impl PriorityRingStore {
    /// Creates an empty store.
    ///
    /// # Arguments
    ///
    /// * `priority` - Default priority for [`write`](Self::write)
    /// * `capacity` - Entries retained per priority level
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](crate::error::ConfigError) if `capacity` is
    /// zero or larger than [`MAX_CAPACITY`](crate::config::MAX_CAPACITY).
    pub fn new(priority: Priority, capacity: usize) -> Result<Self> {
        Self::with_config(StoreConfig::new(priority, capacity)?)
    }

    /// Creates an empty store from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](crate::error::ConfigError) if the
    /// configuration does not validate.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            capacity: config.capacity,
            default_priority: AtomicU8::new(config.default_priority.rank()),
            state: Mutex::new(RingState::new()),
        })
    }

    /// Returns the per-priority ring capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the default priority.
    pub fn priority(&self) -> Priority {
        Priority::from_rank(self.default_priority.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Replaces the default priority. Existing entries are unaffected.
    pub fn set_priority(&self, priority: Priority) {
        self.default_priority.store(priority.rank(), Ordering::Relaxed);
    }

    /// Returns the highest priority currently tracked as holding entries.
    ///
    /// This is [`Priority::Trivial`] for a new or fully drained store.
    pub fn highest_priority(&self) -> Priority {
        self.lock().high
    }

    /// Returns the number of unread entries across all priorities.
    pub fn len(&self) -> usize {
        self.lock().rings.iter().flatten().map(Ring::len).sum()
    }

    /// Returns `true` if no priority holds an unread entry.
    pub fn is_empty(&self) -> bool {
        self.lock().rings.iter().flatten().all(Ring::is_empty)
    }

    /// Writes `entry` at the default priority.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` keeps the signature aligned with
    /// [`PriorityBuffer`].
    pub fn write(&self, entry: &[u8]) -> Result<usize> {
        self.pwrite(self.priority(), entry)
    }

    /// Writes `entry` at `priority`.
    ///
    /// When the ring for `priority` is full, its oldest entry is overwritten
    /// and lost. Returns the number of bytes accepted, always
    /// `entry.len()`.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` keeps the signature aligned with
    /// [`PriorityBuffer`].
    pub fn pwrite(&self, priority: Priority, entry: &[u8]) -> Result<usize> {
        Ok(self.push(priority, entry.to_vec()))
    }

    /// Inserts an owned entry under the store lock.
    fn push(&self, priority: Priority, entry: Vec<u8>) -> usize {
        let len = entry.len();
        let capacity = self.capacity;

        let mut state = self.lock();
        if priority > state.high {
            state.high = priority;
        }

        let ring = state.rings[priority.index()].get_or_insert_with(|| {
            tracing::debug!(%priority, capacity, "allocating ring");
            Ring::new(capacity)
        });

        if let Some(evicted) = ring.push(entry) {
            tracing::trace!(%priority, evicted_len = evicted.len(), "overwrote oldest entry");
        }

        len
    }

    /// Removes and returns the next entry with its priority.
    ///
    /// # Errors
    ///
    /// Returns [`PopError::EmptyBuffer`] when no unread entry exists at or
    /// below the tracked highest priority.
    pub fn pop_entry(&self) -> Result<Entry> {
        let mut state = self.lock();
        let priority = state.high;

        let Some(payload) = state.rings[priority.index()]
            .as_mut()
            .and_then(Ring::pop)
        else {
            tracing::trace!(%priority, "pop on empty buffer");
            return Err(PopError::EmptyBuffer {
                rank: priority.rank(),
            }
            .into());
        };

        state.rescan_high();
        Ok(Entry { priority, payload })
    }

    /// Removes and returns the next entry as text.
    ///
    /// Invalid UTF-8 is replaced with `U+FFFD`; use
    /// [`pop_bytes`](Self::pop_bytes) for the raw payload.
    ///
    /// # Errors
    ///
    /// Returns [`PopError::EmptyBuffer`] when there is nothing to read. The
    /// error repeats on every call until something is written.
    pub fn pop(&self) -> Result<String> {
        self.pop_entry().map(Entry::into_string)
    }

    /// Removes and returns the next entry's raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PopError::EmptyBuffer`] when there is nothing to read.
    pub fn pop_bytes(&self) -> Result<Vec<u8>> {
        self.pop_entry().map(|entry| entry.payload)
    }

    /// Pops until the store reports empty, returning entries in pop order.
    ///
    /// Writes racing with the drain may or may not be included.
    pub fn drain(&self) -> Vec<Entry> {
        std::iter::from_fn(|| self.pop_entry().ok()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, RingState> {
        // No critical section can leave the rings half-updated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PriorityBuffer for PriorityRingStore {
    fn pop(&self) -> Result<String> {
        PriorityRingStore::pop(self)
    }

    fn pwrite(&self, priority: Priority, entry: &[u8]) -> Result<usize> {
        PriorityRingStore::pwrite(self, priority, entry)
    }

    fn pwrite_owned(&self, priority: Priority, entry: Vec<u8>) -> Result<usize> {
        Ok(self.push(priority, entry))
    }

    fn priority(&self) -> Priority {
        PriorityRingStore::priority(self)
    }

    fn set_priority(&self, priority: Priority) {
        PriorityRingStore::set_priority(self, priority);
    }
}

/// Each `write` call stores one entry at the default priority.
///
/// Formatting macros such as `write!` may split one message over several
/// calls; format into a string first when an entry must stay whole.
impl io::Write for &PriorityRingStore {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.push(self.priority(), buf.to_vec()))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;
    use crate::error::{ConfigError, PlogError};

    fn pop_expect(store: &PriorityRingStore, expected: &str) {
        assert_eq!(store.pop().unwrap(), expected);
    }

    #[test]
    fn test_get_priority() {
        let store = PriorityRingStore::new(Priority::Minor, 3).unwrap();
        assert_eq!(store.priority(), Priority::Minor);
        assert_eq!(store.capacity(), 3);
    }

    #[test]
    fn test_set_priority() {
        let store = PriorityRingStore::new(Priority::Minor, 3).unwrap();
        store.set_priority(Priority::Major);
        assert_eq!(store.priority(), Priority::Major);
    }

    #[test]
    fn test_invalid_capacity() {
        let err = PriorityRingStore::new(Priority::Minor, 0).unwrap_err();
        assert_eq!(
            err,
            PlogError::Config(ConfigError::InvalidCapacity { capacity: 0 })
        );
    }

    #[test]
    fn test_write_uses_default_priority() {
        let store = PriorityRingStore::new(Priority::Minor, 3).unwrap();
        assert_eq!(store.write(b"nemo").unwrap(), 4);

        let entry = store.pop_entry().unwrap();
        assert_eq!(entry.priority, Priority::Minor);
        assert_eq!(entry.text(), "nemo");
    }

    #[test]
    fn test_pwrite() {
        let store = PriorityRingStore::new(Priority::Minor, 3).unwrap();
        store.pwrite(Priority::Major, b"nemo").unwrap();

        assert_eq!(store.highest_priority(), Priority::Major);
        pop_expect(&store, "nemo");
    }

    #[test]
    fn test_set_priority_does_not_move_existing_entries() {
        let store = PriorityRingStore::new(Priority::Minor, 3).unwrap();
        store.write(b"before").unwrap();
        store.set_priority(Priority::Critical);
        store.write(b"after").unwrap();

        let entries = store.drain();
        assert_eq!(entries[0].priority, Priority::Critical);
        assert_eq!(entries[0].text(), "after");
        assert_eq!(entries[1].priority, Priority::Minor);
        assert_eq!(entries[1].text(), "before");
    }

    #[test]
    fn test_pop_empty_store() {
        let store = PriorityRingStore::new(Priority::Major, 3).unwrap();

        let err = store.pop().unwrap_err();
        assert_eq!(err, PlogError::Pop(PopError::EmptyBuffer { rank: 0 }));
    }

    #[test]
    fn test_emptiness_is_sticky() {
        let store = PriorityRingStore::new(Priority::Minor, 2).unwrap();
        store.write(b"only").unwrap();
        pop_expect(&store, "only");

        for _ in 0..4 {
            assert!(store.pop().unwrap_err().is_empty_buffer());
        }
        assert!(store.is_empty());

        store.write(b"again").unwrap();
        pop_expect(&store, "again");
    }

    #[test]
    fn test_high_priority_rescans_down() {
        let store = PriorityRingStore::new(Priority::Trivial, 4).unwrap();
        store.pwrite(Priority::Trivial, b"t").unwrap();
        store.pwrite(Priority::Critical, b"c").unwrap();

        assert_eq!(store.highest_priority(), Priority::Critical);
        pop_expect(&store, "c");
        // Skips the never-written Major and Minor rings.
        assert_eq!(store.highest_priority(), Priority::Trivial);
        pop_expect(&store, "t");
        assert_eq!(store.highest_priority(), Priority::Trivial);
    }

    #[test]
    fn test_len_counts_unread_entries() {
        let store = PriorityRingStore::new(Priority::Minor, 2).unwrap();
        assert_eq!(store.len(), 0);

        store.write(b"a").unwrap();
        store.write(b"b").unwrap();
        store.write(b"c").unwrap();
        store.pwrite(Priority::Major, b"m").unwrap();
        assert_eq!(store.len(), 3);

        store.pop().unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_pop_bytes_preserves_invalid_utf8() {
        let store = PriorityRingStore::new(Priority::Minor, 2).unwrap();
        store.write(&[0xff, b'a']).unwrap();
        store.write(&[0xfe]).unwrap();

        assert_eq!(store.pop_bytes().unwrap(), vec![0xfe]);
        assert_eq!(store.pop().unwrap(), "\u{fffd}a");
    }

    #[test]
    fn test_io_write_sink() {
        let store = PriorityRingStore::new(Priority::Major, 4).unwrap();
        let mut sink = &store;
        sink.write_all(b"from io").unwrap();
        sink.flush().unwrap();

        let entry = store.pop_entry().unwrap();
        assert_eq!(entry.priority, Priority::Major);
        assert_eq!(entry.payload, b"from io");
    }

    #[test]
    fn test_trait_object() {
        let store = PriorityRingStore::new(Priority::Minor, 2).unwrap();
        let buffer: &dyn PriorityBuffer = &store;

        buffer.set_priority(Priority::Critical);
        buffer.write(b"via trait").unwrap();
        buffer.pwrite_owned(Priority::Trivial, b"owned".to_vec()).unwrap();

        assert_eq!(buffer.priority(), Priority::Critical);
        assert_eq!(buffer.pop().unwrap(), "via trait");
        assert_eq!(buffer.pop().unwrap(), "owned");
        assert!(buffer.pop().is_err());
    }
}
