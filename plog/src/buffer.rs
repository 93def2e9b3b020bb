//! The buffer abstraction a [`Logger`](crate::logger::Logger) writes into.
//!
//! [`PriorityBuffer`] lets callers plug in their own write and drain
//! behaviour while keeping the logger front end unchanged.
//! [`PriorityRingStore`](crate::store::PriorityRingStore) is the
//! implementation shipped with this crate.

use std::sync::Arc;

use crate::error::Result;
use crate::priority::Priority;

/// A sink that accepts prioritised entries and hands them back in priority
/// order.
///
/// Implementations must be safe to share between threads; every method
/// takes `&self` and synchronises internally.
pub trait PriorityBuffer: Send + Sync {
    /// Removes and returns the next entry as text.
    ///
    /// # Errors
    ///
    /// Returns [`PopError::EmptyBuffer`](crate::error::PopError::EmptyBuffer)
    /// when there is nothing to read.
    fn pop(&self) -> Result<String>;

    /// Writes `entry` at `priority`, returning the number of bytes accepted.
    ///
    /// # Errors
    ///
    /// Implementations may fail; the ring store never does.
    fn pwrite(&self, priority: Priority, entry: &[u8]) -> Result<usize>;

    /// Writes an owned entry at `priority`.
    ///
    /// Implementations that store entries by value should override this to
    /// avoid a copy.
    ///
    /// # Errors
    ///
    /// Same as [`pwrite`](Self::pwrite).
    fn pwrite_owned(&self, priority: Priority, entry: Vec<u8>) -> Result<usize> {
        self.pwrite(priority, &entry)
    }

    /// Writes `entry` at the buffer's default priority.
    ///
    /// # Errors
    ///
    /// Same as [`pwrite`](Self::pwrite).
    fn write(&self, entry: &[u8]) -> Result<usize> {
        self.pwrite(self.priority(), entry)
    }

    /// Returns the default priority.
    fn priority(&self) -> Priority;

    /// Replaces the default priority.
    fn set_priority(&self, priority: Priority);
}

impl<T: PriorityBuffer + ?Sized> PriorityBuffer for Arc<T> {
    fn pop(&self) -> Result<String> {
        (**self).pop()
    }

    fn pwrite(&self, priority: Priority, entry: &[u8]) -> Result<usize> {
        (**self).pwrite(priority, entry)
    }

    fn pwrite_owned(&self, priority: Priority, entry: Vec<u8>) -> Result<usize> {
        (**self).pwrite_owned(priority, entry)
    }

    fn write(&self, entry: &[u8]) -> Result<usize> {
        (**self).write(entry)
    }

    fn priority(&self) -> Priority {
        (**self).priority()
    }

    fn set_priority(&self, priority: Priority) {
        (**self).set_priority(priority);
    }
}
