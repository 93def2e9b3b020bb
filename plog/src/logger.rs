//! Batching logger front end.
//!
//! A [`Logger`] writes into a [`PriorityBuffer`] in two ways:
//!
//! - Single-shot writes ([`print`](Logger::print) and friends) go straight
//!   to the buffer. They do not touch the session state and need no lock.
//! - A [`Session`] holds the logger's exclusive scope. Inside it, a caller
//!   builds one entry from any number of fragments and commits it with
//!   [`append_done`](Session::append_done). Other sessions block until the
//!   guard is dropped, so fragments from different callers never mix.
//!
//! # Example
//!
//! ```rust
//! use std::fmt::Write as _;
//! use plog::{Logger, Priority, PriorityRingStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let logger = Logger::new(PriorityRingStore::new(Priority::Minor, 16)?);
//!
//! {
//!     let mut session = logger.session();
//!     session.append("request ");
//!     write!(session, "{} failed", 42)?;
//!     session.append_done(Priority::Major)?;
//! }
//!
//! logger.println(Priority::Trivial, "tick")?;
//!
//! assert_eq!(logger.buffer().pop()?, "request 42 failed");
//! assert_eq!(logger.buffer().pop()?, "tick\n");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use crate::buffer::PriorityBuffer;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::priority::Priority;
use crate::store::PriorityRingStore;

/// Front end that writes prioritised entries into a buffer.
#[derive(Debug)]
pub struct Logger<B: PriorityBuffer = PriorityRingStore> {
    /// Destination for committed entries.
    buf: B,
    /// Bytes appended since the last commit.
    accumulator: Mutex<Vec<u8>>,
}

impl Logger<PriorityRingStore> {
    /// Creates a logger over a new [`PriorityRingStore`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](crate::error::ConfigError) if the
    /// configuration does not validate.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        Ok(Self::new(PriorityRingStore::with_config(config)?))
    }
}

impl<B: PriorityBuffer> Logger<B> {
    /// Creates a logger that writes into `buf`.
    pub fn new(buf: B) -> Self {
        Self {
            buf,
            accumulator: Mutex::new(Vec::new()),
        }
    }

    /// Returns the underlying buffer, e.g. to pop entries.
    pub fn buffer(&self) -> &B {
        &self.buf
    }

    /// Consumes the logger and returns the underlying buffer.
    ///
    /// Uncommitted fragments are discarded.
    pub fn into_buffer(self) -> B {
        self.buf
    }

    /// Acquires the exclusive scope, blocking until no other session is
    /// active.
    ///
    /// The scope is released when the returned guard is dropped.
    pub fn session(&self) -> Session<'_, B> {
        let acc = self.accumulator.lock().unwrap_or_else(|poisoned| {
            // A session panicked part way through an entry; its fragments
            // must not leak into the next commit.
            tracing::warn!("discarding fragments from a panicked logger session");
            let mut acc = poisoned.into_inner();
            acc.clear();
            self.accumulator.clear_poison();
            acc
        });

        Session { buf: &self.buf, acc }
    }

    /// Runs `f` inside a session.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session<'_, B>) -> R) -> R {
        f(&mut self.session())
    }

    /// Writes `s` as one entry at `priority`, bypassing the session.
    ///
    /// # Errors
    ///
    /// Propagates errors from the buffer.
    pub fn print(&self, priority: Priority, s: &str) -> Result<usize> {
        self.buf.pwrite(priority, s.as_bytes())
    }

    /// Writes `s` at the buffer's default priority.
    ///
    /// # Errors
    ///
    /// Propagates errors from the buffer.
    pub fn print_def(&self, s: &str) -> Result<usize> {
        self.print(self.buf.priority(), s)
    }

    /// Writes `s` followed by a newline at `priority`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the buffer.
    pub fn println(&self, priority: Priority, s: &str) -> Result<usize> {
        let mut line = String::with_capacity(s.len() + 1);
        line.push_str(s);
        line.push('\n');
        self.buf.pwrite_owned(priority, line.into_bytes())
    }

    /// Formats `args` and writes the result at `priority`.
    ///
    /// Use with [`format_args!`]:
    /// `logger.printf(Priority::Major, format_args!("{} retries", n))`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the buffer.
    pub fn printf(&self, priority: Priority, args: fmt::Arguments<'_>) -> Result<usize> {
        self.buf.pwrite_owned(priority, fmt::format(args).into_bytes())
    }
}

/// Exclusive scope over a logger's accumulator.
///
/// Obtained from [`Logger::session`]. Fragments appended through a session
/// stay pending until [`append_done`](Self::append_done) commits them;
/// fragments left uncommitted when the guard drops are kept for the next
/// session.
pub struct Session<'a, B: PriorityBuffer> {
    buf: &'a B,
    acc: MutexGuard<'a, Vec<u8>>,
}

impl<B: PriorityBuffer> Session<'_, B> {
    /// Appends a text fragment to the pending entry.
    pub fn append(&mut self, s: &str) {
        self.acc.extend_from_slice(s.as_bytes());
    }

    /// Appends raw bytes to the pending entry.
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.acc.extend_from_slice(bytes);
    }

    /// Returns the number of pending bytes.
    pub fn len(&self) -> usize {
        self.acc.len()
    }

    /// Returns `true` if nothing has been appended since the last commit.
    pub fn is_empty(&self) -> bool {
        self.acc.is_empty()
    }

    /// Commits the pending bytes as one entry at `priority` and resets the
    /// accumulator.
    ///
    /// Committing with nothing appended writes an empty entry.
    ///
    /// # Errors
    ///
    /// Propagates errors from the buffer. The accumulator is reset either
    /// way.
    pub fn append_done(&mut self, priority: Priority) -> Result<usize> {
        let entry = std::mem::take(&mut *self.acc);
        self.buf.pwrite_owned(priority, entry)
    }
}

impl<B: PriorityBuffer> fmt::Write for Session<'_, B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s);
        Ok(())
    }
}
