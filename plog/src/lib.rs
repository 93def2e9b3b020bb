//! # plog
//!
//! Priority-aware, memory-bounded in-process log buffer.
//!
//! plog keeps the most recent entries of each priority level in a
//! fixed-size ring and hands them back highest priority first, newest
//! first. Memory use is bounded by configuration, not by log volume: when
//! a level's ring is full, its oldest entry is overwritten.
//!
//! **Status**: This crate is in early development. The API is not yet stable.
//!
//! ## Key Properties
//!
//! - Bounded retention: `capacity` entries per priority level, no growth
//! - Priority-ordered draining: higher priority always pops first
//! - LIFO within a priority: the newest unread entry pops first
//! - Atomic multi-fragment entries through an exclusive logger session
//! - Thread-safe: every operation takes `&self`
//!
//! ## Quick Start
//!
//! ```rust
//! use plog::{Logger, Priority, PriorityRingStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Keep the 3 newest entries per priority, default to Minor.
//! let logger = Logger::new(PriorityRingStore::new(Priority::Minor, 3)?);
//!
//! logger.print_def("cache warmed")?;
//! logger.println(Priority::Critical, "replica lost")?;
//!
//! logger.with_session(|s| {
//!     s.append("retrying ");
//!     s.append("upload");
//!     s.append_done(Priority::Major)
//! })?;
//!
//! let store = logger.buffer();
//! assert_eq!(store.pop()?, "replica lost\n");
//! assert_eq!(store.pop()?, "retrying upload");
//! assert_eq!(store.pop()?, "cache warmed");
//! assert!(store.pop().unwrap_err().is_empty_buffer());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`PriorityRingStore`] — One ring per priority; bounded writes, ordered pops
//! - [`Logger`] — Front end with single-shot prints and batching sessions
//! - [`Session`] — Exclusive scope for building one entry from fragments
//! - [`PriorityBuffer`] — Trait the logger writes through
//!
//! ## Modules
//!
//! - [`store`] — Priority ring store and popped [`Entry`] values
//! - [`ring`] — Fixed-capacity ring for a single priority
//! - [`logger`] — Logger front end and sessions
//! - [`buffer`] — Buffer trait
//! - [`priority`] — Priority levels
//! - [`config`] — Store configuration
//! - [`error`] — Error types

pub mod buffer;
pub mod config;
pub mod error;
pub mod logger;
pub mod priority;
pub mod ring;
pub mod store;

// Re-export primary API types at crate root for convenience.
pub use buffer::PriorityBuffer;
pub use config::{MAX_CAPACITY, StoreConfig};
pub use error::{ConfigError, PlogError, PopError, Result};
pub use logger::{Logger, Session};
pub use priority::Priority;
pub use store::{Entry, PriorityRingStore};
