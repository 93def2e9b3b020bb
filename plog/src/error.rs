//! Error types for the plog priority log buffer.

use thiserror::Error;

/// The main error type for all plog operations.
///
/// Writes never fail: overwriting the oldest entry of a full ring is the
/// retention policy, not an error. Errors come from construction (invalid
/// configuration) and from draining an empty buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlogError {
    /// Error on the read path.
    #[error("pop error: {0}")]
    Pop(#[from] PopError),

    /// Error validating store configuration or parsing a priority.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl PlogError {
    /// Returns `true` if this is the expected "nothing to read" condition.
    ///
    /// Drain loops use this to tell an empty buffer apart from a real fault.
    pub fn is_empty_buffer(&self) -> bool {
        matches!(self, Self::Pop(PopError::EmptyBuffer { .. }))
    }
}

/// Errors that can occur when popping an entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PopError {
    /// No unread entry exists at or below the tracked highest priority.
    ///
    /// This is recoverable and expected once a buffer has been drained.
    #[error("buffer is empty (highest tracked priority rank {rank})")]
    EmptyBuffer {
        /// The priority rank that was examined.
        rank: u8,
    },
}

/// Errors that can occur while building a store configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Ring capacity must be at least one slot.
    #[error("invalid ring capacity: {capacity} (must be > 0)")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },

    /// Ring capacity exceeds the supported maximum.
    #[error("ring capacity {capacity} exceeds maximum of {max}")]
    CapacityTooLarge {
        /// The rejected capacity.
        capacity: usize,
        /// The largest accepted capacity.
        max: usize,
    },

    /// A priority name did not match any known level.
    #[error("unknown priority '{name}' (expected trivial, minor, major or critical)")]
    UnknownPriority {
        /// The unrecognised name.
        name: String,
    },

    /// A priority rank is outside the known levels.
    #[error("invalid priority rank {rank}")]
    InvalidRank {
        /// The rejected rank.
        rank: u8,
    },
}

/// Type alias for `Result<T, PlogError>`.
pub type Result<T> = std::result::Result<T, PlogError>;
