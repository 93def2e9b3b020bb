//! Priority levels for log entries.
//!
//! A [`Priority`] decides the order in which entries leave the buffer:
//! every entry at a higher priority is popped before any entry at a lower
//! one. Each level is backed by a small integer rank that doubles as the
//! index of its ring inside the store.
//!
//! New levels may only be added above [`Priority::Critical`], so the ranks
//! of existing levels never change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Ordering of log entries when draining the buffer.
///
/// Higher rank means higher priority means drained first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Priority {
    /// Noise that is only interesting when nothing else is.
    Trivial = 0,
    /// Routine events. The default level.
    #[default]
    Minor = 1,
    /// Events an operator should see.
    Major = 2,
    /// Failures; always drained first.
    Critical = 3,
}

impl Priority {
    /// Number of priority levels.
    pub const COUNT: usize = 4;

    /// All levels, lowest to highest.
    pub const ALL: [Priority; Self::COUNT] = [
        Priority::Trivial,
        Priority::Minor,
        Priority::Major,
        Priority::Critical,
    ];

    /// Returns the integer rank of this level.
    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Returns the rank as a ring index.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Returns the level for `rank`, or `None` if no such level exists.
    pub const fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            0 => Some(Self::Trivial),
            1 => Some(Self::Minor),
            2 => Some(Self::Major),
            3 => Some(Self::Critical),
            _ => None,
        }
    }

    /// Returns the lowercase name of this level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trivial => "trivial",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownPriority {
                name: name.to_string(),
            })
    }
}

impl TryFrom<u8> for Priority {
    type Error = ConfigError;

    fn try_from(rank: u8) -> Result<Self, Self::Error> {
        Self::from_rank(rank).ok_or(ConfigError::InvalidRank { rank })
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p.rank()
    }
}
