//! Store configuration.
//!
//! A [`StoreConfig`] fixes the two construction parameters of a
//! [`PriorityRingStore`](crate::store::PriorityRingStore): the default
//! priority used by unprioritised writes, and the number of slots every
//! per-priority ring holds. Both are set once; the ring capacity can never
//! change afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::priority::Priority;

/// Largest accepted ring capacity.
///
/// Rings are allocated eagerly on first write at their priority, so this
/// bounds the slot table that a single write can allocate.
pub const MAX_CAPACITY: usize = 1 << 20;

/// Construction parameters for a priority ring store.
///
/// # Example
///
/// ```rust
/// use plog::{Priority, StoreConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoreConfig::new(Priority::Minor, 256)?;
/// assert_eq!(config.capacity, 256);
///
/// // Zero-slot rings are rejected.
/// assert!(StoreConfig::new(Priority::Minor, 0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Priority used by writes that do not name one.
    #[serde(default)]
    pub default_priority: Priority,

    /// Number of entries retained per priority level.
    pub capacity: usize,
}

impl StoreConfig {
    /// Creates a validated store configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCapacity`] if `capacity` is zero, or
    /// [`ConfigError::CapacityTooLarge`] if it exceeds [`MAX_CAPACITY`].
    pub fn new(default_priority: Priority, capacity: usize) -> Result<Self> {
        let config = Self {
            default_priority,
            capacity,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Useful for configurations built with struct literals or deserialized
    /// from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidCapacity {
                capacity: self.capacity,
            }
            .into());
        }

        if self.capacity > MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                capacity: self.capacity,
                max: MAX_CAPACITY,
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlogError;

    #[test]
    fn test_valid_config() {
        let config = StoreConfig::new(Priority::Major, 3).unwrap();
        assert_eq!(config.default_priority, Priority::Major);
        assert_eq!(config.capacity, 3);

        assert!(StoreConfig::new(Priority::Trivial, 1).is_ok());
        assert!(StoreConfig::new(Priority::Trivial, MAX_CAPACITY).is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = StoreConfig::new(Priority::Minor, 0).unwrap_err();
        assert_eq!(
            err,
            PlogError::Config(ConfigError::InvalidCapacity { capacity: 0 })
        );
    }

    #[test]
    fn test_oversized_capacity_rejected() {
        let err = StoreConfig::new(Priority::Minor, MAX_CAPACITY + 1).unwrap_err();
        assert!(matches!(
            err,
            PlogError::Config(ConfigError::CapacityTooLarge { max, .. }) if max == MAX_CAPACITY
        ));
    }

    #[test]
    fn test_struct_literal_validation() {
        let config = StoreConfig {
            default_priority: Priority::Critical,
            capacity: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_from_json() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"default_priority":"major","capacity":16}"#).unwrap();
        assert_eq!(config, StoreConfig::new(Priority::Major, 16).unwrap());

        // default_priority falls back to Minor when omitted
        let config: StoreConfig = serde_json::from_str(r#"{"capacity":4}"#).unwrap();
        assert_eq!(config.default_priority, Priority::Minor);
        assert!(config.validate().is_ok());
    }
}
