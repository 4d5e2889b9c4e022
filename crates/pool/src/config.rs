//! Pool configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PoolError, PoolResult};

/// Configuration for an [`crate::pool::ObjectPool`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolConfig {
    /// Declared number of resources the pool fills to on `allocate`.
    /// Growth (when enabled) raises the live capacity past this value.
    pub capacity: usize,
    /// Whether an exhausted pool grows by one resource per empty `get`.
    pub grow: bool,
    /// Diagnostics label carried into every log line and error this pool
    /// emits. Not part of the correctness contract.
    pub label: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 16,
            grow: false,
            label: "pool".to_string(),
        }
    }
}

impl PoolConfig {
    /// Create a fixed-size pool configuration: `get` on an empty pool
    /// signals exhaustion instead of growing.
    pub fn fixed(capacity: usize) -> Self {
        Self {
            capacity,
            grow: false,
            ..Default::default()
        }
    }

    /// Create a growing pool configuration: `get` on an empty pool raises
    /// the capacity by one and produces a fresh resource on demand.
    pub fn growing(capacity: usize) -> Self {
        Self {
            capacity,
            grow: true,
            ..Default::default()
        }
    }

    /// Set the diagnostics label.
    #[must_use]
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    /// Validate the configuration, returning an error if invalid.
    pub fn validate(&self) -> PoolResult<()> {
        if self.label.is_empty() {
            return Err(PoolError::configuration("label must not be empty"));
        }
        Ok(())
    }
}
