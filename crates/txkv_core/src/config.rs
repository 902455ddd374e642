//! Database configuration.

use crate::error::{CoreError, CoreResult};

/// Configuration for creating a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Slot count allocated by the first commit.
    pub initial_table_capacity: usize,

    /// Write capacity of a freshly begun transaction buffer.
    pub initial_buffer_capacity: usize,

    /// Highest committed occupancy allowed after a commit, in percent of the
    /// table capacity.
    pub max_load_percent: u8,

    /// Upper bound on the committed table's slot count.
    pub max_table_capacity: usize,

    /// Upper bound on the writes a single transaction may buffer.
    pub max_pending_writes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_table_capacity: 16,
            initial_buffer_capacity: 8,
            max_load_percent: 75,
            max_table_capacity: usize::MAX,
            max_pending_writes: usize::MAX,
        }
    }
}

impl Config {
    /// Highest load percentage accepted by [`Config::validate`].
    ///
    /// Linear probing needs at least one empty slot after every commit.
    pub const MAX_LOAD_PERCENT_LIMIT: u8 = 90;

    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity allocated by the first commit.
    #[must_use]
    pub const fn initial_table_capacity(mut self, capacity: usize) -> Self {
        self.initial_table_capacity = capacity;
        self
    }

    /// Sets the initial capacity of transaction buffers.
    #[must_use]
    pub const fn initial_buffer_capacity(mut self, capacity: usize) -> Self {
        self.initial_buffer_capacity = capacity;
        self
    }

    /// Sets the maximum load percentage.
    #[must_use]
    pub const fn max_load_percent(mut self, percent: u8) -> Self {
        self.max_load_percent = percent;
        self
    }

    /// Sets the maximum table capacity.
    #[must_use]
    pub const fn max_table_capacity(mut self, capacity: usize) -> Self {
        self.max_table_capacity = capacity;
        self
    }

    /// Sets the maximum number of writes per transaction.
    #[must_use]
    pub const fn max_pending_writes(mut self, count: usize) -> Self {
        self.max_pending_writes = count;
        self
    }

    /// Checks that the configuration can drive a database.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if a capacity is zero, the load
    /// percentage is outside `1..=90`, or the initial table capacity exceeds
    /// the maximum.
    pub fn validate(&self) -> CoreResult<()> {
        if self.initial_table_capacity == 0 {
            return Err(CoreError::invalid_config(
                "initial table capacity must be non-zero",
            ));
        }
        if self.initial_buffer_capacity == 0 {
            return Err(CoreError::invalid_config(
                "initial buffer capacity must be non-zero",
            ));
        }
        if self.max_load_percent == 0 || self.max_load_percent > Self::MAX_LOAD_PERCENT_LIMIT {
            return Err(CoreError::invalid_config(format!(
                "max load percent must be within 1..={}, got {}",
                Self::MAX_LOAD_PERCENT_LIMIT,
                self.max_load_percent
            )));
        }
        if self.initial_table_capacity > self.max_table_capacity {
            return Err(CoreError::invalid_config(format!(
                "initial table capacity {} exceeds maximum {}",
                self.initial_table_capacity, self.max_table_capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.initial_table_capacity, 16);
        assert_eq!(config.initial_buffer_capacity, 8);
        assert_eq!(config.max_load_percent, 75);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .initial_table_capacity(4)
            .max_load_percent(50)
            .max_pending_writes(100);

        assert_eq!(config.initial_table_capacity, 4);
        assert_eq!(config.max_load_percent, 50);
        assert_eq!(config.max_pending_writes, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_capacities() {
        assert!(Config::new().initial_table_capacity(0).validate().is_err());
        assert!(Config::new().initial_buffer_capacity(0).validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_load() {
        assert!(Config::new().max_load_percent(0).validate().is_err());
        assert!(Config::new().max_load_percent(91).validate().is_err());
        assert!(Config::new().max_load_percent(90).validate().is_ok());
    }

    #[test]
    fn rejects_initial_above_maximum() {
        let result = Config::new()
            .initial_table_capacity(64)
            .max_table_capacity(32)
            .validate();
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }
}
