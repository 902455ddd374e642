//! Error types for txkv core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in txkv core operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An operation that needs an open transaction was called while idle.
    #[error("no active transaction")]
    NoActiveTransaction,

    /// `begin` was called while a transaction is already open.
    #[error("a transaction is already active")]
    TransactionAlreadyActive,

    /// Growing the transaction buffer or the committed table failed.
    #[error("resource exhausted: could not allocate room for {requested} entries")]
    ResourceExhausted {
        /// Number of entries the failed allocation asked for.
        requested: usize,
    },

    /// The committed table cannot grow large enough to hold the merged state.
    #[error("capacity overflow: {required} entries exceed the maximum table capacity")]
    CapacityOverflow {
        /// Number of entries the table would have had to hold.
        required: usize,
    },

    /// The configuration is not usable.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates a resource exhausted error.
    pub fn resource_exhausted(requested: usize) -> Self {
        Self::ResourceExhausted { requested }
    }

    /// Creates a capacity overflow error.
    pub fn capacity_overflow(required: usize) -> Self {
        Self::CapacityOverflow { required }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns true if the error is caused by calling an operation in the wrong
    /// transaction state. Such errors never change the database.
    #[must_use]
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::NoActiveTransaction | Self::TransactionAlreadyActive
        )
    }
}
