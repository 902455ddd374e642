//! Transaction management.
//!
//! txkv runs at most one read-write transaction at a time:
//! - **Atomicity**: a commit applies every buffered write or none of them
//! - **Isolation**: readers only ever see committed state
//! - **Last write wins**: repeated writes to one key resolve at merge time

mod buffer;
mod manager;
mod state;

pub use buffer::{PendingWrite, TransactionBuffer};
pub use manager::{GrowthPolicy, TransactionManager};
pub use state::{Transaction, TransactionState};
