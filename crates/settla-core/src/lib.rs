//! Settla Core - Deterministic settlement engine.
//!
//! Components, leaf first:
//! - [`AccountLedger`]: the only mutator of account state
//! - [`TransactionValidator`]: ordered, side-effect free checks
//! - [`ExecutionEngine`]: validate-then-apply under a per-sender lock
//! - [`BlockCommitter`]: append-only chain of immutable blocks
//! - [`Settlement`]: facade over all of the above

pub mod chain;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod settlement;
pub mod validator;

pub use chain::{Block, BlockCommitter};
pub use error::CoreError;
pub use executor::ExecutionEngine;
pub use ledger::{AccountLedger, AccountReader, LedgerSnapshot};
pub use settlement::Settlement;
pub use validator::{Rejection, TransactionValidator, ValidatedTransfer};
