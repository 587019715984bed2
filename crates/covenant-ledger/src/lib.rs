//! Covenant Ledger - checkpointed voting-power accounting.
//!
//! This crate provides:
//! - Token balances with explicit delegation
//! - Per-delegatee voting-power checkpoints with historical lookup
//! - Total-supply history for quorum evaluation

pub mod checkpoint;
pub mod error;
pub mod ledger;

pub use checkpoint::{Checkpoint, Checkpoints};
pub use error::LedgerError;
pub use ledger::VotingLedger;
