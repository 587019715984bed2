//! Covenant Governor - proposal lifecycle and voting.
//!
//! This crate provides:
//! - The proposal registry with hash-derived identifiers
//! - The derived proposal state machine
//! - Snapshot-weighted vote casting
//! - Queue/execute orchestration against the timelock

pub mod error;
pub mod governor;
pub mod proposal;

pub use error::GovernorError;
pub use governor::Governor;
pub use proposal::{Proposal, ProposalState, VoteCast, VoteSupport};
