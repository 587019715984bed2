use covenant_ledger::LedgerError;
use covenant_timelock::TimelockError;
use covenant_types::{Address, Hash};
use thiserror::Error;

use crate::proposal::ProposalState;

/// Errors that can occur in governor operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernorError {
    #[error("Empty proposal: at least one call is required")]
    EmptyProposal,

    #[error("Duplicate proposal: {0}")]
    DuplicateProposal(Hash),

    #[error("Proposal not found: {0}")]
    ProposalNotFound(Hash),

    #[error("Voting is not active (proposal is {0:?})")]
    NotActive(ProposalState),

    #[error("Account {0} has already voted")]
    AlreadyVoted(Address),

    #[error("Account {0} has no voting power at the proposal snapshot")]
    ZeroWeight(Address),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Wrong proposal state: expected {expected:?}, got {actual:?}")]
    WrongState {
        expected: ProposalState,
        actual: ProposalState,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Timelock(#[from] TimelockError),
}
