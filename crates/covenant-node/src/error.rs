use covenant_governor::GovernorError;
use covenant_ledger::LedgerError;
use covenant_timelock::{CallError, TimelockError};
use covenant_types::TypesError;
use thiserror::Error;

/// Errors surfaced by the embedding environment.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NodeError {
    #[error(transparent)]
    Config(#[from] TypesError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Timelock(#[from] TimelockError),

    #[error(transparent)]
    Governor(#[from] GovernorError),

    #[error(transparent)]
    Call(#[from] CallError),
}
