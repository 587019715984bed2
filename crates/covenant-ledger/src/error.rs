use thiserror::Error;

/// Errors that can occur in ledger operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance: have {balance}, need {needed}")]
    InsufficientBalance { balance: u128, needed: u128 },

    #[error("Future lookup: index {index} is not yet historical (current {current})")]
    FutureLookup { index: u64, current: u64 },

    #[error("Balance overflow")]
    BalanceOverflow,
}
