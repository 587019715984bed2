use covenant_types::{Address, Hash};
use thiserror::Error;

use crate::call::CallError;
use crate::roles::Role;

/// Errors that can occur in timelock operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimelockError {
    #[error("Account {account} is missing role {}", .role.name())]
    MissingRole { account: Address, role: Role },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Delay too short: {delay} < minimum {min}")]
    DelayTooShort { delay: u64, min: u64 },

    #[error("Operation {0} is already scheduled")]
    AlreadyScheduled(Hash),

    #[error("Operation not ready: ready at {ready_at}, now {now}")]
    NotReady { ready_at: u64, now: u64 },

    #[error("Predecessor operation {0} has not been executed")]
    PredecessorNotExecuted(Hash),

    #[error("Underlying call reverted: {0}")]
    UnderlyingCallReverted(#[from] CallError),

    #[error("Operation {0} is not in the required state")]
    WrongState(Hash),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TimelockError::MissingRole {
            account: Address::ZERO,
            role: Role::Proposer,
        };
        assert!(err.to_string().contains("PROPOSER"));

        let err = TimelockError::DelayTooShort { delay: 10, min: 60 };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("60"));
    }

    #[test]
    fn test_call_error_conversion() {
        let inner = CallError::Failed("store rejected".to_string());
        let err: TimelockError = inner.into();
        assert!(matches!(err, TimelockError::UnderlyingCallReverted(_)));
        assert!(err.to_string().contains("store rejected"));
    }
}
