//! Covenant Timelock - role-gated delayed execution.
//!
//! This crate provides:
//! - A role table with the open-role ("granted to everyone") sentinel
//! - A queue of scheduled call batches with a mandatory minimum delay
//! - Call dispatch to registered governed targets

pub mod call;
pub mod error;
pub mod roles;
pub mod timelock;

pub use call::{Call, CallError, CallTarget, TargetRegistry};
pub use error::TimelockError;
pub use roles::{Role, RoleTable};
pub use timelock::{OperationState, Timelock, DONE_TIMESTAMP};
