//! Scheduled operation queue.
//!
//! Operations are identified by a hash of their call batch, predecessor and
//! salt. Each identifier maps to a ready-timestamp: 0 means never scheduled,
//! 1 is the "done" sentinel, anything above is the time the operation
//! becomes executable.

use std::collections::HashMap;

use covenant_types::{Address, Hash};

use crate::call::{Call, TargetRegistry};
use crate::error::TimelockError;
use crate::roles::{Role, RoleTable};

/// Ready-timestamp sentinel for an executed operation.
pub const DONE_TIMESTAMP: u64 = 1;

/// Derived lifecycle of a scheduled operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    /// Never scheduled (or cancelled)
    Unset,
    /// Scheduled, delay still running
    Waiting,
    /// Scheduled and past its ready-timestamp
    Ready,
    /// Executed
    Done,
}

/// Role-gated delayed execution queue.
#[derive(Debug)]
pub struct Timelock {
    /// The timelock's own identity; forwarded calls carry it as the caller
    address: Address,
    /// Minimum schedule delay in seconds
    min_delay: u64,
    roles: RoleTable,
    /// operation id -> ready-timestamp (0 unset, 1 done, >1 pending-until)
    timestamps: HashMap<Hash, u64>,
}

impl Timelock {
    /// Create a timelock with initial role grants.
    ///
    /// Proposers also receive the canceller role, so whoever can schedule
    /// an operation can also withdraw it. `admin` may adjust roles until it
    /// renounces.
    pub fn new(
        address: Address,
        min_delay: u64,
        proposers: &[Address],
        executors: &[Address],
        admin: Address,
    ) -> Self {
        let mut roles = RoleTable::new();
        roles.grant(Role::Admin, admin);
        for proposer in proposers {
            roles.grant(Role::Proposer, *proposer);
            roles.grant(Role::Canceller, *proposer);
        }
        for executor in executors {
            roles.grant(Role::Executor, *executor);
        }

        Self {
            address,
            min_delay,
            roles,
            timestamps: HashMap::new(),
        }
    }

    /// The timelock's own address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Minimum delay between scheduling and execution.
    pub fn min_delay(&self) -> u64 {
        self.min_delay
    }

    /// Whether `account` holds `role` (open-role sentinel included).
    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.roles.has_role(role, account)
    }

    /// Grant `role` to `account`. Caller must hold the admin role.
    pub fn grant_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), TimelockError> {
        self.check_role(Role::Admin, &caller)?;
        self.roles.grant(role, account);
        if role == Role::Proposer {
            self.roles.grant(Role::Canceller, account);
        }
        tracing::info!(role = role.name(), account = %account, "role granted");
        Ok(())
    }

    /// Revoke `role` from `account`. Caller must hold the admin role.
    pub fn revoke_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), TimelockError> {
        self.check_role(Role::Admin, &caller)?;
        self.roles.revoke(role, &account);
        tracing::info!(role = role.name(), account = %account, "role revoked");
        Ok(())
    }

    /// Give up a role. Accounts may only renounce for themselves.
    pub fn renounce_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), TimelockError> {
        if caller != account {
            return Err(TimelockError::Unauthorized(
                "can only renounce roles for self".to_string(),
            ));
        }
        self.roles.revoke(role, &account);
        tracing::info!(role = role.name(), account = %account, "role renounced");
        Ok(())
    }

    /// Identifier of an operation: blake3 over the canonical encoding of
    /// (calls, predecessor, salt).
    pub fn hash_operation(calls: &[Call], predecessor: Hash, salt: Hash) -> Hash {
        let encoded = borsh::to_vec(&(calls.to_vec(), predecessor, salt))
            .expect("borsh encoding of in-memory calls cannot fail");
        Hash::compute(&encoded)
    }

    /// Derived state of an operation at `now`.
    pub fn operation_state(&self, id: &Hash, now: u64) -> OperationState {
        match self.timestamps.get(id).copied().unwrap_or(0) {
            0 => OperationState::Unset,
            DONE_TIMESTAMP => OperationState::Done,
            ready_at if now < ready_at => OperationState::Waiting,
            _ => OperationState::Ready,
        }
    }

    /// Whether the operation is scheduled and past its delay.
    pub fn is_ready(&self, id: &Hash, now: u64) -> bool {
        self.operation_state(id, now) == OperationState::Ready
    }

    /// Whether the operation has been executed.
    pub fn is_done(&self, id: &Hash) -> bool {
        self.timestamps.get(id).copied() == Some(DONE_TIMESTAMP)
    }

    /// Ready-timestamp for an operation, if scheduled and not yet done.
    pub fn ready_at(&self, id: &Hash) -> Option<u64> {
        match self.timestamps.get(id).copied() {
            Some(ts) if ts > DONE_TIMESTAMP => Some(ts),
            _ => None,
        }
    }

    /// Schedule a call batch. Caller must hold the proposer role.
    pub fn schedule(
        &mut self,
        caller: Address,
        calls: &[Call],
        predecessor: Hash,
        salt: Hash,
        delay: u64,
        now: u64,
    ) -> Result<Hash, TimelockError> {
        self.check_role(Role::Proposer, &caller)?;

        if delay < self.min_delay {
            return Err(TimelockError::DelayTooShort {
                delay,
                min: self.min_delay,
            });
        }

        let id = Self::hash_operation(calls, predecessor, salt);
        if self.timestamps.get(&id).copied().unwrap_or(0) != 0 {
            return Err(TimelockError::AlreadyScheduled(id));
        }

        let ready_at = now + delay;
        self.timestamps.insert(id, ready_at);
        tracing::info!(operation = %id, ready_at, "operation scheduled");
        Ok(id)
    }

    /// Cancel a pending operation. Caller must hold the canceller role.
    pub fn cancel(&mut self, caller: Address, id: &Hash) -> Result<(), TimelockError> {
        self.check_role(Role::Canceller, &caller)?;

        match self.timestamps.get(id).copied().unwrap_or(0) {
            0 | DONE_TIMESTAMP => Err(TimelockError::WrongState(*id)),
            _ => {
                self.timestamps.remove(id);
                tracing::info!(operation = %id, "operation cancelled");
                Ok(())
            }
        }
    }

    /// Execute a ready call batch, forwarding each call in order with the
    /// timelock's address as the caller.
    ///
    /// The batch commits as a unit: if any call fails the error propagates
    /// as `UnderlyingCallReverted` and the operation is not marked done, so
    /// it stays retriable. A done operation can never execute again.
    pub fn execute(
        &mut self,
        caller: Address,
        calls: &[Call],
        predecessor: Hash,
        salt: Hash,
        now: u64,
        registry: &mut TargetRegistry,
    ) -> Result<Hash, TimelockError> {
        self.check_role(Role::Executor, &caller)?;

        let id = Self::hash_operation(calls, predecessor, salt);
        match self.operation_state(&id, now) {
            OperationState::Unset | OperationState::Done => {
                return Err(TimelockError::WrongState(id));
            }
            OperationState::Waiting => {
                let ready_at = self.timestamps[&id];
                return Err(TimelockError::NotReady { ready_at, now });
            }
            OperationState::Ready => {}
        }

        if !predecessor.is_zero() && !self.is_done(&predecessor) {
            return Err(TimelockError::PredecessorNotExecuted(predecessor));
        }

        for call in calls {
            registry.dispatch(self.address, call)?;
        }

        self.timestamps.insert(id, DONE_TIMESTAMP);
        tracing::info!(operation = %id, "operation executed");
        Ok(id)
    }

    fn check_role(&self, role: Role, account: &Address) -> Result<(), TimelockError> {
        if self.roles.has_role(role, account) {
            Ok(())
        } else {
            Err(TimelockError::MissingRole {
                account: *account,
                role,
            })
        }
    }
}
