//! Role-based access control with an open-role sentinel.
//!
//! Granting a role to [`Address::ZERO`] opens it to every caller. The
//! deployment convention uses this to make execution permissionless while
//! proposing stays restricted to the governor.

use std::collections::{HashMap, HashSet};

use covenant_types::Address;

/// Timelock roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// May grant and revoke roles; renounced after bootstrap
    Admin,
    /// May schedule operations
    Proposer,
    /// May execute ready operations
    Executor,
    /// May cancel pending operations
    Canceller,
}

impl Role {
    /// Human-readable role name.
    pub fn name(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Proposer => "PROPOSER",
            Role::Executor => "EXECUTOR",
            Role::Canceller => "CANCELLER",
        }
    }
}

/// (role, account) grant table.
#[derive(Debug, Clone, Default)]
pub struct RoleTable {
    grants: HashMap<Role, HashSet<Address>>,
}

impl RoleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `account` holds `role`.
    ///
    /// The zero-address sentinel is checked first: a role granted to
    /// [`Address::ZERO`] is held by everyone.
    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        match self.grants.get(&role) {
            Some(members) => members.contains(&Address::ZERO) || members.contains(account),
            None => false,
        }
    }

    /// Record a grant. Authorization is the caller's concern.
    pub fn grant(&mut self, role: Role, account: Address) {
        self.grants.entry(role).or_default().insert(account);
    }

    /// Remove a grant. Removing an absent grant is a no-op.
    pub fn revoke(&mut self, role: Role, account: &Address) {
        if let Some(members) = self.grants.get_mut(&role) {
            members.remove(account);
        }
    }
}
