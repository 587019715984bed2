//! Sample governed resource: a single owned value slot.
//!
//! Stands in for any target contract the DAO controls. Only the owner may
//! mutate it; ownership is handed to the timelock during bootstrap, so the
//! only way to change the value afterwards is a full governance cycle.

use std::any::Any;

use borsh::{BorshDeserialize, BorshSerialize};
use covenant_timelock::{Call, CallError, CallTarget};
use covenant_types::Address;

/// Calldata accepted by [`ValueStore`].
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum ValueStoreCall {
    /// Replace the stored value
    Store { value: u128 },
}

/// Owner-gated value slot.
#[derive(Debug)]
pub struct ValueStore {
    owner: Address,
    original_owner: Address,
    ownership_transferred: bool,
    value: u128,
}

impl ValueStore {
    /// Create an empty store owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            original_owner: owner,
            ownership_transferred: false,
            value: 0,
        }
    }

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Read the stored value.
    pub fn retrieve(&self) -> u128 {
        self.value
    }

    /// Replace the stored value. Owner only.
    pub fn store(&mut self, caller: Address, value: u128) -> Result<(), CallError> {
        if caller != self.owner {
            return Err(CallError::Unauthorized(caller));
        }
        self.value = value;
        tracing::info!(value, "value stored");
        Ok(())
    }

    /// Reassign ownership. Only the original owner may do this, and only
    /// once: the bootstrap hand-off to the timelock.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), CallError> {
        if caller != self.original_owner || self.ownership_transferred {
            return Err(CallError::Unauthorized(caller));
        }
        self.owner = new_owner;
        self.ownership_transferred = true;
        tracing::info!(new_owner = %new_owner, "ownership transferred");
        Ok(())
    }

    /// Build the call that stores `value`, addressed to `target`.
    pub fn store_call(target: Address, value: u128) -> Call {
        let data = borsh::to_vec(&ValueStoreCall::Store { value })
            .expect("borsh encoding of a plain enum cannot fail");
        Call::new(target, data)
    }
}

impl CallTarget for ValueStore {
    fn call(&mut self, caller: Address, _value: u128, data: &[u8]) -> Result<Vec<u8>, CallError> {
        let decoded = ValueStoreCall::try_from_slice(data)
            .map_err(|e| CallError::InvalidCalldata(e.to_string()))?;
        match decoded {
            ValueStoreCall::Store { value } => {
                self.store(caller, value)?;
                Ok(vec![])
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address(n: u8) -> Address {
        let mut addr = [0u8; 20];
        addr[19] = n;
        Address::from_bytes(addr)
    }

    #[test]
    fn test_store_is_owner_gated() {
        let owner = test_address(1);
        let stranger = test_address(2);
        let mut store = ValueStore::new(owner);

        assert_eq!(store.retrieve(), 0);
        assert_eq!(
            store.store(stranger, 42),
            Err(CallError::Unauthorized(stranger))
        );
        store.store(owner, 42).unwrap();
        assert_eq!(store.retrieve(), 42);
    }

    #[test]
    fn test_ownership_transfers_exactly_once() {
        let owner = test_address(1);
        let timelock = test_address(2);
        let late = test_address(3);
        let mut store = ValueStore::new(owner);

        store.transfer_ownership(owner, timelock).unwrap();
        assert_eq!(store.owner(), timelock);

        // The original owner cannot move it again
        assert!(store.transfer_ownership(owner, late).is_err());
        // Old owner lost write access
        assert!(store.store(owner, 1).is_err());
        store.store(timelock, 1).unwrap();
    }

    #[test]
    fn test_calldata_roundtrip() {
        let owner = test_address(1);
        let target = test_address(9);
        let mut store = ValueStore::new(owner);

        let call = ValueStore::store_call(target, 77);
        store.call(owner, call.value, &call.data).unwrap();
        assert_eq!(store.retrieve(), 77);
    }

    #[test]
    fn test_malformed_calldata_rejected() {
        let owner = test_address(1);
        let mut store = ValueStore::new(owner);

        let result = store.call(owner, 0, &[0xff, 0xff]);
        assert!(matches!(result, Err(CallError::InvalidCalldata(_))));
    }
}
