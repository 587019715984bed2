//! Call batches and target dispatch.
//!
//! A scheduled operation is a list of [`Call`]s. The timelock does not know
//! what its targets do; it forwards each call through a [`TargetRegistry`]
//! with its own address as the caller, and the target decodes the calldata.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use covenant_types::Address;
use thiserror::Error;

/// One forwarded call: target, attached value, opaque calldata.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Call {
    /// Target address, resolved through the registry
    pub target: Address,
    /// Value attached to the call
    pub value: u128,
    /// Opaque calldata, decoded by the target
    pub data: Vec<u8>,
}

impl Call {
    /// Create a call with no attached value.
    pub fn new(target: Address, data: Vec<u8>) -> Self {
        Self {
            target,
            value: 0,
            data,
        }
    }
}

/// Errors surfaced by a call target.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Unknown call target: {0}")]
    UnknownTarget(Address),

    #[error("Caller {0} is not authorized for this call")]
    Unauthorized(Address),

    #[error("Malformed calldata: {0}")]
    InvalidCalldata(String),

    #[error("Call failed: {0}")]
    Failed(String),
}

/// Something the timelock can forward calls to.
pub trait CallTarget {
    /// Handle a call from `caller` with the given value and calldata.
    fn call(&mut self, caller: Address, value: u128, data: &[u8]) -> Result<Vec<u8>, CallError>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Address-keyed registry of governed targets.
#[derive(Default)]
pub struct TargetRegistry {
    targets: HashMap<Address, Box<dyn CallTarget>>,
}

impl TargetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target under an address.
    pub fn register(&mut self, address: Address, target: Box<dyn CallTarget>) {
        self.targets.insert(address, target);
    }

    /// Whether a target is registered at `address`.
    pub fn contains(&self, address: &Address) -> bool {
        self.targets.contains_key(address)
    }

    /// Forward a call to its target, with `caller` as the caller identity.
    pub fn dispatch(&mut self, caller: Address, call: &Call) -> Result<Vec<u8>, CallError> {
        let target = self
            .targets
            .get_mut(&call.target)
            .ok_or(CallError::UnknownTarget(call.target))?;
        target.call(caller, call.value, &call.data)
    }

    /// Typed read access to a registered target.
    pub fn get<T: 'static>(&self, address: &Address) -> Option<&T> {
        self.targets
            .get(address)
            .and_then(|t| t.as_any().downcast_ref::<T>())
    }

    /// Typed mutable access to a registered target.
    pub fn get_mut<T: 'static>(&mut self, address: &Address) -> Option<&mut T> {
        self.targets
            .get_mut(address)
            .and_then(|t| t.as_any_mut().downcast_mut::<T>())
    }
}

// Box<dyn CallTarget> has no useful Debug; list the registered addresses.
impl fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetRegistry")
            .field("targets", &self.targets.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl CallTarget for Echo {
        fn call(
            &mut self,
            _caller: Address,
            _value: u128,
            data: &[u8],
        ) -> Result<Vec<u8>, CallError> {
            Ok(data.to_vec())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_dispatch_unknown_target() {
        let mut registry = TargetRegistry::new();
        let caller = Address::from_bytes([1u8; 20]);
        let target = Address::from_bytes([2u8; 20]);

        let result = registry.dispatch(caller, &Call::new(target, vec![]));
        assert_eq!(result, Err(CallError::UnknownTarget(target)));
    }

    #[test]
    fn test_dispatch_and_typed_access() {
        let mut registry = TargetRegistry::new();
        let caller = Address::from_bytes([1u8; 20]);
        let target = Address::from_bytes([2u8; 20]);
        registry.register(target, Box::new(Echo));

        let out = registry
            .dispatch(caller, &Call::new(target, vec![7, 8, 9]))
            .unwrap();
        assert_eq!(out, vec![7, 8, 9]);

        assert!(registry.get::<Echo>(&target).is_some());
        assert!(registry.get::<Echo>(&caller).is_none());
    }
}
