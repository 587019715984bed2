//! Covenant Node - embedding environment for the governance core.
//!
//! This crate provides:
//! - The deterministic block/time sequencer injected into every operation
//! - The order-sensitive bootstrap protocol wiring ledger, timelock,
//!   governor and the governed resource together
//! - A sample governed resource (`ValueStore`)

pub mod bootstrap;
pub mod clock;
pub mod error;
pub mod value_store;

pub use bootstrap::{bootstrap, Dao};
pub use clock::BlockClock;
pub use error::NodeError;
pub use value_store::{ValueStore, ValueStoreCall};
