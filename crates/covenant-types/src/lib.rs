//! Covenant Types - Core type definitions for the Covenant governance engine.
//!
//! This crate provides the fundamental types used throughout Covenant:
//! - Addresses (20-byte, Bech32m encoded)
//! - Hashes (32-byte, blake3 digests)
//! - Governance configuration

pub mod address;
pub mod config;
pub mod error;
pub mod hash;

pub use address::Address;
pub use config::GovernanceConfig;
pub use error::TypesError;
pub use hash::Hash;
