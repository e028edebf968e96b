//! Settla Types - Core type definitions for the Settla settlement engine.
//!
//! This crate provides the value types shared by every other crate:
//! - Addresses (20-byte, Bech32m encoded)
//! - Hashes (32-byte, blake3 digests)
//! - U256 (256-bit unsigned integer with checked arithmetic)
//! - Transactions, Receipts, Block headers
//! - Accounts, Signatures
//! - Genesis configuration

pub mod address;
pub mod hash;
pub mod u256;
pub mod block;
pub mod transaction;
pub mod receipt;
pub mod account;
pub mod signature;
pub mod genesis;
pub mod error;

#[cfg(feature = "serde")]
mod serialization;

pub use address::Address;
pub use hash::Hash;
pub use u256::U256;
pub use block::BlockHeader;
pub use transaction::{Transaction, SignedTransaction, MIN_TRANSFER_GAS};
pub use receipt::{TransactionReceipt, ReceiptStatus, RejectReason};
pub use account::Account;
pub use signature::{Ed25519Signature, Ed25519PublicKey};
pub use genesis::{GenesisConfig, GenesisAlloc};
pub use error::TypesError;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Address, Hash, U256, BlockHeader,
        Transaction, SignedTransaction, MIN_TRANSFER_GAS,
        TransactionReceipt, ReceiptStatus, RejectReason,
        Account, Ed25519Signature, Ed25519PublicKey,
        GenesisConfig, GenesisAlloc, TypesError,
    };
}
