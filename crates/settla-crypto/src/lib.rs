//! Settla Crypto - Signing provider for the Settla settlement engine.
//!
//! This crate provides:
//! - Ed25519 key pairs (transaction signing)
//! - The `SigningProvider` seam the core recovers senders through
//! - `Ed25519Provider`, the default provider

pub mod ed25519;
pub mod provider;
pub mod error;

pub use ed25519::{Keypair, verify as ed25519_verify};
pub use provider::{Ed25519Provider, SigningProvider};
pub use error::CryptoError;
