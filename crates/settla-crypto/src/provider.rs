//! Signing provider seam.
//!
//! The core never inspects signature bytes itself. It hands the opaque
//! signature and the chain-bound signing hash to a `SigningProvider`,
//! which either yields the sender address or fails.

use crate::ed25519::{self, Keypair};
use crate::error::CryptoError;
use settla_types::{Address, Ed25519PublicKey, Ed25519Signature};

/// Produces and recovers transaction signatures.
pub trait SigningProvider: Send + Sync {
    /// Key material accepted by [`SigningProvider::sign`].
    type Keypair;

    /// Address controlled by `key`.
    fn address(&self, key: &Self::Keypair) -> Address;

    /// Sign `message`, returning the provider's opaque signature encoding.
    fn sign(&self, message: &[u8], key: &Self::Keypair) -> Vec<u8>;

    /// Recover the address that produced `signature` over `message`.
    fn recover_address(&self, signature: &[u8], message: &[u8]) -> Result<Address, CryptoError>;
}

/// Ed25519 provider.
///
/// Ed25519 has no public-key recovery, so the encoding carries the key:
/// `signature (64 bytes) || public key (32 bytes)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Provider;

impl Ed25519Provider {
    pub const ENCODED_LEN: usize = Ed25519Signature::LEN + Ed25519PublicKey::LEN;

    pub fn new() -> Self {
        Self
    }
}

impl SigningProvider for Ed25519Provider {
    type Keypair = Keypair;

    fn address(&self, key: &Keypair) -> Address {
        key.address()
    }

    fn sign(&self, message: &[u8], key: &Keypair) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::ENCODED_LEN);
        out.extend_from_slice(key.sign(message).as_bytes());
        out.extend_from_slice(key.public_key().as_bytes());
        out
    }

    fn recover_address(&self, signature: &[u8], message: &[u8]) -> Result<Address, CryptoError> {
        if signature.len() != Self::ENCODED_LEN {
            return Err(CryptoError::MalformedEncoding {
                expected: Self::ENCODED_LEN,
                actual: signature.len(),
            });
        }
        let (sig_bytes, pk_bytes) = signature.split_at(Ed25519Signature::LEN);
        let sig = Ed25519Signature::from_slice(sig_bytes).map_err(|_| CryptoError::InvalidSignature)?;
        let public_key =
            Ed25519PublicKey::from_slice(pk_bytes).map_err(|_| CryptoError::InvalidPublicKey)?;

        ed25519::verify(&public_key, message, &sig)?;
        Ok(public_key.to_address())
    }
}
