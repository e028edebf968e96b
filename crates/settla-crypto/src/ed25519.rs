use crate::error::CryptoError;
use ed25519_dalek::{Signer, Verifier};
use rand::rngs::OsRng;
use settla_types::{Address, Ed25519PublicKey, Ed25519Signature};
use std::fmt;

/// Ed25519 keypair for transaction signing.
/// The signing key is zeroized on drop by `ed25519-dalek`.
pub struct Keypair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Keypair {
    /// Generate a new random keypair
    pub fn generate() -> Self {
        let mut csprng = OsRng;
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Deterministic keypair from a 32-byte seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey::from_bytes(self.signing_key.verifying_key().to_bytes())
    }

    /// Address derived from this keypair's public key
    pub fn address(&self) -> Address {
        self.public_key().to_address()
    }

    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature::from_bytes(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({})", self.address())
    }
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        Self {
            signing_key: self.signing_key.clone(),
        }
    }
}

/// Verify an ed25519 signature.
pub fn verify(
    public_key: &Ed25519PublicKey,
    message: &[u8],
    signature: &Ed25519Signature,
) -> Result<(), CryptoError> {
    let pk = ed25519_dalek::VerifyingKey::from_bytes(public_key.as_bytes())
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    pk.verify_strict(message, &sig)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_generation() {
        let keypair = Keypair::generate();
        assert!(!keypair.address().is_zero());
        assert_ne!(keypair.address(), Keypair::generate().address());
    }

    #[test]
    fn test_keypair_from_seed() {
        let kp1 = Keypair::from_seed(&[42u8; 32]);
        let kp2 = Keypair::from_seed(&[42u8; 32]);
        assert_eq!(kp1.public_key(), kp2.public_key());
        assert_eq!(kp1.address(), kp2.address());
    }

    #[test]
    fn test_sign_and_verify() {
        let keypair = Keypair::generate();
        let message = b"settle 1000";

        let signature = keypair.sign(message);
        assert!(verify(&keypair.public_key(), message, &signature).is_ok());

        assert_eq!(
            verify(&keypair.public_key(), b"settle 1001", &signature),
            Err(CryptoError::VerificationFailed)
        );

        let other = Keypair::generate();
        assert!(verify(&other.public_key(), message, &signature).is_err());
    }

    #[test]
    fn test_keypair_clone_signs_identically() {
        let kp1 = Keypair::from_seed(&[7u8; 32]);
        let kp2 = kp1.clone();
        assert_eq!(kp1.sign(b"msg"), kp2.sign(b"msg"));
    }
}
