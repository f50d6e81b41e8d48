//! Ed25519 key pairs in Solana's layout

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use thiserror::Error;

use crate::encoding::base58_encode;

#[derive(Error, Debug)]
pub enum Ed25519Error {
    #[error("Invalid seed length (expected 32 bytes, got {0})")]
    InvalidSeedLength(usize),
}

/// An Ed25519 keypair whose public key doubles as the Solana address.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Create from a raw 32-byte seed
    pub fn from_seed(seed: &[u8]) -> Result<Self, Ed25519Error> {
        let bytes: &[u8; 32] = seed
            .try_into()
            .map_err(|_| Ed25519Error::InvalidSeedLength(seed.len()))?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(bytes),
        })
    }

    /// Get the private key seed (32 bytes)
    pub fn seed_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Get the public key (32 bytes)
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Get the full keypair bytes (64 bytes: seed || pubkey) - Solana format
    pub fn keypair_bytes(&self) -> [u8; 64] {
        let mut result = [0u8; 64];
        result[..32].copy_from_slice(&self.signing_key.to_bytes());
        result[32..].copy_from_slice(self.signing_key.verifying_key().as_bytes());
        result
    }

    /// Base58-encoded public key, i.e. the Solana address
    pub fn address(&self) -> String {
        base58_encode(&self.public_key_bytes())
    }

    /// Base58-encoded 64-byte keypair, the form wallets import
    pub fn secret_base58(&self) -> String {
        base58_encode(&self.keypair_bytes())
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret half
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_generation() {
        let kp = Keypair::generate();
        assert_eq!(kp.seed_bytes().len(), 32);
        assert_eq!(kp.public_key_bytes().len(), 32);
        assert_eq!(kp.keypair_bytes().len(), 64);
    }

    #[test]
    fn test_deterministic_from_seed() {
        let seed = [7u8; 32];
        let kp1 = Keypair::from_seed(&seed).unwrap();
        let kp2 = Keypair::from_seed(&seed).unwrap();
        assert_eq!(kp1.address(), kp2.address());
    }

    #[test]
    fn test_bad_seed_length() {
        assert!(Keypair::from_seed(&[1u8; 31]).is_err());
        assert!(Keypair::from_seed(&[1u8; 33]).is_err());
    }

    #[test]
    fn test_address_is_base58() {
        let valid = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
        let addr = Keypair::generate().address();

        // Solana addresses are 32-44 chars of Base58
        assert!(addr.len() >= 32 && addr.len() <= 44);
        for c in addr.chars() {
            assert!(valid.contains(c));
        }
    }

    #[test]
    fn test_keypair_bytes_layout() {
        let kp = Keypair::generate();
        let bytes = kp.keypair_bytes();
        assert_eq!(&bytes[..32], &kp.seed_bytes());
        assert_eq!(&bytes[32..], &kp.public_key_bytes());
    }
}
