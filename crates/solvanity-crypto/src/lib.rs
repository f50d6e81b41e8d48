//! Solvanity Crypto Primitives
//!
//! Ed25519 key pairs and Base58 encoding for Solana address generation.

pub mod ed25519;
pub mod encoding;

pub use self::ed25519::{Ed25519Error, Keypair};
pub use self::encoding::{base58_decode, base58_encode};
