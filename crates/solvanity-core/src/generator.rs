//! Candidate generation capability

use thiserror::Error;

use solvanity_crypto::Keypair;

#[derive(Error, Debug)]
#[error("candidate generation failed: {0}")]
pub struct GeneratorError(pub String);

/// One randomly generated key pair and its derived address, tested once
/// against the pattern and discarded unless it matches.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Base58-encoded public key
    pub address: String,
    /// The secret material behind the address
    pub keypair: Keypair,
}

/// Source of fresh candidates, assumed uniformly random over the address
/// space. Shared by every worker in a pool, so implementations must be
/// thread-safe and should not lock.
pub trait CandidateGenerator: Send + Sync {
    fn generate(&self) -> Result<Candidate, GeneratorError>;
}

/// The production generator: fresh Ed25519 keypairs from the OS RNG.
#[derive(Debug, Default)]
pub struct SolanaGenerator;

impl CandidateGenerator for SolanaGenerator {
    fn generate(&self) -> Result<Candidate, GeneratorError> {
        let keypair = Keypair::generate();
        Ok(Candidate {
            address: keypair.address(),
            keypair,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solana_generator_produces_fresh_candidates() {
        let gen = SolanaGenerator;
        let a = gen.generate().unwrap();
        let b = gen.generate().unwrap();
        assert_ne!(a.address, b.address);
        assert_eq!(a.address, a.keypair.address());
    }
}
