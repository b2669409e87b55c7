use sha2::{Digest, Sha256};
use tokio_util::sync::CancellationToken;

use crate::error::{LedgerError, Result};

/// How often (in attempts) the search loop polls its cancellation token.
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Proof-of-Work puzzle: find `proof` such that
/// `sha256(format!("{last_proof}{proof}"))` starts with `difficulty` hex zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: u32,
}

impl ProofOfWork {
    pub fn new(difficulty: u32) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn valid_proof(&self, last_proof: u64, proof: u64) -> bool {
        let guess = format!("{last_proof}{proof}");
        let mut hasher = Sha256::new();
        hasher.update(guess.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest
            .chars()
            .take(self.difficulty as usize)
            .all(|c| c == '0')
    }

    /// Linear search from 0; returns the smallest valid proof.
    /// Blocking and CPU-bound: run it on a blocking worker, not a request task.
    pub fn find_proof(&self, last_proof: u64, cancel: &CancellationToken) -> Result<u64> {
        let mut proof: u64 = 0;
        loop {
            if proof % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                return Err(LedgerError::MiningCancelled);
            }
            if self.valid_proof(last_proof, proof) {
                return Ok(proof);
            }
            proof = proof.wrapping_add(1);
        }
    }

    /// Run `find_proof` on the blocking pool so async callers stay responsive.
    pub async fn find_proof_blocking(
        &self,
        last_proof: u64,
        cancel: CancellationToken,
    ) -> Result<u64> {
        let pow = *self;
        tokio::task::spawn_blocking(move || pow.find_proof(last_proof, &cancel))
            .await
            .map_err(|_| LedgerError::MiningCancelled)?
    }
}
