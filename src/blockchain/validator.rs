use log::debug;

use super::{Block, ProofOfWork};

/// Validate a candidate chain: index continuity, hash linkage and PoW between
/// every consecutive pair. Chains with zero or one block are trivially valid.
pub fn is_valid_chain(chain: &[Block], pow: &ProofOfWork) -> bool {
    for pair in chain.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);

        if current.index != prev.index + 1 {
            debug!(
                "VALIDATOR - block #{} follows #{}: index gap",
                current.index, prev.index
            );
            return false;
        }

        if current.previous_hash != prev.compute_hash() {
            debug!("VALIDATOR - block #{}: broken hash link", current.index);
            return false;
        }

        if !pow.valid_proof(prev.proof, current.proof) {
            debug!(
                "VALIDATOR - block #{}: proof {} invalid for last proof {}",
                current.index, current.proof, prev.proof
            );
            return false;
        }
    }

    true
}
