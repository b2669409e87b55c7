use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A single block in the chain holding the transactions mined into it.
///
/// Field order is the canonical hashing order (lexicographic by key); do not
/// reorder without changing every digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub previous_hash: String,
    pub proof: u64,
    pub timestamp: f64, // Unix seconds (UTC), sub-second precision
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self::new(1, GENESIS_PREVIOUS_HASH.to_string(), GENESIS_PROOF, Vec::new())
    }

    pub fn new(
        index: u64,
        previous_hash: String,
        proof: u64,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            index,
            previous_hash,
            proof,
            timestamp: now_secs(),
            transactions,
        }
    }

    /// SHA-256 over the canonical JSON encoding of the block, lowercase hex.
    pub fn compute_hash(&self) -> String {
        let preimage = serde_json::to_vec(self).expect("serialize block");
        let mut hasher = Sha256::new();
        hasher.update(&preimage);
        hex::encode(hasher.finalize())
    }
}

fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::Block;
    use crate::blockchain::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
    use crate::transaction::Transaction;

    fn sample() -> Block {
        Block {
            index: 2,
            previous_hash: "ab".repeat(32),
            proof: 35293,
            timestamp: 1_700_000_000.25,
            transactions: vec![Transaction::new("0", "miner", 1)],
        }
    }

    #[test]
    fn genesis_uses_fixed_values() {
        let g = Block::genesis();
        assert_eq!(g.index, 1);
        assert_eq!(g.proof, GENESIS_PROOF);
        assert_eq!(g.previous_hash, GENESIS_PREVIOUS_HASH);
        assert!(g.transactions.is_empty());
    }

    #[test]
    fn hash_is_stable_hex_digest() {
        let b = sample();
        let h = b.compute_hash();
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(h, b.compute_hash());
        assert_eq!(h, b.clone().compute_hash());
    }

    #[test]
    fn hash_ignores_json_key_order_of_source() {
        let b = sample();
        // Same content, keys shuffled in the incoming document.
        let shuffled = r#"{
            "transactions": [{"sender": "0", "amount": 1, "recipient": "miner"}],
            "timestamp": 1700000000.25,
            "proof": 35293,
            "index": 2,
            "previous_hash": "abababababababababababababababababababababababababababababababab"
        }"#;
        let parsed: Block = serde_json::from_str(shuffled).unwrap();
        assert_eq!(parsed.compute_hash(), b.compute_hash());
    }

    #[test]
    fn canonical_encoding_has_sorted_keys() {
        let json = serde_json::to_string(&sample()).unwrap();
        let keys = [
            "\"index\"",
            "\"previous_hash\"",
            "\"proof\"",
            "\"timestamp\"",
            "\"transactions\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn hash_changes_when_amount_tampered() {
        let mut b = sample();
        let before = b.compute_hash();
        b.transactions[0].amount = 1_000;
        assert_ne!(before, b.compute_hash());
    }
}
