use thiserror::Error;

/// Errors raised by the ledger core and its peer collaborators.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("chain has no blocks")]
    EmptyChain,

    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("proof {proof} does not solve the puzzle for last proof {expected_last_proof}")]
    StaleProof { expected_last_proof: u64, proof: u64 },

    #[error("proof-of-work search cancelled")]
    MiningCancelled,

    #[error("malformed chain from peer {peer}: {reason}")]
    MalformedPeerResponse { peer: String, reason: String },

    #[error("peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },

    #[error("chain of length {length} from peer {peer} failed validation")]
    InvalidChainRejected { peer: String, length: usize },

    #[error("invalid node address: {0}")]
    InvalidNodeAddress(String),

    #[error("http client setup failed: {0}")]
    HttpClient(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
