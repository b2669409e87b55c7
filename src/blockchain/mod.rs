pub mod block;
pub mod ledger;
pub mod pow;
pub mod validator;

pub use block::Block;
pub use ledger::Ledger;
pub use pow::ProofOfWork;
pub use validator::is_valid_chain;

/// Default Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Proof stored in the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// `previous_hash` of the genesis block. Never a valid hex digest length.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Sender used for mining rewards.
pub const REWARD_SENDER: &str = "0";

/// Reward credited to the miner of each block (dev value).
pub const MINING_REWARD: u64 = 1;
