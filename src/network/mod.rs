pub mod fetch;
pub mod registry;
pub mod resolver;

pub use fetch::{ChainFetcher, HttpChainFetcher, PeerChain};
pub use registry::NodeRegistry;
pub use resolver::{resolve_conflicts, select_longest_valid};

/// Default per-peer fetch timeout.
pub const DEFAULT_PEER_TIMEOUT_MS: u64 = 3_000;
