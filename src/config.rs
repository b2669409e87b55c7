use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::blockchain::{DEFAULT_DIFFICULTY, MINING_REWARD};
use crate::network::DEFAULT_PEER_TIMEOUT_MS;

/// Node settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    pub mining_reward: u64,
    pub peer_timeout: Duration,
    pub strict_transactions: bool,
    pub peers: Vec<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            difficulty: DEFAULT_DIFFICULTY,
            mining_reward: MINING_REWARD,
            peer_timeout: Duration::from_millis(DEFAULT_PEER_TIMEOUT_MS),
            strict_transactions: true,
            peers: Vec::new(),
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or unparseable values keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let peers = lookup("PEERS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            difficulty: parse_or(&lookup, "POW_DIFFICULTY", defaults.difficulty),
            mining_reward: parse_or(&lookup, "MINING_REWARD", defaults.mining_reward),
            peer_timeout: Duration::from_millis(parse_or(
                &lookup,
                "PEER_TIMEOUT_MS",
                DEFAULT_PEER_TIMEOUT_MS,
            )),
            strict_transactions: parse_or(
                &lookup,
                "STRICT_TRANSACTIONS",
                defaults.strict_transactions,
            ),
            peers,
        }
    }
}

fn parse_or<T: FromStr + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("CONFIG - invalid {key}={raw:?}, using default");
            default
        }),
        None => default,
    }
}
