use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::blockchain::{Block, Ledger, ProofOfWork, REWARD_SENDER};
use crate::config::NodeConfig;
use crate::error::Result;
use crate::network::{ChainFetcher, NodeRegistry, resolve_conflicts};
use crate::transaction::Transaction;

/// Process-wide node context shared by every request handler.
pub struct Node {
    pub node_id: String,
    ledger: Mutex<Ledger>,
    registry: Mutex<NodeRegistry>,
    fetcher: Arc<dyn ChainFetcher>,
    mining_reward: u64,
    peer_timeout: Duration,
    shutdown: CancellationToken,
}

impl Node {
    pub fn new(config: &NodeConfig, fetcher: Arc<dyn ChainFetcher>) -> Self {
        let pow = ProofOfWork::new(config.difficulty);
        Self {
            node_id: Uuid::new_v4().simple().to_string(),
            ledger: Mutex::new(Ledger::new(pow, config.strict_transactions)),
            registry: Mutex::new(NodeRegistry::new()),
            fetcher,
            mining_reward: config.mining_reward,
            peer_timeout: config.peer_timeout,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn submit_transaction(&self, sender: &str, recipient: &str, amount: u64) -> Result<u64> {
        let mut ledger = self.ledger.lock().expect("mutex poisoned");
        ledger.add_transaction(sender, recipient, amount)
    }

    /// Search for the next proof off the request thread, then credit the
    /// reward and seal the block in one critical section. Retries when the
    /// found proof no longer solves the puzzle for the current tip.
    pub async fn mine(&self) -> Result<Block> {
        loop {
            let (last_proof, pow) = {
                let ledger = self.ledger.lock().expect("mutex poisoned");
                (ledger.last_block()?.proof, ledger.pow())
            };

            debug!(
                "MINER - searching proof after {last_proof} (difficulty {})",
                pow.difficulty()
            );
            // Dropping this request (client gone, caller timeout) stops the search.
            let token = self.shutdown.child_token();
            let _search_guard = token.clone().drop_guard();
            let proof = pow.find_proof_blocking(last_proof, token).await?;

            let mut ledger = self.ledger.lock().expect("mutex poisoned");
            let tip_proof = ledger.last_block()?.proof;
            if !pow.valid_proof(tip_proof, proof) {
                warn!("MINER - tip moved during search (proof {tip_proof}), retrying");
                continue;
            }

            if self.mining_reward > 0 {
                ledger.add_transaction(REWARD_SENDER, self.node_id.as_str(), self.mining_reward)?;
            }
            let block = ledger.mine_block(proof)?.clone();
            info!(
                "MINER - forged block #{} (proof={}, txs={})",
                block.index,
                block.proof,
                block.transactions.len()
            );
            return Ok(block);
        }
    }

    pub fn get_chain(&self) -> (Vec<Block>, usize) {
        let ledger = self.ledger.lock().expect("mutex poisoned");
        (ledger.chain().to_vec(), ledger.len())
    }

    pub fn mempool(&self) -> Vec<Transaction> {
        let ledger = self.ledger.lock().expect("mutex poisoned");
        ledger.mempool().to_vec()
    }

    /// Returns `(valid, length, difficulty)` for the local chain.
    pub fn validate(&self) -> (bool, usize, u32) {
        let ledger = self.ledger.lock().expect("mutex poisoned");
        (ledger.is_valid(), ledger.len(), ledger.difficulty())
    }

    /// Register a peer; returns how many peers are known afterwards.
    pub fn register_node(&self, address: &str) -> Result<usize> {
        let mut registry = self.registry.lock().expect("mutex poisoned");
        if registry.register(address)? {
            info!("NODES - registered peer {address}");
        }
        Ok(registry.len())
    }

    pub fn peers(&self) -> Vec<String> {
        self.registry.lock().expect("mutex poisoned").nodes()
    }

    /// Run consensus against every registered peer.
    pub async fn resolve(&self) -> (bool, Vec<Block>) {
        let peers = {
            let registry = self.registry.lock().expect("mutex poisoned");
            if registry.is_empty() {
                debug!("CONSENSUS - no registered peers");
            }
            registry.nodes()
        };
        let replaced =
            resolve_conflicts(&self.ledger, &peers, self.fetcher.as_ref(), self.peer_timeout)
                .await;
        let (chain, _) = self.get_chain();
        (replaced, chain)
    }

    /// Abort any proof search in flight.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
