use log::{debug, info};

use super::{Block, ProofOfWork};
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;

/// In-memory chain plus mempool. Callers share it behind a single mutex so
/// every mutation below is serialized against the others.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    mempool: Vec<Transaction>,
    pow: ProofOfWork,
    strict: bool,
}

impl Ledger {
    /// Initialize a ledger holding only the genesis block. With `strict`,
    /// transactions with empty identifiers or a zero amount are rejected.
    pub fn new(pow: ProofOfWork, strict: bool) -> Self {
        Self {
            chain: vec![Block::genesis()],
            mempool: Vec::new(),
            pow,
            strict,
        }
    }

    /// Queue a transaction; returns the index of the block that will hold it.
    pub fn add_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> Result<u64> {
        let tx = Transaction::new(sender, recipient, amount);
        if self.strict {
            tx.validate()?;
        }
        self.mempool.push(tx);
        let next_index = self.last_block()?.index + 1;
        debug!(
            "LEDGER - queued tx for block #{} (mempool size {})",
            next_index,
            self.mempool.len()
        );
        Ok(next_index)
    }

    /// Seal the current mempool into a new block linked to the tip.
    ///
    /// The proof must solve the puzzle against the current tip; otherwise the
    /// ledger is left untouched and `StaleProof` is returned.
    pub fn mine_block(&mut self, proof: u64) -> Result<&Block> {
        let last = self.last_block()?;
        if !self.pow.valid_proof(last.proof, proof) {
            return Err(LedgerError::StaleProof {
                expected_last_proof: last.proof,
                proof,
            });
        }

        let index = last.index + 1;
        let previous_hash = last.compute_hash();
        let transactions = std::mem::take(&mut self.mempool);
        let block = Block::new(index, previous_hash, proof, transactions);

        info!(
            "LEDGER - appended block #{} (proof={}, txs={})",
            block.index,
            block.proof,
            block.transactions.len()
        );
        self.chain.push(block);
        self.last_block()
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn mempool(&self) -> &[Transaction] {
        &self.mempool
    }

    /// Swap in a whole new chain (consensus). The mempool is kept as is.
    pub fn replace_chain(&mut self, chain: Vec<Block>) -> Result<()> {
        if chain.is_empty() {
            return Err(LedgerError::EmptyChain);
        }
        info!(
            "LEDGER - chain replaced: {} -> {} blocks",
            self.chain.len(),
            chain.len()
        );
        self.chain = chain;
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        super::is_valid_chain(&self.chain, &self.pow)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn pow(&self) -> ProofOfWork {
        self.pow
    }

    pub fn difficulty(&self) -> u32 {
        self.pow.difficulty()
    }
}
