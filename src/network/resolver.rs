use std::sync::Mutex;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info, warn};

use super::fetch::{ChainFetcher, PeerChain};
use crate::blockchain::{Block, Ledger, ProofOfWork, is_valid_chain};
use crate::error::{LedgerError, Result};

/// Pick the longest valid chain strictly longer than `local_len`.
///
/// Scans every candidate before deciding; failed fetches and invalid chains
/// are logged and skipped. Ties keep the first candidate seen.
pub fn select_longest_valid(
    local_len: usize,
    candidates: Vec<(String, Result<PeerChain>)>,
    pow: &ProofOfWork,
) -> Option<(String, Vec<Block>)> {
    let mut best: Option<(String, Vec<Block>)> = None;
    let mut max_len = local_len;

    for (peer, fetched) in candidates {
        let peer_chain = match fetched {
            Ok(pc) => pc,
            Err(e) => {
                warn!("CONSENSUS - skipping peer {peer}: {e}");
                continue;
            }
        };

        let length = peer_chain.chain.len();
        if length <= max_len {
            debug!("CONSENSUS - peer {peer} length {length} not longer than {max_len}");
            continue;
        }
        if !is_valid_chain(&peer_chain.chain, pow) {
            let rejected = LedgerError::InvalidChainRejected {
                peer: peer.clone(),
                length,
            };
            warn!("CONSENSUS - skipping peer {peer}: {rejected}");
            continue;
        }

        debug!("CONSENSUS - new best candidate {peer} (length {length})");
        max_len = length;
        best = Some((peer, peer_chain.chain));
    }

    best
}

/// Query every peer concurrently, then replace the local chain if a longer
/// valid one was found. Never fails: peer errors only cause that peer to be
/// skipped. Returns whether the chain was replaced.
pub async fn resolve_conflicts(
    ledger: &Mutex<Ledger>,
    peers: &[String],
    fetcher: &dyn ChainFetcher,
    timeout: Duration,
) -> bool {
    let (local_len, pow) = {
        let l = ledger.lock().expect("mutex poisoned");
        (l.len(), l.pow())
    };

    let fetches = peers.iter().map(|peer| async move {
        let fetched = match tokio::time::timeout(timeout, fetcher.fetch_chain(peer)).await {
            Ok(result) => result,
            Err(_) => Err(LedgerError::PeerUnreachable {
                peer: peer.clone(),
                reason: format!("timed out after {} ms", timeout.as_millis()),
            }),
        };
        (peer.clone(), fetched)
    });
    let candidates = join_all(fetches).await;

    let Some((peer, chain)) = select_longest_valid(local_len, candidates, &pow) else {
        debug!("CONSENSUS - local chain ({local_len} blocks) is authoritative");
        return false;
    };

    let mut l = ledger.lock().expect("mutex poisoned");
    // The local chain may have grown while peers were being queried.
    if chain.len() <= l.len() {
        info!(
            "CONSENSUS - candidate from {peer} ({} blocks) overtaken by local chain ({} blocks)",
            chain.len(),
            l.len()
        );
        return false;
    }

    let new_len = chain.len();
    match l.replace_chain(chain) {
        Ok(()) => {
            info!("CONSENSUS - adopted chain from {peer} ({new_len} blocks)");
            true
        }
        Err(e) => {
            warn!("CONSENSUS - could not adopt chain from {peer}: {e}");
            false
        }
    }
}
