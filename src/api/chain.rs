use actix_web::{HttpResponse, Responder, get, web};
use log::warn;

use super::models::{ChainResponse, MineResponse, ValidateResponse};
use crate::error::LedgerError;
use crate::node::Node;

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(node: web::Data<Node>) -> impl Responder {
    let (chain, length) = node.get_chain();
    HttpResponse::Ok().json(ChainResponse { chain, length })
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(node: web::Data<Node>) -> impl Responder {
    let (valid, length, difficulty) = node.validate();
    HttpResponse::Ok().json(ValidateResponse {
        valid,
        length,
        difficulty,
    })
}

/// Mine the next block:
/// - Solve PoW against the current tip (off the request thread)
/// - Credit the mining reward to this node
/// - Seal the mempool into the new block
#[get("/mine/")]
pub async fn mine_block(node: web::Data<Node>) -> impl Responder {
    match node.mine().await {
        Ok(block) => HttpResponse::Ok().json(MineResponse {
            message: "New Block Forged".to_string(),
            index: block.index,
            transactions: block.transactions,
            proof: block.proof,
            previous_hash: block.previous_hash,
        }),
        Err(LedgerError::MiningCancelled) => {
            HttpResponse::ServiceUnavailable().body("node is shutting down")
        }
        Err(e) => {
            warn!("MINER - failed: {e}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}
