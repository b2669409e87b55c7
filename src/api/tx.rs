use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::models::{MempoolResponse, NewTxRequest, NewTxResponse};
use crate::node::Node;

/// Submit a new transaction into the mempool.
#[post("/transactions/new/")]
pub async fn post_transaction(
    node: web::Data<Node>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    debug!(
        "POST /transactions/new/ - received: sender={}, recipient={}, amount={}",
        body.sender, body.recipient, body.amount
    );

    match node.submit_transaction(&body.sender, &body.recipient, body.amount) {
        Ok(index) => {
            info!("POST /transactions/new/ - queued for block #{index}");
            HttpResponse::Created().json(NewTxResponse {
                message: format!("Transaction will be added to Block {index}"),
                index,
            })
        }
        Err(e) => {
            warn!("POST /transactions/new/ - rejected: {e}");
            HttpResponse::BadRequest().body(e.to_string())
        }
    }
}

/// List pending transactions.
#[get("/mempool/")]
pub async fn get_mempool(node: web::Data<Node>) -> impl Responder {
    let transactions = node.mempool();
    HttpResponse::Ok().json(MempoolResponse {
        size: transactions.len(),
        transactions,
    })
}
