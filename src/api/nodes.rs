use actix_web::{HttpResponse, Responder, get, post, web};
use log::warn;

use super::models::{RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};
use crate::node::Node;

/// Register one or more peers.
#[post("/nodes/register/")]
pub async fn register_nodes(
    node: web::Data<Node>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    if body.nodes.is_empty() {
        return HttpResponse::BadRequest().body("Error: please supply a valid list of nodes");
    }

    for address in &body.nodes {
        if let Err(e) = node.register_node(address) {
            warn!("NODES - rejected {address:?}: {e}");
            return HttpResponse::BadRequest().body(e.to_string());
        }
    }

    HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added".to_string(),
        total_nodes: node.peers(),
    })
}

/// Run consensus against the registered peers.
#[get("/nodes/resolve/")]
pub async fn resolve_nodes(node: web::Data<Node>) -> impl Responder {
    let (replaced, chain) = node.resolve().await;
    let message = if replaced {
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };
    HttpResponse::Ok().json(ResolveResponse {
        message: message.to_string(),
        replaced,
        chain,
    })
}
