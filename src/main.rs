mod api;
mod blockchain;
mod config;
mod error;
mod network;
mod node;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{info, warn};
use std::sync::Arc;

use config::NodeConfig;
use network::HttpChainFetcher;
use node::Node;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env();
    let fetcher = HttpChainFetcher::new(config.peer_timeout).map_err(std::io::Error::other)?;
    let node = Node::new(&config, Arc::new(fetcher));

    for peer in &config.peers {
        if let Err(e) = node.register_node(peer) {
            warn!("NODES - ignoring bootstrap peer {peer:?}: {e}");
        }
    }

    info!(
        "node {} (difficulty {}, {} peers)",
        node.node_id,
        config.difficulty,
        node.peers().len()
    );
    println!(
        "⛓️ Starting ledger node at http://{}:{}",
        config.host, config.port
    );

    let state = web::Data::new(node);
    let server_state = state.clone();

    let result = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    state.shutdown();
    result
}
