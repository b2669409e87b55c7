use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::error::{LedgerError, Result};

/// Chain snapshot as reported by a peer's `/chain/` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl PeerChain {
    /// Reject payloads whose declared length disagrees with their content.
    pub fn check(self, peer: &str) -> Result<Self> {
        if self.chain.is_empty() {
            return Err(LedgerError::MalformedPeerResponse {
                peer: peer.to_string(),
                reason: "empty chain".into(),
            });
        }
        if self.length != self.chain.len() {
            return Err(LedgerError::MalformedPeerResponse {
                peer: peer.to_string(),
                reason: format!(
                    "declared length {} but {} blocks",
                    self.length,
                    self.chain.len()
                ),
            });
        }
        Ok(self)
    }
}

/// Network collaborator that retrieves a peer's chain.
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain>;
}

/// Fetches `http://{peer}/api/v1/chain/` over HTTP.
pub struct HttpChainFetcher {
    client: reqwest::Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| LedgerError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain> {
        let url = format!("http://{peer}/api/v1/chain/");
        debug!("CONSENSUS - GET {url}");

        let unreachable_err = |reason: String| LedgerError::PeerUnreachable {
            peer: peer.to_string(),
            reason,
        };

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unreachable_err(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(unreachable_err(format!("status {}", resp.status())));
        }

        let body: PeerChain = resp
            .json()
            .await
            .map_err(|e| LedgerError::MalformedPeerResponse {
                peer: peer.to_string(),
                reason: e.to_string(),
            })?;
        body.check(peer)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChainFetcher, HttpChainFetcher, PeerChain};
    use crate::blockchain::Block;
    use crate::error::LedgerError;
    use actix_web::dev::ServerHandle;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, HttpServer, web};
    use std::time::Duration;

    /// Serve a fixed response on `/api/v1/chain/`; returns `host:port` and a stop handle.
    fn serve_chain(status: StatusCode, body: String) -> (String, ServerHandle) {
        let server = HttpServer::new(move || {
            let body = body.clone();
            App::new().route(
                "/api/v1/chain/",
                web::get().to(move || {
                    let body = body.clone();
                    async move {
                        HttpResponse::build(status)
                            .content_type("application/json")
                            .body(body)
                    }
                }),
            )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        (addr.to_string(), handle)
    }

    fn fetcher() -> HttpChainFetcher {
        HttpChainFetcher::new(Duration::from_secs(2)).unwrap()
    }

    #[actix_web::test]
    async fn fetches_valid_chain() {
        let body = serde_json::json!({ "chain": [Block::genesis()], "length": 1 }).to_string();
        let (peer, handle) = serve_chain(StatusCode::OK, body);

        let pc = fetcher().fetch_chain(&peer).await.unwrap();
        assert_eq!(pc.length, 1);
        assert_eq!(pc.chain[0].index, 1);
        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn server_error_is_unreachable() {
        let (peer, handle) = serve_chain(StatusCode::INTERNAL_SERVER_ERROR, "{}".into());

        let err = fetcher().fetch_chain(&peer).await.unwrap_err();
        assert!(matches!(err, LedgerError::PeerUnreachable { peer: p, .. } if p == peer));
        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn junk_body_is_malformed() {
        let (peer, handle) = serve_chain(StatusCode::OK, "not json at all".into());

        let err = fetcher().fetch_chain(&peer).await.unwrap_err();
        assert!(matches!(err, LedgerError::MalformedPeerResponse { .. }));
        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn inconsistent_length_is_malformed() {
        let body = serde_json::json!({ "chain": [Block::genesis()], "length": 4 }).to_string();
        let (peer, handle) = serve_chain(StatusCode::OK, body);

        let err = fetcher().fetch_chain(&peer).await.unwrap_err();
        assert!(matches!(err, LedgerError::MalformedPeerResponse { .. }));
        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn closed_port_is_unreachable() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        // Listener dropped: nothing accepts on this port any more.
        let err = fetcher().fetch_chain(&addr.to_string()).await.unwrap_err();
        assert!(matches!(err, LedgerError::PeerUnreachable { .. }));
    }

    #[test]
    fn client_setup_error_names_no_peer() {
        let err = LedgerError::HttpClient("tls backend".into());
        assert_eq!(err.to_string(), "http client setup failed: tls backend");
    }

    #[test]
    fn length_mismatch_is_malformed() {
        let pc = PeerChain {
            chain: vec![Block::genesis()],
            length: 3,
        };
        assert!(matches!(
            pc.check("p:1"),
            Err(LedgerError::MalformedPeerResponse { .. })
        ));
    }

    #[test]
    fn empty_chain_is_malformed() {
        let pc = PeerChain {
            chain: vec![],
            length: 0,
        };
        assert!(pc.check("p:1").is_err());
    }

    #[test]
    fn decodes_chain_endpoint_payload() {
        let json = serde_json::json!({
            "chain": [Block::genesis()],
            "length": 1,
        });
        let pc: PeerChain = serde_json::from_value(json).unwrap();
        assert_eq!(pc.check("p:1").unwrap().length, 1);
    }
}
