use std::collections::BTreeSet;

use reqwest::Url;

use crate::error::{LedgerError, Result};

/// Registered peer addresses, stored as `host[:port]`.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: BTreeSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and insert; returns `true` when the peer was not known yet.
    pub fn register(&mut self, address: &str) -> Result<bool> {
        let normalized = normalize_address(address)?;
        Ok(self.nodes.insert(normalized))
    }

    pub fn nodes(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// `http://10.0.0.2:5000/path` -> `10.0.0.2:5000`; bare `host:port` is kept.
pub fn normalize_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidNodeAddress("empty address".into()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let url = Url::parse(&with_scheme)
        .map_err(|e| LedgerError::InvalidNodeAddress(format!("{trimmed}: {e}")))?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| LedgerError::InvalidNodeAddress(format!("{trimmed}: missing host")))?;

    // `Url` drops the port when it equals the scheme default; keep what was given.
    Ok(match url.port_or_known_default() {
        Some(port) if trimmed.contains(&format!(":{port}")) => format!("{host}:{port}"),
        _ => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{NodeRegistry, normalize_address};

    #[test]
    fn strips_scheme_and_path() {
        assert_eq!(
            normalize_address("http://192.168.0.5:5000/chain").unwrap(),
            "192.168.0.5:5000"
        );
        assert_eq!(normalize_address("https://peer.local:443").unwrap(), "peer.local:443");
    }

    #[test]
    fn keeps_bare_host_port() {
        assert_eq!(normalize_address("localhost:5001").unwrap(), "localhost:5001");
        assert_eq!(normalize_address(" peer.local ").unwrap(), "peer.local");
    }

    #[test]
    fn rejects_garbage() {
        assert!(normalize_address("").is_err());
        assert!(normalize_address("   ").is_err());
        assert!(normalize_address("http://").is_err());
    }

    #[test]
    fn deduplicates_equivalent_forms() {
        let mut reg = NodeRegistry::new();
        assert!(reg.register("http://127.0.0.1:5001").unwrap());
        assert!(!reg.register("127.0.0.1:5001").unwrap());
        assert!(reg.register("127.0.0.1:5002").unwrap());
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.nodes(), vec!["127.0.0.1:5001", "127.0.0.1:5002"]);
    }
}
