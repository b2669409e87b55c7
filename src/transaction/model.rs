use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// A value transfer waiting in the mempool or embedded in a block.
///
/// Fields are declared in lexicographic order: serde serializes structs in
/// declaration order, and block hashing depends on a fixed key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: u64,
    pub recipient: String,
    pub sender: String,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            amount,
            recipient: recipient.into(),
            sender: sender.into(),
        }
    }

    /// Basic shape checks used when the ledger runs in strict mode.
    pub fn validate(&self) -> Result<()> {
        if self.sender.trim().is_empty() {
            return Err(LedgerError::InvalidTransaction("sender required".into()));
        }
        if self.recipient.trim().is_empty() {
            return Err(LedgerError::InvalidTransaction("recipient required".into()));
        }
        if self.amount == 0 {
            return Err(LedgerError::InvalidTransaction("amount must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Transaction;

    #[test]
    fn serializes_keys_in_sorted_order() {
        let tx = Transaction::new("alice", "bob", 5);
        let json = serde_json::to_string(&tx).unwrap();
        assert_eq!(json, r#"{"amount":5,"recipient":"bob","sender":"alice"}"#);
    }

    #[test]
    fn rejects_empty_identifiers_and_zero_amount() {
        assert!(Transaction::new("  ", "bob", 1).validate().is_err());
        assert!(Transaction::new("alice", "", 1).validate().is_err());
        assert!(Transaction::new("alice", "bob", 0).validate().is_err());
        assert!(Transaction::new("alice", "bob", 1).validate().is_ok());
    }
}
