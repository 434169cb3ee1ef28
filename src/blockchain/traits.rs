use async_trait::async_trait;
use serde_json::Value;

use crate::core::errors::WalletError;

/// Anything that can list the transactions touching an address.
#[async_trait]
pub trait TransactionHistorySource: Send + Sync {
    /// Transactions for `address`, newest first, in the source's own JSON shape.
    async fn transactions(&self, address: &str) -> Result<Vec<Value>, WalletError>;

    /// Short name used in logs.
    fn source_name(&self) -> &str {
        "unknown"
    }
}
