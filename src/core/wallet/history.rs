use std::time::Duration;

use super::{AddressHistory, Wallet};
use crate::blockchain::explorer::fetch_histories;
use crate::blockchain::traits::TransactionHistorySource;

impl Wallet {
    /// Transaction history for each address, looked up concurrently.
    ///
    /// Failures are reported per address; one slow or failing lookup never
    /// hides the others.
    pub async fn history<S>(
        &self,
        source: &S,
        addresses: &[String],
        overall_timeout: Duration,
    ) -> Vec<AddressHistory>
    where
        S: TransactionHistorySource + ?Sized,
    {
        fetch_histories(source, addresses, overall_timeout)
            .await
            .into_iter()
            .map(|(address, result)| match result {
                Ok(transactions) => AddressHistory {
                    address,
                    transactions: Some(transactions),
                    error: None,
                },
                Err(e) => AddressHistory {
                    address,
                    transactions: None,
                    error: Some(e.to_string()),
                },
            })
            .collect()
    }
}
