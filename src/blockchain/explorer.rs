//! Block explorer client and the per-address history fan-out.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::blockchain::traits::TransactionHistorySource;
use crate::core::config::ExplorerConfig;
use crate::core::errors::{Result, WalletError};

const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(200);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Run `operation` up to `max_retries + 1` times, sleeping between attempts.
/// Non-retryable errors are returned immediately.
pub async fn retry<F, Fut, T>(mut operation: F, max_retries: u32, delay: Duration) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut current_delay = delay;
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() || attempt >= max_retries => return Err(e),
            Err(e) => {
                attempt += 1;
                info!(
                    "Request failed ({}), retry {}/{} in {:?}",
                    e, attempt, max_retries, current_delay
                );
                tokio::time::sleep(current_delay).await;
                current_delay = (current_delay * 2).min(MAX_RETRY_DELAY);
            }
        }
    }
}

/// Esplora-style REST client (`GET {base}/address/{address}/txs`).
#[derive(Debug, Clone)]
pub struct BlockExplorerClient {
    base_url: String,
    http_client: HttpClient,
    max_retries: u32,
}

impl BlockExplorerClient {
    pub fn new(config: &ExplorerConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WalletError::ConfigError(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            max_retries: config.max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_once(&self, address: &str) -> Result<Vec<Value>> {
        let url = format!("{}/address/{}/txs", self.base_url, address);
        debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WalletError::ExternalService(format!(
                "explorer returned {} for {}",
                status, address
            )));
        }

        match response.json::<Value>().await? {
            Value::Array(txs) => Ok(txs),
            other => Err(WalletError::ExternalService(format!(
                "expected a JSON array of transactions, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait::async_trait]
impl TransactionHistorySource for BlockExplorerClient {
    async fn transactions(&self, address: &str) -> Result<Vec<Value>> {
        retry(|| self.fetch_once(address), self.max_retries, INITIAL_RETRY_DELAY).await
    }

    fn source_name(&self) -> &str {
        &self.base_url
    }
}

/// Look up every address concurrently under one shared deadline.
///
/// The output has one entry per input address, in input order. A failed or
/// late lookup only affects its own entry.
pub async fn fetch_histories<S>(
    source: &S,
    addresses: &[String],
    overall_timeout: Duration,
) -> Vec<(String, Result<Vec<Value>>)>
where
    S: TransactionHistorySource + ?Sized,
{
    let deadline = Instant::now() + overall_timeout;
    info!(
        "Fetching history for {} addresses from {} (deadline {:?})",
        addresses.len(),
        source.source_name(),
        overall_timeout
    );

    let lookups = addresses.iter().map(|address| async move {
        let result = match timeout_at(deadline, source.transactions(address)).await {
            Ok(result) => result,
            Err(_) => Err(WalletError::Timeout(format!(
                "history lookup exceeded {:?}",
                overall_timeout
            ))),
        };
        if let Err(e) = &result {
            warn!("History lookup for {} failed: {}", address, e);
        }
        (address.clone(), result)
    });

    join_all(lookups).await
}
