//! RpcClient - Sui fullnode JSON-RPC execution client
//!
//! | Call | RPC method |
//! |------|------------|
//! | `execute_transaction` | `sui_executeTransactionBlock` (`WaitForLocalExecution`) |
//! | `wait_for_transaction` | `sui_getTransactionBlock`, polled until found |

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::cell::Cell;
use std::time::Duration;

use crate::config::WidgetConfig;
use crate::core::error::{WalletError, WalletResult};
use crate::core::signer::{ExecutionClient, ResponseOptions, TransactionResponse};

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    poll_interval: Duration,
    wait_timeout: Duration,
    next_id: Cell<u64>,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        let defaults = WidgetConfig::default();
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            poll_interval: Duration::from_millis(defaults.poll_interval_ms),
            wait_timeout: Duration::from_millis(defaults.wait_timeout_ms),
            next_id: Cell::new(1),
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(config.resolved_rpc_url())
            .with_polling(config.poll_interval_ms, config.wait_timeout_ms)
    }

    pub fn with_polling(mut self, interval_ms: u64, timeout_ms: u64) -> Self {
        self.poll_interval = Duration::from_millis(interval_ms.max(1));
        self.wait_timeout = Duration::from_millis(timeout_ms);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One JSON-RPC round trip. The outer error is transport/decoding,
    /// the inner one is an error object returned by the node.
    async fn call(&self, method: &str, params: Value) -> anyhow::Result<Result<Value, RpcErrorBody>> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let body = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params});

        let envelope: RpcEnvelope = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("{} request to {}", method, self.url))?
            .json()
            .await
            .with_context(|| format!("{} response", method))?;

        match (envelope.result, envelope.error) {
            (_, Some(error)) => Ok(Err(error)),
            (Some(result), None) => Ok(Ok(result)),
            (None, None) => Err(anyhow!("{} returned neither result nor error", method)),
        }
    }

    /// Attempts made by `wait_for_transaction`, including the first.
    fn max_polls(&self) -> u64 {
        let interval = self.poll_interval.as_millis().max(1);
        (self.wait_timeout.as_millis() / interval).max(1) as u64
    }
}

fn client_error(e: anyhow::Error) -> WalletError {
    WalletError::Client(format!("{:#}", e))
}

fn parse_response(value: Value) -> WalletResult<TransactionResponse> {
    serde_json::from_value(value)
        .map_err(|e| WalletError::Client(format!("unexpected transaction response: {}", e)))
}

#[async_trait(?Send)]
impl ExecutionClient for RpcClient {
    async fn execute_transaction(
        &self,
        bytes: &str,
        signature: &str,
        options: ResponseOptions,
    ) -> WalletResult<TransactionResponse> {
        let params = json!([bytes, [signature], options, "WaitForLocalExecution"]);
        match self
            .call("sui_executeTransactionBlock", params)
            .await
            .map_err(client_error)?
        {
            Ok(result) => parse_response(result),
            Err(error) => Err(WalletError::Client(format!("{} ({})", error.message, error.code))),
        }
    }

    async fn wait_for_transaction(
        &self,
        digest: &str,
        options: ResponseOptions,
    ) -> WalletResult<TransactionResponse> {
        let polls = self.max_polls();
        for attempt in 1..=polls {
            match self
                .call("sui_getTransactionBlock", json!([digest, options]))
                .await
                .map_err(client_error)?
            {
                Ok(result) => return parse_response(result),
                Err(error) => {
                    tracing::debug!(%digest, attempt, code = error.code, "transaction not visible yet");
                }
            }
            if attempt < polls {
                sleep(self.poll_interval).await;
            }
        }
        Err(WalletError::Client(format!(
            "transaction {} not found within {}ms",
            digest,
            self.wait_timeout.as_millis()
        )))
    }
}

#[cfg(not(feature = "wasm"))]
async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(feature = "wasm")]
async fn sleep(duration: Duration) {
    crate::wasm::sleep(duration).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_budget_from_config() {
        let config = WidgetConfig::new().with_rpc_url("http://127.0.0.1:9000");
        let client = RpcClient::from_config(&config);
        assert_eq!(client.url(), "http://127.0.0.1:9000");
        assert_eq!(client.max_polls(), 60);
    }

    #[test]
    fn poll_budget_is_at_least_one() {
        let client = RpcClient::new("http://x").with_polling(5_000, 10);
        assert_eq!(client.max_polls(), 1);
    }

    #[test]
    fn error_envelope_parses() {
        let envelope: RpcEnvelope = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"Could not find the referenced transaction"}}"#,
        )
        .unwrap();
        assert!(envelope.result.is_none());
        assert_eq!(envelope.error.unwrap().code, -32602);
    }

    #[test]
    fn transaction_response_keeps_extra_fields() {
        let response = parse_response(serde_json::json!({
            "digest": "9xYz",
            "effects": {"status": {"status": "success"}},
            "objectChanges": [],
            "checkpoint": "42"
        }))
        .unwrap();
        assert_eq!(response.digest, "9xYz");
        assert_eq!(response.object_changes, Some(serde_json::json!([])));
        assert_eq!(response.extra["checkpoint"], "42");
    }
}
