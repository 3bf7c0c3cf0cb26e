//! Shared JSON-RPC utilities for talking to the wallet endpoint.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Default timeout for RPC requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Failure modes of a single JSON-RPC call.
#[derive(Debug, thiserror::Error)]
pub enum RpcCallError {
    /// The request never produced a well-formed JSON-RPC response.
    #[error("{0}")]
    Transport(String),
    /// The endpoint answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
}

/// Create an HTTP client configured for JSON-RPC requests.
pub fn create_client() -> Result<reqwest::Client, RpcCallError> {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(|e| RpcCallError::Transport(format!("failed to create HTTP client: {e}")))
}

/// Make a JSON-RPC call and deserialize the result.
///
/// # Arguments
/// * `client` - The HTTP client to use
/// * `url` - The RPC endpoint URL
/// * `method` - The RPC method name
/// * `params` - The method parameters
///
/// # Returns
/// The deserialized result, or an [`RpcCallError`] distinguishing transport
/// failures from error responses (the wallet boundary needs the error code).
pub async fn json_rpc_call<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    method: &str,
    params: Vec<Value>,
) -> Result<T, RpcCallError> {
    let response = client
        .post(url)
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        }))
        .send()
        .await
        .map_err(|e| RpcCallError::Transport(format!("failed to send {method} request: {e}")))?;

    let body: Value = response
        .json()
        .await
        .map_err(|e| RpcCallError::Transport(format!("failed to parse {method} response: {e}")))?;

    if let Some(error) = body.get("error") {
        return Err(RpcCallError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
        });
    }

    let result = body
        .get("result")
        .cloned()
        .ok_or_else(|| RpcCallError::Transport(format!("no result in {method} response")))?;

    serde_json::from_value(result)
        .map_err(|e| RpcCallError::Transport(format!("failed to deserialize {method} result: {e}")))
}

/// Decode a 0x-prefixed hex quantity (e.g. an `eth_chainId` result) into a u64.
pub fn parse_hex_u64(value: &str) -> Result<u64, std::num::ParseIntError> {
    u64::from_str_radix(value.trim_start_matches("0x"), 16)
}
