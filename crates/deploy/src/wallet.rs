//! Wallet capability boundary.
//!
//! The wallet holds the private keys, signs and broadcasts transactions, and
//! manages the active chain. It is injected as a trait so the orchestration
//! can be exercised without a real wallet present.

use std::future::Future;

use alloy_core::primitives::{Address, B256, Bytes};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::network::NetworkProfile;
use crate::rpc::{self, RpcCallError};

/// EIP-3326 provider error code for a chain the wallet does not know.
const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;
/// JSON-RPC error code for an unimplemented method.
const METHOD_NOT_FOUND_CODE: i64 = -32601;
/// JSON-RPC error code for a malformed payload.
const PARSE_ERROR_CODE: i64 = -32700;

/// Transaction request submitted through the wallet capability.
///
/// A request without `to` is a contract creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    pub data: Bytes,
}

/// The receipt fields the orchestrator inspects after confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    /// Address of the created contract; absent for plain calls.
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// Post-Byzantium execution status, `0x1` on success.
    #[serde(default)]
    pub status: Option<String>,
}

impl TransactionReceipt {
    /// Whether the transaction executed without reverting.
    pub fn succeeded(&self) -> bool {
        self.status.as_deref() == Some("0x1")
    }
}

/// External wallet capability: account selection, chain management, and
/// transaction signing/broadcast.
pub trait Wallet: Send + Sync {
    /// Request account access (EIP-1102); first account becomes the session.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>>> + Send;

    /// The wallet's active chain id.
    fn chain_id(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Switch the active chain (EIP-3326). Fails with
    /// [`Error::UnrecognizedChain`] when the wallet does not know the chain.
    fn switch_chain(&self, chain_id: u64) -> impl Future<Output = Result<()>> + Send;

    /// Register a network with the wallet (EIP-3085). A successful add also
    /// switches the active chain.
    fn add_chain(&self, profile: &NetworkProfile) -> impl Future<Output = Result<()>> + Send;

    /// Sign and broadcast a transaction, returning its hash.
    fn send_transaction(
        &self,
        tx: &TransactionRequest,
    ) -> impl Future<Output = Result<B256>> + Send;

    /// Fetch the receipt of a submitted transaction, `None` until included.
    fn transaction_receipt(
        &self,
        tx_hash: B256,
    ) -> impl Future<Output = Result<Option<TransactionReceipt>>> + Send;
}

/// Wallet backed by a JSON-RPC endpoint speaking the EIP-1102/3326/3085
/// wallet methods (a wallet bridge, or a dev node with unlocked accounts).
pub struct JsonRpcWallet {
    client: reqwest::Client,
    url: Url,
}

impl JsonRpcWallet {
    pub fn new(url: Url) -> Result<Self> {
        let client = rpc::create_client().map_err(|e| Error::WalletUnavailable(e.to_string()))?;
        Ok(Self { client, url })
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<T, RpcCallError> {
        rpc::json_rpc_call(&self.client, self.url.as_str(), method, params).await
    }
}

/// Map an RPC-level failure onto the wallet error kinds: an endpoint that
/// cannot be reached is an absent capability.
fn wallet_error(err: RpcCallError) -> Error {
    match err {
        RpcCallError::Transport(message) => Error::WalletUnavailable(message),
        RpcCallError::Rpc { code, message } => Error::WalletRpc { code, message },
    }
}

impl Wallet for JsonRpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        match self.call("eth_requestAccounts", vec![]).await {
            Ok(accounts) => Ok(accounts),
            // Dev nodes without the EIP-1102 prompt still expose eth_accounts.
            Err(RpcCallError::Rpc { code: METHOD_NOT_FOUND_CODE, .. }) => {
                self.call("eth_accounts", vec![]).await.map_err(wallet_error)
            }
            Err(err) => Err(wallet_error(err)),
        }
    }

    async fn chain_id(&self) -> Result<u64> {
        let quantity: String = self
            .call("eth_chainId", vec![])
            .await
            .map_err(wallet_error)?;
        rpc::parse_hex_u64(&quantity).map_err(|e| Error::WalletRpc {
            code: PARSE_ERROR_CODE,
            message: format!("malformed eth_chainId result '{quantity}': {e}"),
        })
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        let params = vec![serde_json::json!({ "chainId": format!("{chain_id:#x}") })];
        match self
            .call::<serde_json::Value>("wallet_switchEthereumChain", params)
            .await
        {
            Ok(_) => Ok(()),
            Err(RpcCallError::Rpc { code: UNRECOGNIZED_CHAIN_CODE, .. }) => {
                Err(Error::UnrecognizedChain { chain_id })
            }
            Err(err) => Err(wallet_error(err)),
        }
    }

    async fn add_chain(&self, profile: &NetworkProfile) -> Result<()> {
        self.call::<serde_json::Value>("wallet_addEthereumChain", vec![profile.add_chain_params()])
            .await
            .map(|_| ())
            .map_err(wallet_error)
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256> {
        self.call("eth_sendTransaction", vec![serde_json::json!(tx)])
            .await
            .map_err(wallet_error)
    }

    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<TransactionReceipt>> {
        self.call("eth_getTransactionReceipt", vec![serde_json::json!(tx_hash)])
            .await
            .map_err(wallet_error)
    }
}
