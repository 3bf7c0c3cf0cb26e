//! Deployment orchestration context and the contract-creation driver.

use std::time::{Duration, Instant};

use alloy_core::primitives::{Address, B256, U256};
use alloy_core::sol_types::SolValue;

use crate::compiler::{self, CompiledArtifact, Compiler};
use crate::error::{Error, Result};
use crate::network::{NetworkProfile, Session};
use crate::sources;
use crate::wallet::{TransactionReceipt, TransactionRequest, Wallet};

/// Interval between receipt polls while waiting for confirmation.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Maximum time to wait for a submitted transaction to confirm.
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

/// The two contract templates this tool deploys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ContractKind {
    Token,
    Nft,
}

/// Reference to a deployed contract of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployedContractRef {
    pub kind: ContractKind,
    pub address: Address,
}

/// Constructor parameters for the fungible token template.
#[derive(Debug, Clone)]
pub struct TokenParams {
    pub name: String,
    pub symbol: String,
    /// Unscaled supply; the contract multiplies by 10^decimals itself.
    pub initial_supply: U256,
}

/// Constructor parameters for the NFT template.
#[derive(Debug, Clone)]
pub struct NftParams {
    pub name: String,
    pub symbol: String,
}

/// Main orchestrator for the connect -> compile -> deploy -> mint flow.
///
/// Owns the wallet and compiler capabilities plus the per-process state: the
/// active session and the last-deployed-address slot of each contract kind.
/// One `Deployer` per logical flow; nothing is persisted across processes.
pub struct Deployer<W, C> {
    pub(crate) wallet: W,
    pub(crate) compiler: C,
    pub(crate) network: NetworkProfile,
    pub(crate) session: Option<Session>,
    pub(crate) last_token: Option<Address>,
    pub(crate) last_nft: Option<Address>,
    receipt_timeout: Duration,
    receipt_poll_interval: Duration,
}

impl<W: Wallet, C: Compiler> Deployer<W, C> {
    pub fn new(wallet: W, compiler: C, network: NetworkProfile) -> Self {
        Self {
            wallet,
            compiler,
            network,
            session: None,
            last_token: None,
            last_nft: None,
            receipt_timeout: RECEIPT_TIMEOUT,
            receipt_poll_interval: RECEIPT_POLL_INTERVAL,
        }
    }

    /// Override how long and how often to poll for confirmation.
    pub fn with_confirmation_timing(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.receipt_timeout = timeout;
        self.receipt_poll_interval = poll_interval;
        self
    }

    /// The configured network profile.
    pub fn network(&self) -> &NetworkProfile {
        &self.network
    }

    /// The active session, if connected.
    pub fn session(&self) -> Option<Session> {
        self.session
    }

    /// The wallet capability.
    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    /// The most recently deployed address of the given kind.
    pub fn last_deployed(&self, kind: ContractKind) -> Option<Address> {
        match kind {
            ContractKind::Token => self.last_token,
            ContractKind::Nft => self.last_nft,
        }
    }

    /// Compile and deploy the token template.
    ///
    /// The initial supply is handed to the constructor unscaled; the contract
    /// applies its own decimals.
    pub async fn deploy_token(&mut self, params: &TokenParams) -> Result<DeployedContractRef> {
        self.ensure_connected().await?;
        self.assert_correct_network().await?;

        tracing::info!(source = sources::TOKEN_SOURCE_NAME, "Compiling token contract...");
        let artifact = compiler::compile_source(
            &self.compiler,
            sources::TOKEN_SOURCE_NAME,
            sources::TOKEN_SOURCE,
        )?;
        tracing::info!(contract = %artifact.contract_name, "Compiled");

        let constructor_args = (
            params.name.clone(),
            params.symbol.clone(),
            params.initial_supply,
        )
            .abi_encode_params();
        let address = self
            .deploy_contract(ContractKind::Token, &artifact, constructor_args)
            .await?;
        self.last_token = Some(address);

        Ok(DeployedContractRef {
            kind: ContractKind::Token,
            address,
        })
    }

    /// Compile and deploy the NFT template.
    pub async fn deploy_nft(&mut self, params: &NftParams) -> Result<DeployedContractRef> {
        self.ensure_connected().await?;
        self.assert_correct_network().await?;

        tracing::info!(source = sources::NFT_SOURCE_NAME, "Compiling NFT contract...");
        let artifact = compiler::compile_source(
            &self.compiler,
            sources::NFT_SOURCE_NAME,
            sources::NFT_SOURCE,
        )?;
        tracing::info!(contract = %artifact.contract_name, "Compiled");

        let constructor_args = (params.name.clone(), params.symbol.clone()).abi_encode_params();
        let address = self
            .deploy_contract(ContractKind::Nft, &artifact, constructor_args)
            .await?;
        self.last_nft = Some(address);

        Ok(DeployedContractRef {
            kind: ContractKind::Nft,
            address,
        })
    }

    /// Submit a contract-creation transaction and wait for its address.
    ///
    /// The transaction hash is reported as soon as the wallet accepts the
    /// submission, before confirmation.
    async fn deploy_contract(
        &mut self,
        kind: ContractKind,
        artifact: &CompiledArtifact,
        constructor_args: Vec<u8>,
    ) -> Result<Address> {
        let session = self.require_session()?;

        let mut data = artifact.bytecode.to_vec();
        data.extend_from_slice(&constructor_args);
        let tx = TransactionRequest {
            from: session.account,
            to: None,
            data: data.into(),
        };

        let tx_hash = self
            .wallet
            .send_transaction(&tx)
            .await
            .map_err(deployment_failed)?;
        tracing::info!(kind = %kind, tx_hash = %tx_hash, "Deploy transaction sent");

        let receipt = self
            .wait_for_receipt(tx_hash)
            .await
            .map_err(deployment_failed)?;
        if !receipt.succeeded() {
            return Err(Error::Deployment(format!("transaction {tx_hash} reverted")));
        }
        let address = receipt.contract_address.ok_or_else(|| {
            Error::Deployment(format!(
                "transaction {tx_hash} confirmed without a contract address"
            ))
        })?;

        match self.network.explorer_address_url(&address) {
            Some(explorer) => {
                tracing::info!(kind = %kind, address = %address, explorer = %explorer, "Contract deployed")
            }
            None => tracing::info!(kind = %kind, address = %address, "Contract deployed"),
        }

        Ok(address)
    }

    pub(crate) fn require_session(&self) -> Result<Session> {
        self.session
            .ok_or_else(|| Error::WalletUnavailable("no active session".to_string()))
    }

    /// Poll for the receipt of a submitted transaction until it confirms or
    /// the waiting window elapses.
    pub(crate) async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TransactionReceipt> {
        let start = Instant::now();
        loop {
            if let Some(receipt) = self.wallet.transaction_receipt(tx_hash).await? {
                return Ok(receipt);
            }
            if start.elapsed() > self.receipt_timeout {
                return Err(Error::ConfirmationTimeout {
                    tx_hash,
                    waited: self.receipt_timeout,
                });
            }
            tokio::time::sleep(self.receipt_poll_interval).await;
        }
    }
}

fn deployment_failed(err: Error) -> Error {
    Error::Deployment(err.to_string())
}
