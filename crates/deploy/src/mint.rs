//! Mint drivers for the deployed token and NFT contracts.

use alloy_core::primitives::{Address, B256, U256};

use crate::compiler::Compiler;
use crate::deployer::{ContractKind, Deployer};
use crate::error::{Error, Result};
use crate::wallet::{TransactionRequest, Wallet};

/// Selector of `mint(address,uint256)`.
const MINT_TOKEN_SELECTOR: [u8; 4] = [0x40, 0xc1, 0x0f, 0x19];
/// Selector of `mint(address)`.
const MINT_NFT_SELECTOR: [u8; 4] = [0x6a, 0x62, 0x78, 0x42];

/// Parameters for a token mint.
#[derive(Debug, Clone)]
pub struct MintTokenParams {
    /// Explicit contract address; falls back to the last deployed token.
    pub contract: Option<Address>,
    /// Recipient; falls back to the connected account.
    pub to: Option<Address>,
    /// Unscaled amount; the contract multiplies by 10^decimals itself.
    pub amount: U256,
}

/// Parameters for an NFT mint.
#[derive(Debug, Clone)]
pub struct MintNftParams {
    /// Explicit contract address; falls back to the last deployed NFT.
    pub contract: Option<Address>,
    /// Recipient; falls back to the connected account.
    pub to: Option<Address>,
}

impl<W: Wallet, C: Compiler> Deployer<W, C> {
    /// Call `mint(to, amount)` on a deployed token contract.
    ///
    /// The target address is resolved before any wallet interaction, so a
    /// missing address never costs a connection prompt.
    pub async fn mint_token(&mut self, params: &MintTokenParams) -> Result<B256> {
        let contract = params
            .contract
            .or(self.last_token)
            .ok_or(Error::MissingAddress(ContractKind::Token))?;

        self.ensure_connected().await?;
        self.assert_correct_network().await?;

        let session = self.require_session()?;
        let to = params.to.unwrap_or(session.account);
        let data = encode_mint_token(to, params.amount);
        self.submit_mint(ContractKind::Token, contract, data).await
    }

    /// Call `mint(to)` on a deployed NFT contract.
    ///
    /// The contract returns the new token id, which is not surfaced beyond
    /// the success confirmation.
    pub async fn mint_nft(&mut self, params: &MintNftParams) -> Result<B256> {
        let contract = params
            .contract
            .or(self.last_nft)
            .ok_or(Error::MissingAddress(ContractKind::Nft))?;

        self.ensure_connected().await?;
        self.assert_correct_network().await?;

        let session = self.require_session()?;
        let to = params.to.unwrap_or(session.account);
        let data = encode_mint_nft(to);
        self.submit_mint(ContractKind::Nft, contract, data).await
    }

    async fn submit_mint(
        &mut self,
        kind: ContractKind,
        contract: Address,
        data: Vec<u8>,
    ) -> Result<B256> {
        let session = self.require_session()?;
        let tx = TransactionRequest {
            from: session.account,
            to: Some(contract),
            data: data.into(),
        };

        let tx_hash = self
            .wallet
            .send_transaction(&tx)
            .await
            .map_err(mint_failed)?;
        tracing::info!(kind = %kind, contract = %contract, tx_hash = %tx_hash, "Mint transaction sent");

        let receipt = self.wait_for_receipt(tx_hash).await.map_err(mint_failed)?;
        if !receipt.succeeded() {
            return Err(Error::Mint(format!("transaction {tx_hash} reverted")));
        }

        tracing::info!(kind = %kind, contract = %contract, "Minted");
        Ok(tx_hash)
    }
}

fn mint_failed(err: Error) -> Error {
    Error::Mint(err.to_string())
}

/// ABI-encode a `mint(address,uint256)` call.
fn encode_mint_token(to: Address, amount: U256) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 64);
    data.extend_from_slice(&MINT_TOKEN_SELECTOR);
    data.extend_from_slice(&pad_address(to));
    data.extend_from_slice(&amount.to_be_bytes::<32>());
    data
}

/// ABI-encode a `mint(address)` call.
fn encode_mint_nft(to: Address) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 32);
    data.extend_from_slice(&MINT_NFT_SELECTOR);
    data.extend_from_slice(&pad_address(to));
    data
}

/// Left-pad an address into a 32-byte ABI word.
fn pad_address(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}
