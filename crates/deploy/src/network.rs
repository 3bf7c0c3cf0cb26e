//! Network profile constants and wallet/network management.

use alloy_core::primitives::Address;
use serde_json::{Value, json};

use crate::compiler::Compiler;
use crate::deployer::Deployer;
use crate::error::{Error, Result};
use crate::wallet::Wallet;

/// Native currency of a network, as registered with the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Chain parameters of the target network.
///
/// Defined once at startup and never reconfigured; every operation after
/// connection re-validates the active chain against `chain_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    pub chain_id: u64,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub explorer_urls: Vec<String>,
}

impl NetworkProfile {
    /// The chain id as a 0x-prefixed hex quantity.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// EIP-3085 `wallet_addEthereumChain` parameter object.
    pub fn add_chain_params(&self) -> Value {
        json!({
            "chainId": self.chain_id_hex(),
            "chainName": self.chain_name,
            "nativeCurrency": {
                "name": self.native_currency.name,
                "symbol": self.native_currency.symbol,
                "decimals": self.native_currency.decimals,
            },
            "rpcUrls": self.rpc_urls,
            "blockExplorerUrls": self.explorer_urls,
        })
    }

    /// Explorer page for an address, if the profile carries an explorer.
    pub fn explorer_address_url(&self, address: &Address) -> Option<String> {
        self.explorer_urls
            .first()
            .map(|base| format!("{}/address/{address}", base.trim_end_matches('/')))
    }
}

/// Official Lens Chain Testnet parameters (per the Lens docs).
pub fn lens_testnet() -> NetworkProfile {
    NetworkProfile {
        chain_id: 37111,
        chain_name: "Lens Chain Testnet".to_string(),
        native_currency: NativeCurrency {
            name: "GRASS".to_string(),
            symbol: "GRASS".to_string(),
            decimals: 18,
        },
        rpc_urls: vec!["https://rpc.testnet.lens.xyz".to_string()],
        explorer_urls: vec!["https://explorer.testnet.lens.xyz".to_string()],
    }
}

/// Active wallet session. Recreated on every connect; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub account: Address,
}

/// Abbreviate an address for logs: first 6 + last 4 characters.
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

impl<W: Wallet, C: Compiler> Deployer<W, C> {
    /// Request account access and start a session on the first account.
    ///
    /// Reports the connected account and active chain; a mismatching chain
    /// is a warning, not a failure.
    pub async fn connect(&mut self) -> Result<Session> {
        let accounts = self.wallet.request_accounts().await?;
        let account = accounts
            .first()
            .copied()
            .ok_or_else(|| Error::WalletUnavailable("wallet returned no accounts".to_string()))?;

        let session = Session { account };
        self.session = Some(session);

        let chain_id = self.wallet.chain_id().await?;
        tracing::info!(
            account = %short_address(&account),
            chain_id,
            "Wallet connected"
        );

        if chain_id != self.network.chain_id {
            tracing::warn!(
                chain_id,
                expected = self.network.chain_id,
                "Not on {}; switch the network before deploying",
                self.network.chain_name
            );
        }

        Ok(session)
    }

    /// Switch the wallet to the configured network, registering it first if
    /// the wallet does not know the chain. Reports the resulting chain id.
    pub async fn switch_or_add_network(&mut self) -> Result<u64> {
        match self.wallet.switch_chain(self.network.chain_id).await {
            Ok(()) => {}
            Err(Error::UnrecognizedChain { chain_id }) => {
                tracing::info!(chain_id, "Chain unknown to the wallet, requesting add");
                // The add request also performs the switch.
                self.wallet.add_chain(&self.network).await?;
            }
            Err(err) => return Err(err),
        }

        let chain_id = self.wallet.chain_id().await?;
        tracing::info!(chain_id, "Switched network");
        Ok(chain_id)
    }

    /// Connect only if no session exists yet; no-op otherwise.
    pub async fn ensure_connected(&mut self) -> Result<()> {
        if self.session.is_none() {
            self.connect().await?;
        }
        Ok(())
    }

    /// Fail unless the wallet's active chain matches the configured network.
    ///
    /// Called before every deploy and mint, after [`Self::ensure_connected`],
    /// so no transaction is wasted on a connected-but-wrong-chain session.
    pub async fn assert_correct_network(&self) -> Result<()> {
        let actual = self.wallet.chain_id().await?;
        if actual != self.network.chain_id {
            return Err(Error::WrongNetwork {
                expected: self.network.chain_id,
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lens_testnet_profile() {
        let profile = lens_testnet();
        assert_eq!(profile.chain_id, 37111);
        assert_eq!(profile.chain_id_hex(), "0x90f7");
        assert_eq!(profile.native_currency.symbol, "GRASS");
        assert_eq!(profile.native_currency.decimals, 18);
        assert_eq!(profile.rpc_urls, vec!["https://rpc.testnet.lens.xyz"]);
        assert_eq!(
            profile.explorer_urls,
            vec!["https://explorer.testnet.lens.xyz"]
        );
    }

    #[test]
    fn test_add_chain_params_shape() {
        let params = lens_testnet().add_chain_params();
        assert_eq!(params["chainId"], "0x90f7");
        assert_eq!(params["chainName"], "Lens Chain Testnet");
        assert_eq!(params["nativeCurrency"]["decimals"], 18);
        assert_eq!(params["rpcUrls"][0], "https://rpc.testnet.lens.xyz");
        assert_eq!(
            params["blockExplorerUrls"][0],
            "https://explorer.testnet.lens.xyz"
        );
    }

    #[test]
    fn test_short_address() {
        let address = Address::repeat_byte(0x11);
        assert_eq!(short_address(&address), "0x1111…1111");
    }

    #[test]
    fn test_explorer_address_url() {
        let address = Address::repeat_byte(0x11);
        let url = lens_testnet().explorer_address_url(&address).unwrap();
        assert_eq!(
            url,
            format!("https://explorer.testnet.lens.xyz/address/{address}")
        );

        let mut profile = lens_testnet();
        profile.explorer_urls.clear();
        assert!(profile.explorer_address_url(&address).is_none());
    }
}
