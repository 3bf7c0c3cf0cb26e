use std::path::PathBuf;

use alloy_core::primitives::Address;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use url::Url;

/// Default wallet RPC endpoint (a local wallet bridge or dev node).
const DEFAULT_WALLET_URL: &str = "http://127.0.0.1:8545";

#[derive(Parser)]
#[command(name = "meadow")]
#[command(
    author,
    version,
    about = "Deploy and mint token contracts on Lens Chain Testnet in a few clicks"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "MEADOW_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// URL of the wallet RPC endpoint used for accounts, chain management,
    /// and transaction signing.
    #[arg(long, alias = "wallet", env = "MEADOW_WALLET_URL", default_value = DEFAULT_WALLET_URL)]
    pub wallet_url: Url,

    /// Path to the solc binary used for contract compilation.
    #[arg(long, env = "MEADOW_SOLC", default_value = "solc")]
    pub solc: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Connect the wallet and report the active account and chain.
    Connect,
    /// Switch the wallet to Lens Chain Testnet, adding the network if the
    /// wallet does not know it yet.
    SwitchNetwork,
    /// Compile and deploy one of the contract templates.
    #[command(subcommand)]
    Deploy(DeployCommand),
    /// Mint against a deployed contract.
    #[command(subcommand)]
    Mint(MintCommand),
}

#[derive(Subcommand)]
pub enum DeployCommand {
    /// Deploy the mintable token contract.
    Token {
        /// Token name.
        #[arg(long, default_value = "MyToken")]
        name: String,
        /// Token symbol.
        #[arg(long, default_value = "MTK")]
        symbol: String,
        /// Initial supply in whole tokens (the contract applies its decimals).
        #[arg(long, default_value_t = 1_000_000)]
        supply: u128,
    },
    /// Deploy the NFT contract.
    Nft {
        /// Collection name.
        #[arg(long, default_value = "MyNFT")]
        name: String,
        /// Collection symbol.
        #[arg(long, default_value = "MNFT")]
        symbol: String,
    },
}

#[derive(Subcommand)]
pub enum MintCommand {
    /// Call mint(to, amount) on a token contract.
    Token {
        /// Token contract address; defaults to the token deployed earlier in
        /// this run.
        #[arg(long)]
        address: Option<Address>,
        /// Recipient; defaults to the connected account.
        #[arg(long)]
        to: Option<Address>,
        /// Amount in whole tokens (the contract applies its decimals).
        #[arg(long, default_value_t = 0)]
        amount: u128,
    },
    /// Call mint(to) on an NFT contract.
    Nft {
        /// NFT contract address; defaults to the NFT deployed earlier in
        /// this run.
        #[arg(long)]
        address: Option<Address>,
        /// Recipient; defaults to the connected account.
        #[arg(long)]
        to: Option<Address>,
    },
}
