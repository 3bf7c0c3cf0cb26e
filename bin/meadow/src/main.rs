//! meadow is a CLI tool to deploy and mint token contracts on the Lens Chain
//! Testnet in a few clicks.

mod cli;

use alloy_core::primitives::U256;
use anyhow::Result;
use clap::Parser;

use meadow_deploy::{
    Deployer, JsonRpcWallet, MintNftParams, MintTokenParams, NftParams, SolcCommand, TokenParams,
    lens_testnet,
};

use crate::cli::{Cli, Command, DeployCommand, MintCommand};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    // Each invocation is one independent user action; failures end up here
    // as an error-styled line and a non-zero exit, never a panic.
    if let Err(err) = run(cli).await {
        tracing::error!(error = %err, "Action failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let wallet = JsonRpcWallet::new(cli.wallet_url)?;
    let compiler = SolcCommand::new(cli.solc);
    let mut deployer = Deployer::new(wallet, compiler, lens_testnet());

    match cli.command {
        Command::Connect => {
            deployer.connect().await?;
        }
        Command::SwitchNetwork => {
            deployer.switch_or_add_network().await?;
        }
        Command::Deploy(DeployCommand::Token { name, symbol, supply }) => {
            deployer
                .deploy_token(&TokenParams {
                    name,
                    symbol,
                    initial_supply: U256::from(supply),
                })
                .await?;
        }
        Command::Deploy(DeployCommand::Nft { name, symbol }) => {
            deployer.deploy_nft(&NftParams { name, symbol }).await?;
        }
        Command::Mint(MintCommand::Token { address, to, amount }) => {
            deployer
                .mint_token(&MintTokenParams {
                    contract: address,
                    to,
                    amount: U256::from(amount),
                })
                .await?;
        }
        Command::Mint(MintCommand::Nft { address, to }) => {
            deployer
                .mint_nft(&MintNftParams {
                    contract: address,
                    to,
                })
                .await?;
        }
    }

    Ok(())
}
