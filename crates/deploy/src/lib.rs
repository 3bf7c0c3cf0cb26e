//! meadow-deploy - Orchestration library for the Lens Chain Testnet token tools.
//!
//! This crate drives the connect -> compile -> deploy -> mint flow over two
//! injectable capabilities: a wallet (accounts, chain management, signing and
//! broadcast) and a Solidity compiler. It carries no keys and implements no
//! cryptography of its own.

mod deployer;
pub use deployer::{ContractKind, DeployedContractRef, Deployer, NftParams, TokenParams};

mod compiler;
pub use compiler::{
    CompiledArtifact, Compiler, CompilerDiagnostic, CompilerInput, CompilerOutput, SolcCommand,
    compile_source,
};

mod error;
pub use error::{Error, Result};

mod mint;
pub use mint::{MintNftParams, MintTokenParams};

mod network;
pub use network::{NativeCurrency, NetworkProfile, Session, lens_testnet, short_address};

pub mod rpc;
pub mod sources;

mod wallet;
pub use wallet::{JsonRpcWallet, TransactionReceipt, TransactionRequest, Wallet};
