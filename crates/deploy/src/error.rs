//! Error kinds surfaced by the orchestration library.

use std::time::Duration;

use alloy_core::primitives::B256;

use crate::deployer::ContractKind;

/// Failures reported by orchestration operations.
///
/// Every failure is surfaced as a value and carried up to the action
/// boundary, where it becomes an error-styled log line. None of these are
/// retried automatically; the user retries the triggering action.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The wallet capability is absent or unreachable.
    #[error("wallet unavailable: {0}")]
    WalletUnavailable(String),

    /// The compiler capability is absent.
    #[error("compiler unavailable: {0}")]
    CompilerUnavailable(String),

    /// The wallet refused a chain switch because it does not know the chain
    /// (EIP-3326 code 4902). Recovered internally by an add-chain request.
    #[error("chain {chain_id} is not recognized by the wallet")]
    UnrecognizedChain { chain_id: u64 },

    /// Any other error reported by the wallet capability.
    #[error("wallet error {code}: {message}")]
    WalletRpc { code: i64, message: String },

    /// The active chain differs from the configured network profile.
    #[error("wrong network: connected to chain {actual}, expected chain {expected}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// The compiler reported error-severity diagnostics.
    #[error("compilation failed:\n{0}")]
    Compilation(String),

    /// Compilation succeeded but produced no deployable bytecode.
    #[error("compilation produced empty bytecode")]
    EmptyBytecode,

    /// A submitted transaction did not confirm within the waiting window.
    #[error("transaction {tx_hash} not confirmed after {waited:?}")]
    ConfirmationTimeout { tx_hash: B256, waited: Duration },

    /// Contract creation failed at signing, submission, or confirmation.
    #[error("deployment failed: {0}")]
    Deployment(String),

    /// A mint call failed at signing, submission, or confirmation.
    #[error("mint failed: {0}")]
    Mint(String),

    /// No explicit contract address was given and none of the matching kind
    /// has been deployed in this session.
    #[error("no {0} contract address provided and none deployed in this session")]
    MissingAddress(ContractKind),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
