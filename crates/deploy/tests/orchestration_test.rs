//! Integration tests for the connect -> compile -> deploy -> mint flow.
//!
//! The wallet and compiler capabilities are replaced with in-memory mocks,
//! so every flow runs deterministically without a wallet, a node, or a solc
//! binary present.

use std::sync::Mutex;
use std::time::Duration;

use alloy_core::primitives::{Address, B256, U256};
use alloy_core::sol_types::SolValue;

use meadow_deploy::{
    Compiler, CompilerInput, CompilerOutput, ContractKind, Deployer, Error, MintNftParams,
    MintTokenParams, NetworkProfile, NftParams, Result, TokenParams, TransactionReceipt,
    TransactionRequest, Wallet, lens_testnet,
};

const LENS_CHAIN_ID: u64 = 37111;

fn account() -> Address {
    Address::repeat_byte(0x11)
}

fn contract_address_for(tx_index: usize) -> Address {
    Address::repeat_byte(0xA0 + tx_index as u8)
}

#[derive(Default)]
struct WalletState {
    accounts: Vec<Address>,
    chain_id: u64,
    known_chains: Vec<u64>,
    unavailable: bool,
    switch_error: Option<(i64, String)>,
    fail_send: Option<String>,
    revert_receipts: bool,
    request_accounts_calls: usize,
    switch_calls: usize,
    add_chain_calls: usize,
    sent: Vec<TransactionRequest>,
}

/// Scriptable in-memory wallet capability.
#[derive(Default)]
struct MockWallet {
    state: Mutex<WalletState>,
}

impl MockWallet {
    /// A wallet holding one account with the given active chain, which it
    /// also recognizes for switching.
    fn on_chain(chain_id: u64) -> Self {
        Self {
            state: Mutex::new(WalletState {
                accounts: vec![account()],
                chain_id,
                known_chains: vec![chain_id],
                ..Default::default()
            }),
        }
    }

    fn with<T>(&self, f: impl FnOnce(&mut WalletState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    fn sent(&self) -> Vec<TransactionRequest> {
        self.with(|s| s.sent.clone())
    }
}

impl Wallet for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.with(|s| {
            s.request_accounts_calls += 1;
            if s.unavailable {
                return Err(Error::WalletUnavailable("wallet not reachable".to_string()));
            }
            Ok(s.accounts.clone())
        })
    }

    async fn chain_id(&self) -> Result<u64> {
        self.with(|s| {
            if s.unavailable {
                return Err(Error::WalletUnavailable("wallet not reachable".to_string()));
            }
            Ok(s.chain_id)
        })
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        self.with(|s| {
            s.switch_calls += 1;
            if let Some((code, message)) = s.switch_error.clone() {
                return Err(Error::WalletRpc { code, message });
            }
            if s.known_chains.contains(&chain_id) {
                s.chain_id = chain_id;
                Ok(())
            } else {
                Err(Error::UnrecognizedChain { chain_id })
            }
        })
    }

    async fn add_chain(&self, profile: &NetworkProfile) -> Result<()> {
        self.with(|s| {
            s.add_chain_calls += 1;
            s.known_chains.push(profile.chain_id);
            s.chain_id = profile.chain_id;
            Ok(())
        })
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256> {
        self.with(|s| {
            if let Some(message) = s.fail_send.clone() {
                return Err(Error::WalletRpc {
                    code: -32000,
                    message,
                });
            }
            s.sent.push(tx.clone());
            Ok(B256::repeat_byte(s.sent.len() as u8))
        })
    }

    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<TransactionReceipt>> {
        self.with(|s| {
            let tx_index = tx_hash.as_slice()[0] as usize;
            let tx = &s.sent[tx_index - 1];
            let contract_address = tx.to.is_none().then(|| contract_address_for(tx_index));
            Ok(Some(TransactionReceipt {
                transaction_hash: tx_hash,
                contract_address,
                status: Some(if s.revert_receipts { "0x0" } else { "0x1" }.to_string()),
            }))
        })
    }
}

/// Compiler capability answering every call with a fixed standard-JSON
/// output covering both embedded templates.
struct MockCompiler;

const MOCK_COMPILER_OUTPUT: &str = r#"{
    "errors": [],
    "contracts": {
        "MintableToken.sol": {
            "MintableToken": {
                "abi": [],
                "evm": {"bytecode": {"object": "608060405234801561000f575f5ffd5b50"}}
            }
        },
        "SimpleNFT.sol": {
            "SimpleNFT": {
                "abi": [],
                "evm": {"bytecode": {"object": "6080604052348015600e575f5ffd5b50"}}
            }
        }
    }
}"#;

impl Compiler for MockCompiler {
    fn compile(&self, _input: &CompilerInput) -> Result<CompilerOutput> {
        serde_json::from_str(MOCK_COMPILER_OUTPUT)
            .map_err(|e| Error::Compilation(format!("mock output invalid: {e}")))
    }
}

/// Initialize tracing for tests (idempotent).
fn init_test_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

fn deployer_on(chain_id: u64) -> Deployer<MockWallet, MockCompiler> {
    init_test_tracing();
    Deployer::new(MockWallet::on_chain(chain_id), MockCompiler, lens_testnet())
        .with_confirmation_timing(Duration::from_secs(1), Duration::from_millis(1))
}

fn token_params() -> TokenParams {
    TokenParams {
        name: "MyToken".to_string(),
        symbol: "MTK".to_string(),
        initial_supply: U256::from(1_000_000u64),
    }
}

fn nft_params() -> NftParams {
    NftParams {
        name: "MyNFT".to_string(),
        symbol: "MNFT".to_string(),
    }
}

// ---------------- Network manager ----------------

#[tokio::test]
async fn test_connect_starts_session_on_first_account() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);

    let session = deployer.connect().await.unwrap();

    assert_eq!(session.account, account());
    assert_eq!(deployer.session().unwrap().account, account());
}

#[tokio::test]
async fn test_connect_on_wrong_chain_is_not_fatal() {
    let mut deployer = deployer_on(1);

    // Wrong chain only warns; the failure comes later from the network guard.
    deployer.connect().await.unwrap();
    assert!(deployer.session().is_some());
}

#[tokio::test]
async fn test_connect_fails_when_wallet_unavailable() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);
    deployer.wallet().with(|s| s.unavailable = true);

    let err = deployer.connect().await.unwrap_err();
    assert!(matches!(err, Error::WalletUnavailable(_)));
    assert!(deployer.session().is_none());
}

#[tokio::test]
async fn test_connect_fails_without_accounts() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);
    deployer.wallet().with(|s| s.accounts.clear());

    let err = deployer.connect().await.unwrap_err();
    assert!(matches!(err, Error::WalletUnavailable(_)));
}

#[tokio::test]
async fn test_ensure_connected_requests_accounts_once() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);

    deployer.ensure_connected().await.unwrap();
    deployer.ensure_connected().await.unwrap();

    assert_eq!(deployer.wallet().with(|s| s.request_accounts_calls), 1);
}

#[tokio::test]
async fn test_assert_correct_network() {
    let deployer = deployer_on(LENS_CHAIN_ID);
    deployer.assert_correct_network().await.unwrap();

    let deployer = deployer_on(1);
    let err = deployer.assert_correct_network().await.unwrap_err();
    match err {
        Error::WrongNetwork { expected, actual } => {
            assert_eq!(expected, LENS_CHAIN_ID);
            assert_eq!(actual, 1);
        }
        other => panic!("expected WrongNetwork, got {other:?}"),
    }
}

#[tokio::test]
async fn test_switch_adds_unknown_chain_exactly_once() {
    let mut deployer = deployer_on(1);

    let chain_id = deployer.switch_or_add_network().await.unwrap();

    assert_eq!(chain_id, LENS_CHAIN_ID);
    assert_eq!(deployer.wallet().with(|s| s.switch_calls), 1);
    assert_eq!(deployer.wallet().with(|s| s.add_chain_calls), 1);
}

#[tokio::test]
async fn test_switch_skips_add_for_known_chain() {
    let mut deployer = deployer_on(1);
    deployer
        .wallet()
        .with(|s| s.known_chains = vec![1, LENS_CHAIN_ID]);

    let chain_id = deployer.switch_or_add_network().await.unwrap();

    assert_eq!(chain_id, LENS_CHAIN_ID);
    assert_eq!(deployer.wallet().with(|s| s.add_chain_calls), 0);
}

#[tokio::test]
async fn test_switch_propagates_other_errors_without_adding() {
    let mut deployer = deployer_on(1);
    deployer
        .wallet()
        .with(|s| s.switch_error = Some((-32002, "request already pending".to_string())));

    let err = deployer.switch_or_add_network().await.unwrap_err();

    assert!(matches!(err, Error::WalletRpc { code: -32002, .. }));
    assert_eq!(deployer.wallet().with(|s| s.add_chain_calls), 0);
}

// ---------------- Deployment driver ----------------

#[tokio::test]
async fn test_deploy_token_submits_creation_transaction() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);

    let deployed = deployer.deploy_token(&token_params()).await.unwrap();

    assert_eq!(deployed.kind, ContractKind::Token);
    assert_eq!(deployed.address, contract_address_for(1));
    assert_eq!(
        deployer.last_deployed(ContractKind::Token),
        Some(deployed.address)
    );

    let sent = deployer.wallet().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from, account());
    assert!(sent[0].to.is_none());

    // data = creation bytecode followed by the ABI-encoded constructor args.
    let bytecode = hex::decode("608060405234801561000f575f5ffd5b50").unwrap();
    let constructor_args = (
        "MyToken".to_string(),
        "MTK".to_string(),
        U256::from(1_000_000u64),
    )
        .abi_encode_params();
    assert_eq!(&sent[0].data[..bytecode.len()], &bytecode[..]);
    assert_eq!(&sent[0].data[bytecode.len()..], &constructor_args[..]);
}

#[tokio::test]
async fn test_deploy_nft_submits_creation_transaction() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);

    let deployed = deployer.deploy_nft(&nft_params()).await.unwrap();

    assert_eq!(deployed.kind, ContractKind::Nft);
    assert_eq!(
        deployer.last_deployed(ContractKind::Nft),
        Some(deployed.address)
    );

    let sent = deployer.wallet().sent();
    let constructor_args = ("MyNFT".to_string(), "MNFT".to_string()).abi_encode_params();
    assert!(sent[0].data.ends_with(&constructor_args));
}

#[tokio::test]
async fn test_deploy_rejects_wrong_network_before_submitting() {
    let mut deployer = deployer_on(1);

    let err = deployer.deploy_token(&token_params()).await.unwrap_err();

    assert!(matches!(err, Error::WrongNetwork { .. }));
    assert!(deployer.wallet().sent().is_empty());
}

#[tokio::test]
async fn test_second_deploy_overwrites_last_address() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);

    let first = deployer.deploy_token(&token_params()).await.unwrap();
    let second = deployer.deploy_token(&token_params()).await.unwrap();

    assert_ne!(first.address, second.address);
    assert_eq!(
        deployer.last_deployed(ContractKind::Token),
        Some(second.address)
    );
}

#[tokio::test]
async fn test_deploy_failure_carries_wallet_message() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);
    deployer
        .wallet()
        .with(|s| s.fail_send = Some("insufficient funds for gas".to_string()));

    let err = deployer.deploy_token(&token_params()).await.unwrap_err();

    match err {
        Error::Deployment(message) => assert!(message.contains("insufficient funds for gas")),
        other => panic!("expected Deployment, got {other:?}"),
    }
    assert_eq!(deployer.last_deployed(ContractKind::Token), None);
}

#[tokio::test]
async fn test_reverted_deploy_fails() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);
    deployer.wallet().with(|s| s.revert_receipts = true);

    let err = deployer.deploy_token(&token_params()).await.unwrap_err();

    match err {
        Error::Deployment(message) => assert!(message.contains("reverted")),
        other => panic!("expected Deployment, got {other:?}"),
    }
    assert_eq!(deployer.last_deployed(ContractKind::Token), None);
}

// ---------------- Mint drivers ----------------

#[tokio::test]
async fn test_mint_token_falls_back_to_last_deployment() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);
    let deployed = deployer.deploy_token(&token_params()).await.unwrap();

    deployer
        .mint_token(&MintTokenParams {
            contract: None,
            to: None,
            amount: U256::from(7u64),
        })
        .await
        .unwrap();

    let sent = deployer.wallet().sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].to, Some(deployed.address));
    assert_eq!(sent[1].from, account());

    let data = hex::encode(&sent[1].data);
    assert!(data.starts_with("40c10f19"));
    // Recipient defaults to the connected account; the amount stays raw.
    assert!(data.contains(&hex::encode(account().as_slice())));
    assert!(data.ends_with(
        "0000000000000000000000000000000000000000000000000000000000000007"
    ));
}

#[tokio::test]
async fn test_mint_without_address_fails_before_any_wallet_call() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);

    let err = deployer
        .mint_token(&MintTokenParams {
            contract: None,
            to: None,
            amount: U256::from(1u64),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingAddress(ContractKind::Token)));
    assert_eq!(deployer.wallet().with(|s| s.request_accounts_calls), 0);
    assert!(deployer.wallet().sent().is_empty());

    let err = deployer
        .mint_nft(&MintNftParams {
            contract: None,
            to: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingAddress(ContractKind::Nft)));
}

#[tokio::test]
async fn test_mint_nft_uses_explicit_address() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);
    let contract = Address::repeat_byte(0x42);
    let recipient = Address::repeat_byte(0x43);

    deployer
        .mint_nft(&MintNftParams {
            contract: Some(contract),
            to: Some(recipient),
        })
        .await
        .unwrap();

    let sent = deployer.wallet().sent();
    assert_eq!(sent[0].to, Some(contract));
    assert_eq!(
        hex::encode(&sent[0].data),
        format!("6a627842{}", hex::encode(pad_word(recipient)))
    );
}

#[tokio::test]
async fn test_blank_mint_targets_most_recent_deployment() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);

    deployer.deploy_nft(&nft_params()).await.unwrap();
    let second = deployer.deploy_nft(&nft_params()).await.unwrap();

    deployer
        .mint_nft(&MintNftParams {
            contract: None,
            to: None,
        })
        .await
        .unwrap();

    let sent = deployer.wallet().sent();
    assert_eq!(sent.last().unwrap().to, Some(second.address));
}

#[tokio::test]
async fn test_mint_rejects_wrong_network() {
    let mut deployer = deployer_on(1);

    let err = deployer
        .mint_token(&MintTokenParams {
            contract: Some(Address::repeat_byte(0x42)),
            to: None,
            amount: U256::from(1u64),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::WrongNetwork { .. }));
    assert!(deployer.wallet().sent().is_empty());
}

#[tokio::test]
async fn test_mint_failure_carries_wallet_message() {
    let mut deployer = deployer_on(LENS_CHAIN_ID);
    deployer
        .wallet()
        .with(|s| s.fail_send = Some("user rejected the request".to_string()));

    let err = deployer
        .mint_token(&MintTokenParams {
            contract: Some(Address::repeat_byte(0x42)),
            to: None,
            amount: U256::from(1u64),
        })
        .await
        .unwrap_err();

    match err {
        Error::Mint(message) => assert!(message.contains("user rejected the request")),
        other => panic!("expected Mint, got {other:?}"),
    }
}

// ---------------- Full flow ----------------

#[tokio::test]
async fn test_full_flow_connect_switch_deploy_mint() {
    let mut deployer = deployer_on(1);
    deployer.wallet().with(|s| s.known_chains = vec![1]);

    deployer.connect().await.unwrap();
    let chain_id = deployer.switch_or_add_network().await.unwrap();
    assert_eq!(chain_id, LENS_CHAIN_ID);

    let token = deployer.deploy_token(&token_params()).await.unwrap();
    let nft = deployer.deploy_nft(&nft_params()).await.unwrap();

    deployer
        .mint_token(&MintTokenParams {
            contract: None,
            to: None,
            amount: U256::from(1_000u64),
        })
        .await
        .unwrap();
    deployer
        .mint_nft(&MintNftParams {
            contract: None,
            to: None,
        })
        .await
        .unwrap();

    let sent = deployer.wallet().sent();
    assert_eq!(sent.len(), 4);
    assert!(sent[0].to.is_none());
    assert!(sent[1].to.is_none());
    assert_eq!(sent[2].to, Some(token.address));
    assert_eq!(sent[3].to, Some(nft.address));

    // Connect happened once up front; ensure_connected stayed a no-op after.
    assert_eq!(deployer.wallet().with(|s| s.request_accounts_calls), 1);
}

fn pad_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}
