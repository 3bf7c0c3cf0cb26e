//! Compiler capability boundary and the standard-JSON adapter around it.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use alloy_core::primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Optimizer run count requested for every compilation.
const OPTIMIZER_RUNS: u32 = 200;

/// Standard-JSON compiler input.
#[derive(Debug, Clone, Serialize)]
pub struct CompilerInput {
    pub language: String,
    pub sources: BTreeMap<String, SourceFile>,
    pub settings: CompilerSettings,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceFile {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerSettings {
    pub optimizer: OptimizerSettings,
    pub output_selection: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizerSettings {
    pub enabled: bool,
    pub runs: u32,
}

impl CompilerInput {
    /// Input for a single Solidity source, optimizer on, requesting ABI and
    /// creation bytecode for every contract in every file.
    pub fn solidity(source_name: &str, source_text: &str) -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(
            source_name.to_string(),
            SourceFile {
                content: source_text.to_string(),
            },
        );

        let mut output_selection = BTreeMap::new();
        let mut per_contract = BTreeMap::new();
        per_contract.insert(
            "*".to_string(),
            vec!["abi".to_string(), "evm.bytecode.object".to_string()],
        );
        output_selection.insert("*".to_string(), per_contract);

        Self {
            language: "Solidity".to_string(),
            sources,
            settings: CompilerSettings {
                optimizer: OptimizerSettings {
                    enabled: true,
                    runs: OPTIMIZER_RUNS,
                },
                output_selection,
            },
        }
    }
}

/// Standard-JSON compiler output, reduced to the fields the adapter reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompilerOutput {
    #[serde(default)]
    pub errors: Vec<CompilerDiagnostic>,
    /// source name -> contract name -> compiled contract.
    #[serde(default)]
    pub contracts: BTreeMap<String, BTreeMap<String, ContractOutput>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerDiagnostic {
    pub severity: String,
    pub message: String,
    #[serde(default)]
    pub formatted_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractOutput {
    pub abi: serde_json::Value,
    pub evm: EvmOutput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvmOutput {
    pub bytecode: BytecodeOutput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BytecodeOutput {
    pub object: String,
}

/// Output of a successful compilation, ready to deploy.
#[derive(Debug, Clone)]
pub struct CompiledArtifact {
    pub contract_name: String,
    pub abi: serde_json::Value,
    pub bytecode: Bytes,
}

/// External compiler capability: one synchronous standard-JSON call.
pub trait Compiler {
    fn compile(&self, input: &CompilerInput) -> Result<CompilerOutput>;
}

/// Compiler backed by an external `solc` binary.
pub struct SolcCommand {
    solc_path: PathBuf,
}

impl SolcCommand {
    pub fn new(solc_path: impl Into<PathBuf>) -> Self {
        Self {
            solc_path: solc_path.into(),
        }
    }
}

impl Compiler for SolcCommand {
    fn compile(&self, input: &CompilerInput) -> Result<CompilerOutput> {
        let payload = serde_json::to_string(input)
            .map_err(|e| Error::Compilation(format!("failed to serialize compiler input: {e}")))?;

        let mut child = Command::new(&self.solc_path)
            .arg("--standard-json")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Error::CompilerUnavailable(format!(
                    "solc not found at {}",
                    self.solc_path.display()
                )),
                _ => Error::CompilerUnavailable(format!(
                    "failed to launch {}: {e}",
                    self.solc_path.display()
                )),
            })?;

        child
            .stdin
            .take()
            .ok_or_else(|| Error::Compilation("solc stdin was not captured".to_string()))?
            .write_all(payload.as_bytes())
            .map_err(|e| Error::Compilation(format!("failed to write compiler input: {e}")))?;

        let output = child
            .wait_with_output()
            .map_err(|e| Error::Compilation(format!("failed to read compiler output: {e}")))?;

        if !output.status.success() {
            return Err(Error::Compilation(format!(
                "solc exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| Error::Compilation(format!("solc produced invalid output: {e}")))
    }
}

/// Compile a single-contract Solidity source into a deployable artifact.
///
/// Error-severity diagnostics fail the compilation with their concatenated
/// formatted messages; warnings alone do not. The first (assumed only)
/// contract of the source becomes the artifact.
pub fn compile_source<C: Compiler>(
    compiler: &C,
    source_name: &str,
    source_text: &str,
) -> Result<CompiledArtifact> {
    let input = CompilerInput::solidity(source_name, source_text);
    let output = compiler.compile(&input)?;

    let errors: Vec<String> = output
        .errors
        .iter()
        .filter(|diagnostic| diagnostic.severity == "error")
        .map(|diagnostic| {
            diagnostic
                .formatted_message
                .clone()
                .unwrap_or_else(|| diagnostic.message.clone())
        })
        .collect();
    if !errors.is_empty() {
        return Err(Error::Compilation(errors.join("\n")));
    }

    let (contract_name, contract) = output
        .contracts
        .get(source_name)
        .and_then(|contracts| contracts.iter().next())
        .map(|(name, contract)| (name.clone(), contract.clone()))
        .ok_or_else(|| Error::Compilation(format!("no contract produced for {source_name}")))?;

    let object = contract.evm.bytecode.object.trim_start_matches("0x");
    if object.is_empty() {
        return Err(Error::EmptyBytecode);
    }

    let bytecode = hex::decode(object).map_err(|e| {
        Error::Compilation(format!("bytecode for {contract_name} is not valid hex: {e}"))
    })?;

    Ok(CompiledArtifact {
        contract_name,
        abi: contract.abi,
        bytecode: bytecode.into(),
    })
}
