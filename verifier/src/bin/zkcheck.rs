use std::{fs::File, path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use eyre::Context;
use tracing_subscriber::EnvFilter;
use zkcheck_verifier::{
    Proof, Scheme, VerifyingKey,
    calldata::{Groth16Calldata, PlonkCalldata},
    read_public_inputs,
};

/// Verifies snarkjs Groth16 and PLONK proofs over BN254 exactly as the Solidity verifiers exported by snarkjs do, and converts proofs into the calldata those verifiers take.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Config {
    #[clap(subcommand)]
    subcommand: SubCommand,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    Verify(VerifyConfig),
    GenerateCall(GenerateCallConfig),
    VerifyCall(VerifyCallConfig),
}

#[derive(Debug, Args)]
struct VerifyConfig {
    /// Path to the snarkjs verification key.
    #[clap(long, env = "ZKCHECK_VK")]
    pub vk: PathBuf,
    /// Path to the snarkjs proof.
    #[clap(long)]
    pub proof: PathBuf,
    /// Path to the snarkjs public inputs.
    #[clap(long)]
    pub public: PathBuf,
    /// The proof system. Read from the verification key if omitted.
    #[clap(long, env = "ZKCHECK_SCHEME")]
    pub scheme: Option<Scheme>,
}

#[derive(Debug, Args)]
struct GenerateCallConfig {
    /// Path to the snarkjs proof.
    #[clap(long)]
    pub proof: PathBuf,
    /// Path to the snarkjs public inputs.
    #[clap(long)]
    pub public: PathBuf,
    /// The proof system. Read from the proof if omitted.
    #[clap(long, env = "ZKCHECK_SCHEME")]
    pub scheme: Option<Scheme>,
    /// Location of the output file. Write to stdout if omitted.
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct VerifyCallConfig {
    /// Path to the snarkjs verification key.
    #[clap(long, env = "ZKCHECK_VK")]
    pub vk: PathBuf,
    /// Path to a file holding the calldata as printed by `snarkjs zkesc` or `generate-call`.
    #[clap(long)]
    pub calldata: PathBuf,
    /// The proof system. Read from the verification key if omitted.
    #[clap(long, env = "ZKCHECK_SCHEME")]
    pub scheme: Option<Scheme>,
}

fn open(path: &PathBuf) -> eyre::Result<File> {
    File::open(path).with_context(|| format!("while opening {}", path.display()))
}

fn exit_code(accepted: bool) -> ExitCode {
    if accepted {
        println!("OK");
        ExitCode::SUCCESS
    } else {
        println!("INVALID");
        ExitCode::FAILURE
    }
}

fn verify(config: VerifyConfig) -> eyre::Result<ExitCode> {
    let VerifyConfig {
        vk,
        proof,
        public,
        scheme,
    } = config;
    let vk = VerifyingKey::from_json_reader(open(&vk)?, scheme)
        .context("while parsing verification-key")?;
    let scheme = vk.scheme();
    let proof =
        Proof::from_json_reader(open(&proof)?, Some(scheme)).context("while parsing proof")?;
    let public = read_public_inputs(open(&public)?).context("while parsing public inputs")?;
    tracing::info!(%scheme, n_public = public.len(), "verifying proof");
    let accepted = zkcheck_verifier::verify(scheme, &vk, &proof, &public)
        .context("while verifying proof")?;
    Ok(exit_code(accepted))
}

fn generate_call(config: GenerateCallConfig) -> eyre::Result<ExitCode> {
    let GenerateCallConfig {
        proof,
        public,
        scheme,
        output,
    } = config;
    let proof = Proof::from_json_reader(open(&proof)?, scheme).context("while parsing proof")?;
    let public = read_public_inputs(open(&public)?).context("while parsing public inputs")?;
    let result = match &proof {
        Proof::Groth16(proof) => Groth16Calldata::new(proof, &public).to_string(),
        Proof::Plonk(proof) => PlonkCalldata::new(proof, &public).to_string(),
    };
    if let Some(output) = output {
        std::fs::write(output, result).context("while writing output")?;
    } else {
        println!("{result}");
    }
    Ok(ExitCode::SUCCESS)
}

fn verify_call(config: VerifyCallConfig) -> eyre::Result<ExitCode> {
    let VerifyCallConfig {
        vk,
        calldata,
        scheme,
    } = config;
    let vk = VerifyingKey::from_json_reader(open(&vk)?, scheme)
        .context("while parsing verification-key")?;
    let calldata = std::fs::read_to_string(&calldata)
        .with_context(|| format!("while reading {}", calldata.display()))?;
    let accepted = match &vk {
        VerifyingKey::Groth16(pvk) => calldata
            .parse::<Groth16Calldata>()
            .context("while parsing calldata")?
            .verify(pvk),
        VerifyingKey::Plonk(vk) => calldata
            .parse::<PlonkCalldata>()
            .context("while parsing calldata")?
            .verify(vk),
    }
    .context("while verifying calldata")?;
    Ok(exit_code(accepted))
}

fn main() -> eyre::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let config = Config::parse();
    match config.subcommand {
        SubCommand::Verify(config) => verify(config),
        SubCommand::GenerateCall(config) => generate_call(config),
        SubCommand::VerifyCall(config) => verify_call(config),
    }
}
