// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use stake_kernel::stake::CheckpointTable;
use stake_kernel::{Hash256, NewBlock, StakeParams};
use std::fs;
use std::path::{Path, PathBuf};

mod replay;
mod telemetry;

#[derive(Parser, Debug)]
#[command(author, version, about = "Stake modifier and checksum verifier", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect a JSON block fixture and print a stake report
    Replay {
        /// JSON array of blocks: hash, prev_hash, time, proof_hash
        #[arg(long)]
        chain: PathBuf,

        /// JSON object mapping height to expected checksum
        #[arg(long)]
        checkpoints: Option<PathBuf>,

        /// JSON stake parameters; missing fields take their defaults
        #[arg(long)]
        params: Option<PathBuf>,

        /// Use test network parameters and skip checkpoints
        #[arg(long)]
        testnet: bool,

        /// Append connected blocks to this record store
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Print the records of a store
    Inspect {
        store: PathBuf,
    },
}

#[derive(Serialize)]
struct RecordView {
    height: u32,
    hash: Hash256,
    prev_hash: Option<Hash256>,
    time: i64,
    modifier: String,
    generated: bool,
    proof_hash: Option<Hash256>,
    checksum: String,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {} file {}", what, path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse {} JSON", what))
}

fn load_params(path: Option<&Path>, testnet: bool) -> Result<StakeParams> {
    let mut params = match path {
        Some(p) => read_json(p, "params")?,
        None if testnet => StakeParams::testnet(),
        None => StakeParams::mainnet(),
    };
    if testnet {
        params.testnet = true;
    }
    params.validate().context("Invalid stake parameters")?;
    Ok(params)
}

fn main() -> Result<()> {
    telemetry::init_telemetry();
    let args = Args::parse();

    match args.command {
        Command::Replay { chain, checkpoints, params, testnet, store } => {
            let params = load_params(params.as_deref(), testnet)?;
            let checkpoints: CheckpointTable = match checkpoints {
                Some(p) => read_json(&p, "checkpoints")?,
                None => CheckpointTable::new(),
            };
            let blocks: Vec<NewBlock> = read_json(&chain, "chain")?;

            let report = replay::replay(params, checkpoints, &blocks, store.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if let Some(rejected) = &report.rejected {
                anyhow::bail!("block {} rejected: {}", rejected.hash, rejected.error);
            }
        }
        Command::Inspect { store } => {
            let records = stake_persistence::read_all(&store)
                .with_context(|| format!("Failed to read store {}", store.display()))?;
            let views: Vec<RecordView> = records
                .iter()
                .map(|r| RecordView {
                    height: r.height,
                    hash: r.hash,
                    prev_hash: r.prev_hash,
                    time: r.time,
                    modifier: format!("0x{:016x}", r.stake_modifier),
                    generated: r.generated_modifier,
                    proof_hash: r.proof_hash,
                    checksum: format!("0x{:08x}", r.stake_checksum),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
    }

    Ok(())
}
