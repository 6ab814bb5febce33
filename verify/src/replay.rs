// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Replays a block fixture through the chain state.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use stake_kernel::stake::CheckpointTable;
use stake_kernel::{ChainState, Hash256, NewBlock, StakeParams};
use stake_persistence::{append_record, StakeRecord};
use tracing::{info, warn};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BlockReport {
    pub height: u32,
    pub hash: Hash256,
    pub modifier: String,
    pub generated: bool,
    pub proof_of_stake: bool,
    pub checksum: String,
    /// Present only at checkpointed heights.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<bool>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub hash: Hash256,
    pub error: String,
}

#[derive(Serialize, Debug)]
pub struct ReplayReport {
    pub params: StakeParams,
    pub blocks: Vec<BlockReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<Rejection>,
}

impl ReplayReport {
    pub fn tip_height(&self) -> Option<u32> {
        self.blocks.last().map(|b| b.height)
    }
}

/// Connects `blocks` in order, stopping at the first rejection. Connected
/// blocks are appended to `store` when given.
pub fn replay(
    params: StakeParams,
    checkpoints: CheckpointTable,
    blocks: &[NewBlock],
    store: Option<&Path>,
) -> Result<ReplayReport> {
    let (genesis, rest) = blocks.split_first().context("chain fixture has no blocks")?;

    let state = ChainState::new(params.clone(), checkpoints, genesis.clone())
        .context("Failed to connect genesis block")?;
    let mut report = ReplayReport { params, blocks: Vec::with_capacity(blocks.len()), rejected: None };
    record_block(&state, genesis, store, &mut report)?;

    for block in rest {
        if let Err(e) = state.connect_block(block.clone()) {
            warn!("replay stopped at block {}: {}", block.hash, e);
            report.rejected = Some(Rejection { hash: block.hash, error: e.to_string() });
            break;
        }
        record_block(&state, block, store, &mut report)?;
    }

    info!(
        "replayed {} of {} blocks, tip height {:?}",
        report.blocks.len(),
        blocks.len(),
        report.tip_height()
    );
    Ok(report)
}

fn record_block(state: &ChainState, block: &NewBlock, store: Option<&Path>, report: &mut ReplayReport) -> Result<()> {
    let entry = state
        .entry(&block.hash)
        .with_context(|| format!("block {} missing after connect", block.hash))?;

    let checkpoint = if state.checkpoints().contains_key(&entry.height) {
        Some(state.check_stake_modifier_checkpoints(entry.height, &entry.hash)?)
    } else {
        None
    };

    if let Some(path) = store {
        append_record(path, &StakeRecord::from_entry(&entry, block.prev_hash))
            .with_context(|| format!("Failed to append record to {}", path.display()))?;
    }

    report.blocks.push(BlockReport {
        height: entry.height,
        hash: entry.hash,
        modifier: format!("0x{:016x}", entry.stake_modifier),
        generated: entry.generated_modifier,
        proof_of_stake: entry.proof_of_stake,
        checksum: format!("0x{:08x}", entry.checksum),
        checkpoint,
    });
    Ok(())
}
