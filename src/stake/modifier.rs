// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Stake modifier generation and lookup.
//!
//! The stake modifier prevents a coin owner from computing future
//! proof-of-stake at the time the coin is confirmed: a kernel must be hashed
//! with a modifier generated after the coin's block. Modifiers are
//! regenerated at most once per `modifier_interval` from the timestamps of
//! blocks selected out of a trailing selection window.
//!
//! # Determinism
//! - Candidates are ordered by `(timestamp, hash)`, hash compared as an
//!   unsigned 256-bit integer.
//! - At most [`MAX_SELECTION_ROUNDS`] rounds contribute bits.
//! - Observers run after the computation and cannot change the result.

use std::collections::BTreeMap;

use tracing::debug;

use crate::chain::index::{BlockIndex, BlockIndexEntry};
use crate::config::{StakeParams, MAX_SELECTION_ROUNDS};
use crate::error::ModifierError;
use crate::stake::interval::selection_interval;
use crate::types::hash::Hash256;
use crate::types::id::BlockRef;

/// Outcome of one generator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierUpdate {
    /// A new modifier was generated at the tip.
    Generated(u64),
    /// Too early to regenerate; the new block stores no modifier.
    Unchanged,
}

impl ModifierUpdate {
    pub fn is_generated(&self) -> bool {
        matches!(self, ModifierUpdate::Generated(_))
    }

    /// `(modifier, generated)` as stored on the new entry; an unchanged
    /// update stores modifier 0.
    pub fn into_parts(self) -> (u64, bool) {
        match self {
            ModifierUpdate::Generated(modifier) => (modifier, true),
            ModifierUpdate::Unchanged => (0, false),
        }
    }
}

/// The last block a modifier was generated from.
///
/// Owned by the chain state and only mutated under its write lock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModifierCache {
    last: Option<BlockRef>,
}

impl ModifierCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<BlockRef> {
        self.last
    }
}

/// Which blocks fed a freshly generated modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionReport {
    pub tip: BlockRef,
    pub tip_height: u32,
    pub first_candidate_height: u32,
    pub candidate_count: usize,
    pub selected: BTreeMap<Hash256, BlockRef>,
    pub modifier: u64,
}

impl SelectionReport {
    /// One character per height in `[first_candidate_height, tip_height]`:
    /// `-` proof-of-work, `=` proof-of-stake, `W`/`S` the same when selected.
    pub fn selection_map(&self, index: &BlockIndex) -> String {
        let first = self.first_candidate_height;
        let len = (self.tip_height + 1).saturating_sub(first) as usize;
        let mut map = vec![b'-'; len];

        for entry in index.ancestors(self.tip) {
            if entry.height < first {
                break;
            }
            if entry.is_proof_of_stake() {
                map[(entry.height - first) as usize] = b'=';
            }
        }

        for id in self.selected.values() {
            if let Some(entry) = index.get(*id) {
                if let Some(slot) = entry.height.checked_sub(first).and_then(|i| map.get_mut(i as usize)) {
                    *slot = if entry.is_proof_of_stake() { b'S' } else { b'W' };
                }
            }
        }

        map.into_iter().map(char::from).collect()
    }
}

pub struct ModifierComputation {
    pub update: ModifierUpdate,
    /// Present only when a modifier was generated from a non-empty chain.
    pub report: Option<SelectionReport>,
}

impl ModifierComputation {
    fn unchanged() -> Self {
        Self { update: ModifierUpdate::Unchanged, report: None }
    }
}

/// Receives selection reports after each generated modifier.
pub trait SelectionObserver {
    fn on_selection(&self, index: &BlockIndex, report: &SelectionReport);
}

/// Logs the selection map at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SelectionObserver for TracingObserver {
    fn on_selection(&self, index: &BlockIndex, report: &SelectionReport) {
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                "ComputeNextStakeModifier: selection height [{}, {}] map {}",
                report.first_candidate_height,
                report.tip_height,
                report.selection_map(index)
            );
        }
    }
}

/// Computes the modifier for the block that will extend `tip`.
///
/// `tip` is `None` only when connecting the genesis block, whose modifier is 0.
pub fn compute_next_modifier(
    index: &BlockIndex,
    tip: Option<&BlockIndexEntry>,
    cache: &mut ModifierCache,
    params: &StakeParams,
) -> ModifierComputation {
    let Some(tip) = tip else {
        return ModifierComputation { update: ModifierUpdate::Generated(0), report: None };
    };

    match cache.last.and_then(|id| index.get(id)) {
        None => {
            if tip.time < params.genesis_epoch + params.modifier_interval {
                return ModifierComputation::unchanged();
            }
        }
        Some(last) => {
            debug!(
                "ComputeNextStakeModifier: prev modifier=0x{:016x} time={}",
                last.stake_modifier, last.time
            );
            if tip.time < last.time + params.modifier_interval {
                return ModifierComputation::unchanged();
            }
        }
    }
    cache.last = Some(tip.id);

    let interval_start =
        (tip.time / params.modifier_interval) * params.modifier_interval - selection_interval(params);

    let mut candidates: Vec<(i64, Hash256)> = Vec::new();
    let mut first_candidate_height = 0;
    for entry in index.ancestors(tip.id) {
        if entry.time < interval_start {
            first_candidate_height = entry.height + 1;
            break;
        }
        candidates.push((entry.time, entry.hash));
    }
    candidates.sort();

    let mut modifier = 0u64;
    let mut selected = BTreeMap::new();
    let rounds = candidates.len().min(MAX_SELECTION_ROUNDS);
    for (round, (_, hash)) in candidates.iter().take(rounds).enumerate() {
        // A candidate missing from the index contributes no bits for its round.
        if let Some(id) = index.lookup(hash) {
            let entry = &index[id];
            modifier |= (entry.time as u64) >> round;
            selected.insert(entry.hash, id);
        }
    }

    debug!(
        "ComputeNextStakeModifier: new modifier=0x{:016x} time={}",
        modifier, tip.time
    );

    ModifierComputation {
        update: ModifierUpdate::Generated(modifier),
        report: Some(SelectionReport {
            tip: tip.id,
            tip_height: tip.height,
            first_candidate_height,
            candidate_count: candidates.len(),
            selected,
            modifier,
        }),
    }
}

/// The modifier a kernel spending an output of a given block must use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelModifier {
    pub modifier: u64,
    pub height: u32,
    pub time: i64,
}

/// Finds the most recent modifier generated strictly before `source_hash`.
///
/// Running out of ancestors is a hard error in `verbose` mode or while the
/// source block is still within `stake_min_age - selection_interval` of
/// `now`; otherwise the caller should retry later.
pub fn kernel_stake_modifier(
    index: &BlockIndex,
    source_hash: &Hash256,
    now: i64,
    params: &StakeParams,
    verbose: bool,
) -> Result<KernelModifier, ModifierError> {
    let from = index
        .entry_by_hash(source_hash)
        .ok_or(ModifierError::NotIndexed(*source_hash))?;

    let mut cursor = from;
    loop {
        let Some(prev) = index.prev(cursor) else {
            let margin = params.stake_min_age - selection_interval(params);
            if verbose || from.time + margin > now {
                return Err(ModifierError::ReachedTip {
                    reached: cursor.hash,
                    height: cursor.height,
                    source_hash: *source_hash,
                });
            }
            return Err(ModifierError::Deferred { source_hash: *source_hash });
        };

        cursor = prev;
        if cursor.generated_modifier {
            return Ok(KernelModifier {
                modifier: cursor.stake_modifier,
                height: cursor.height,
                time: cursor.time,
            });
        }
    }
}
