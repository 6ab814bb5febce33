// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Chain state: the block index, the modifier cache and the best tip behind
//! one lock.
//!
//! Connecting a block takes the write lock; validating candidates only needs
//! read locks and may run concurrently.

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::chain::index::{BlockIndex, BlockIndexEntry};
use crate::clock::{Clock, SystemClock};
use crate::config::StakeParams;
use crate::error::{ChainError, ChainResult, ModifierError, PosError};
use crate::stake::checksum::{check_checkpoints, stake_modifier_checksum, CheckpointTable};
use crate::stake::kernel::StakeContext;
use crate::stake::modifier::{
    compute_next_modifier, kernel_stake_modifier, KernelModifier, ModifierCache, SelectionObserver, TracingObserver,
};
use crate::stake::proof::{check_proof_of_stake, SignatureVerifier};
use crate::types::block::{NewBlock, SourceBlock};
use crate::types::hash::Hash256;
use crate::types::id::BlockRef;
use crate::types::transaction::Transaction;

struct ChainInner {
    index: BlockIndex,
    modifier_cache: ModifierCache,
    tip: BlockRef,
}

pub struct ChainState {
    params: StakeParams,
    checkpoints: CheckpointTable,
    clock: Box<dyn Clock + Send + Sync>,
    observer: Box<dyn SelectionObserver + Send + Sync>,
    inner: RwLock<ChainInner>,
}

impl ChainState {
    /// Creates a chain rooted at `genesis`, which must have no previous hash.
    pub fn new(params: StakeParams, checkpoints: CheckpointTable, genesis: NewBlock) -> ChainResult<Self> {
        params.validate()?;
        if let Some(prev_hash) = genesis.prev_hash {
            return Err(ChainError::UnknownPrevious(prev_hash));
        }
        let state = Self {
            params,
            checkpoints,
            clock: Box::new(SystemClock::default()),
            observer: Box::new(TracingObserver),
            inner: RwLock::new(ChainInner {
                index: BlockIndex::new(),
                modifier_cache: ModifierCache::new(),
                tip: BlockRef::default(),
            }),
        };
        state.connect_block(genesis)?;
        Ok(state)
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_observer(mut self, observer: impl SelectionObserver + Send + Sync + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn params(&self) -> &StakeParams {
        &self.params
    }

    pub fn checkpoints(&self) -> &CheckpointTable {
        &self.checkpoints
    }

    /// Indexes `block`, generating its stake modifier when due and
    /// extending the checksum chain.
    ///
    /// A rejected block leaves the index and the modifier cache untouched.
    pub fn connect_block(&self, block: NewBlock) -> ChainResult<BlockRef> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        if inner.index.contains(&block.hash) {
            return Err(ChainError::Duplicate(block.hash));
        }
        let prev = match block.prev_hash {
            Some(prev_hash) => Some(inner.index.lookup(&prev_hash).ok_or(ChainError::UnknownPrevious(prev_hash))?),
            None if !inner.index.is_empty() => return Err(ChainError::SecondGenesis(block.hash)),
            None => None,
        };

        let cache_before = inner.modifier_cache;
        let parent = prev.map(|id| &inner.index[id]);
        let computation = compute_next_modifier(&inner.index, parent, &mut inner.modifier_cache, &self.params);
        if let Some(report) = &computation.report {
            self.observer.on_selection(&inner.index, report);
        }

        // Blocks between interval boundaries store a zero modifier; the
        // resolver only ever reads generated entries.
        let (stake_modifier, generated_modifier) = computation.update.into_parts();
        let mut entry = BlockIndexEntry {
            id: inner.index.next_ref(),
            height: parent.map_or(0, |p| p.height + 1),
            hash: block.hash,
            time: block.time,
            prev,
            stake_modifier,
            generated_modifier,
            proof_of_stake: block.is_proof_of_stake(),
            proof_hash: block.proof_hash,
            checksum: 0,
        };

        entry.checksum = match stake_modifier_checksum(&inner.index, &entry) {
            Ok(checksum) => checksum,
            Err(e) => {
                inner.modifier_cache = cache_before;
                return Err(e.into());
            }
        };

        if !check_checkpoints(entry.height, &entry, &self.checkpoints, self.params.testnet) {
            inner.modifier_cache = cache_before;
            let expected = self.checkpoints.get(&entry.height).copied().unwrap_or_default();
            warn!(
                "ConnectBlock: rejected by stake modifier checkpoint height={} modifier=0x{:016x} checksum=0x{:08x}",
                entry.height, entry.stake_modifier, entry.checksum
            );
            return Err(ChainError::CheckpointMismatch { height: entry.height, expected, found: entry.checksum });
        }

        let height = entry.height;
        let id = match inner.index.insert(entry) {
            Ok(id) => id,
            Err(e) => {
                inner.modifier_cache = cache_before;
                return Err(e);
            }
        };
        if inner.index.len() == 1 || height > inner.index[inner.tip].height {
            inner.tip = id;
        }

        let connected = &inner.index[id];
        debug!(
            "ConnectBlock: height={} hash={} modifier=0x{:016x} generated={} checksum=0x{:08x}",
            connected.height, connected.hash, connected.stake_modifier, connected.generated_modifier, connected.checksum
        );
        Ok(id)
    }

    /// Runs `f` against a read-locked validation context.
    pub fn with_context<R>(&self, f: impl FnOnce(&StakeContext<'_>) -> R) -> R {
        let inner = self.inner.read();
        let ctx = StakeContext::new(&inner.index, &self.params, &*self.clock);
        f(&ctx)
    }

    pub fn check_proof_of_stake(
        &self,
        verifier: &dyn SignatureVerifier,
        tx: &Transaction,
        target_bits: u32,
        block_from: &SourceBlock,
        tx_time: u32,
    ) -> Result<Hash256, PosError> {
        self.with_context(|ctx| check_proof_of_stake(ctx, verifier, tx, target_bits, block_from, tx_time))
    }

    pub fn kernel_stake_modifier(&self, source_hash: &Hash256, verbose: bool) -> Result<KernelModifier, ModifierError> {
        let inner = self.inner.read();
        kernel_stake_modifier(&inner.index, source_hash, self.clock.adjusted_time(), &self.params, verbose)
    }

    /// Recomputes the checksum of an indexed block from its parent.
    pub fn stake_modifier_checksum(&self, hash: &Hash256) -> ChainResult<u32> {
        let inner = self.inner.read();
        let entry = inner.index.entry_by_hash(hash).ok_or(ChainError::UnknownBlock(*hash))?;
        Ok(stake_modifier_checksum(&inner.index, entry)?)
    }

    pub fn check_stake_modifier_checkpoints(&self, height: u32, hash: &Hash256) -> ChainResult<bool> {
        let inner = self.inner.read();
        let entry = inner.index.entry_by_hash(hash).ok_or(ChainError::UnknownBlock(*hash))?;
        Ok(check_checkpoints(height, entry, &self.checkpoints, self.params.testnet))
    }

    pub fn entry(&self, hash: &Hash256) -> Option<BlockIndexEntry> {
        self.inner.read().index.entry_by_hash(hash).cloned()
    }

    pub fn tip(&self) -> BlockIndexEntry {
        let inner = self.inner.read();
        inner.index[inner.tip].clone()
    }

    pub fn height(&self) -> u32 {
        let inner = self.inner.read();
        inner.index[inner.tip].height
    }

    pub fn len(&self) -> usize {
        self.inner.read().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().index.is_empty()
    }

    /// Entries in connection order.
    pub fn entries(&self) -> Vec<BlockIndexEntry> {
        self.inner.read().index.iter().cloned().collect()
    }
}
