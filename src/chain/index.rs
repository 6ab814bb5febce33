// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Block index arena.
//!
//! Entries are appended and never moved, so a [`BlockRef`] stays valid for
//! the lifetime of the index. Back references are plain `BlockRef`s; walking
//! the chain hands out borrowed entries only.

use core::ops::Index;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};
use crate::types::hash::Hash256;
use crate::types::id::BlockRef;

/// Stake metadata of one connected block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockIndexEntry {
    /// Position in the arena; always equal to the slot the entry lives in.
    #[serde(skip)]
    pub id: BlockRef,
    pub height: u32,
    pub hash: Hash256,
    pub time: i64,
    #[serde(skip)]
    pub prev: Option<BlockRef>,
    pub stake_modifier: u64,
    /// The modifier was generated at this block rather than left at zero by the interval throttle.
    pub generated_modifier: bool,
    pub proof_of_stake: bool,
    pub proof_hash: Option<Hash256>,
    pub checksum: u32,
}

impl BlockIndexEntry {
    pub fn is_proof_of_stake(&self) -> bool {
        self.proof_of_stake
    }

    /// Proof hash as committed to by the checksum chain; zero for proof-of-work blocks.
    pub fn proof_hash_or_zero(&self) -> Hash256 {
        self.proof_hash.unwrap_or(Hash256::ZERO)
    }
}

#[derive(Debug, Default)]
pub struct BlockIndex {
    entries: Vec<BlockIndexEntry>,
    by_hash: FxHashMap<Hash256, BlockRef>,
}

impl BlockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Id the next inserted entry will receive.
    pub fn next_ref(&self) -> BlockRef {
        BlockRef(self.entries.len() as u32)
    }

    pub fn get(&self, id: BlockRef) -> Option<&BlockIndexEntry> {
        self.entries.get(id.index())
    }

    pub fn lookup(&self, hash: &Hash256) -> Option<BlockRef> {
        self.by_hash.get(hash).copied()
    }

    pub fn entry_by_hash(&self, hash: &Hash256) -> Option<&BlockIndexEntry> {
        self.lookup(hash).and_then(|id| self.get(id))
    }

    pub fn contains(&self, hash: &Hash256) -> bool {
        self.by_hash.contains_key(hash)
    }

    pub fn prev(&self, entry: &BlockIndexEntry) -> Option<&BlockIndexEntry> {
        entry.prev.and_then(|id| self.get(id))
    }

    pub fn genesis(&self) -> Option<&BlockIndexEntry> {
        self.entries.first()
    }

    /// True for the root of this index, or for a prev-less entry offered to an empty index.
    pub fn is_genesis(&self, entry: &BlockIndexEntry) -> bool {
        entry.prev.is_none() && self.genesis().map_or(true, |g| g.hash == entry.hash)
    }

    /// Walks from `start` back to the root, `start` included.
    pub fn ancestors(&self, start: BlockRef) -> Ancestors<'_> {
        Ancestors { index: self, next: self.get(start) }
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockIndexEntry> {
        self.entries.iter()
    }

    /// Appends an entry. Its `id` is assigned here.
    pub fn insert(&mut self, mut entry: BlockIndexEntry) -> ChainResult<BlockRef> {
        if self.by_hash.contains_key(&entry.hash) {
            return Err(ChainError::Duplicate(entry.hash));
        }
        match entry.prev {
            Some(prev) if self.get(prev).is_none() => {
                return Err(ChainError::UnknownPrevious(entry.hash));
            }
            None if !self.entries.is_empty() => {
                return Err(ChainError::SecondGenesis(entry.hash));
            }
            _ => {}
        }

        let id = self.next_ref();
        entry.id = id;
        self.by_hash.insert(entry.hash, id);
        self.entries.push(entry);
        Ok(id)
    }
}

impl Index<BlockRef> for BlockIndex {
    type Output = BlockIndexEntry;

    fn index(&self, id: BlockRef) -> &BlockIndexEntry {
        &self.entries[id.index()]
    }
}

pub struct Ancestors<'a> {
    index: &'a BlockIndex,
    next: Option<&'a BlockIndexEntry>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a BlockIndexEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.index.prev(current);
        Some(current)
    }
}
