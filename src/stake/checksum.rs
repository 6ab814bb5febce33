// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Stake modifier checksums and hard checkpoints.
//!
//! Each entry's checksum commits to its parent's checksum, its proof hash and
//! its modifier, so a checkpointed checksum pins the whole modifier history
//! below it.
//!
//! # Hash Input Structure
//! ```text
//! prev checksum (u32 LE)
//! proof hash    (32 raw bytes, zero for proof-of-work)
//! modifier      (u64 LE)
//! ```
//! The checksum is the top 32 bits of the double SHA-256 of that preimage.

use std::collections::BTreeMap;

use byteorder::{ByteOrder, LittleEndian};

use crate::chain::index::{BlockIndex, BlockIndexEntry};
use crate::config::GENESIS_CHECKSUM;
use crate::error::ChecksumError;
use crate::hash::sha256d;
use crate::types::hash::Hash256;

/// Expected checksum by height.
pub type CheckpointTable = BTreeMap<u32, u32>;

const PREIMAGE_SIZE: usize = 4 + 32 + 8;

/// Checksum of a non-genesis entry from its parts.
pub fn checksum_from_parts(prev_checksum: u32, proof_hash: &Hash256, modifier: u64) -> u32 {
    let mut buf = [0u8; PREIMAGE_SIZE];
    LittleEndian::write_u32(&mut buf[0..4], prev_checksum);
    buf[4..36].copy_from_slice(proof_hash.as_bytes());
    LittleEndian::write_u64(&mut buf[36..44], modifier);
    sha256d(&buf).high_u32()
}

/// Checksum of `entry`, whose parent (if any) must already be in `index`.
pub fn stake_modifier_checksum(index: &BlockIndex, entry: &BlockIndexEntry) -> Result<u32, ChecksumError> {
    if index.is_genesis(entry) {
        return Ok(GENESIS_CHECKSUM);
    }
    let prev = index.prev(entry).ok_or(ChecksumError::MissingPrevious(entry.hash))?;
    Ok(checksum_from_parts(prev.checksum, &entry.proof_hash_or_zero(), entry.stake_modifier))
}

/// Test networks carry no checkpoints; elsewhere a listed height must match.
pub fn check_checkpoints(height: u32, entry: &BlockIndexEntry, table: &CheckpointTable, testnet: bool) -> bool {
    if testnet {
        return true;
    }
    match table.get(&height) {
        Some(expected) => entry.checksum == *expected,
        None => true,
    }
}
