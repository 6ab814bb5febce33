// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Kernel hash target check (protocol v0.3).
//!
//! A coinstake's kernel (input 0) must satisfy
//!
//! ```text
//! sha256d(modifier | block_from_time | tx_prev_time | prevout.n | tx_time)
//!     <= coin_day_weight * target_per_coin_day * protocol_scale
//! ```
//!
//! so the chance of finding a kernel is proportional to the coin age the
//! staker controls. Block and transaction hashes are deliberately absent
//! from the preimage: they can be ground in bulk.

use byteorder::{ByteOrder, LittleEndian};
use num_bigint::BigInt;
use tracing::{debug, info};

use crate::bignum::decode_compact;
use crate::chain::index::BlockIndex;
use crate::clock::Clock;
use crate::config::{StakeParams, SECONDS_PER_DAY};
use crate::error::{KernelError, KernelResult};
use crate::hash::sha256d;
use crate::stake::modifier::{kernel_stake_modifier, KernelModifier};
use crate::types::hash::Hash256;
use crate::types::transaction::Transaction;

/// Read-only view the validation functions run against.
#[derive(Clone, Copy)]
pub struct StakeContext<'a> {
    pub index: &'a BlockIndex,
    pub params: &'a StakeParams,
    pub clock: &'a dyn Clock,
}

impl<'a> StakeContext<'a> {
    pub fn new(index: &'a BlockIndex, params: &'a StakeParams, clock: &'a dyn Clock) -> Self {
        Self { index, params, clock }
    }
}

/// Fields hashed into the kernel proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelInput {
    pub modifier: u64,
    pub block_from_time: u32,
    /// Equal to `block_from_time` in this protocol version.
    pub tx_prev_time: u32,
    pub prevout_n: u32,
    pub tx_time: u32,
}

impl KernelInput {
    pub const SIZE: usize = 8 + 4 + 4 + 4 + 4;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        LittleEndian::write_u64(&mut buf[0..8], self.modifier);
        LittleEndian::write_u32(&mut buf[8..12], self.block_from_time);
        LittleEndian::write_u32(&mut buf[12..16], self.tx_prev_time);
        LittleEndian::write_u32(&mut buf[16..20], self.prevout_n);
        LittleEndian::write_u32(&mut buf[20..24], self.tx_time);
        buf
    }

    pub fn proof_hash(&self) -> Hash256 {
        sha256d(&self.to_bytes())
    }
}

/// `value_in * time_weight / coin / 86400`, truncating after each step.
pub fn coin_day_weight(value_in: i64, time_weight: i64, params: &StakeParams) -> BigInt {
    BigInt::from(value_in) * BigInt::from(time_weight) / BigInt::from(params.coin) / BigInt::from(SECONDS_PER_DAY)
}

/// Checks that spending output `output_index` of `tx_prev` at `tx_time`
/// proves stake, returning the proof hash on success.
#[allow(clippy::too_many_arguments)]
pub fn check_kernel_hash(
    ctx: &StakeContext<'_>,
    target_bits: u32,
    block_from_time: u32,
    block_from_hash: &Hash256,
    tx_prev: &Transaction,
    output_index: u32,
    tx_time: u32,
    verbose: bool,
) -> KernelResult<Hash256> {
    let params = ctx.params;
    let tx_prev_time = block_from_time;

    if tx_time < tx_prev_time {
        return Err(KernelError::TimestampViolation { source_time: tx_prev_time, candidate_time: tx_time });
    }
    if i64::from(block_from_time) + params.stake_min_age > i64::from(tx_time) {
        return Err(KernelError::MinAgeViolation {
            source_time: block_from_time,
            candidate_time: tx_time,
            min_age: params.stake_min_age,
        });
    }

    let target_per_coin_day = decode_compact(target_bits);
    let value_in = tx_prev
        .outputs
        .get(output_index as usize)
        .ok_or(KernelError::OutputIndexOutOfRange { index: output_index, outputs: tx_prev.outputs.len() })?
        .value;

    // Weight starts from zero at the minimum age.
    let time_weight = (i64::from(tx_time) - i64::from(tx_prev_time)).min(params.stake_max_age) - params.stake_min_age;
    let weight = coin_day_weight(value_in, time_weight, params);

    let modifier = kernel_stake_modifier(ctx.index, block_from_hash, ctx.clock.adjusted_time(), params, verbose)?;

    let input = KernelInput {
        modifier: modifier.modifier,
        block_from_time,
        tx_prev_time,
        prevout_n: output_index,
        tx_time,
    };
    let proof_hash = input.proof_hash();

    if verbose {
        log_kernel(ctx, "check", &modifier, block_from_hash, &input, &proof_hash, true);
    }

    let limit = weight * target_per_coin_day * BigInt::from(params.protocol_scale);
    if proof_hash.to_bigint() > limit {
        return Err(KernelError::TargetNotMet { proof_hash });
    }

    if !verbose {
        log_kernel(ctx, "pass", &modifier, block_from_hash, &input, &proof_hash, false);
    }
    Ok(proof_hash)
}

fn log_kernel(
    ctx: &StakeContext<'_>,
    stage: &str,
    modifier: &KernelModifier,
    block_from_hash: &Hash256,
    input: &KernelInput,
    proof_hash: &Hash256,
    verbose: bool,
) {
    let from_height = ctx.index.entry_by_hash(block_from_hash).map(|e| e.height);
    if verbose {
        info!(
            "CheckStakeKernelHash: {stage} modifier=0x{:016x} at height={} time={} for block from height={:?} time={} nPrevout={} nTimeTx={} hashProof={}",
            modifier.modifier, modifier.height, modifier.time, from_height,
            input.block_from_time, input.prevout_n, input.tx_time, proof_hash
        );
    } else {
        debug!(
            "CheckStakeKernelHash: {stage} modifier=0x{:016x} at height={} time={} for block from height={:?} time={} nPrevout={} nTimeTx={} hashProof={}",
            modifier.modifier, modifier.height, modifier.time, from_height,
            input.block_from_time, input.prevout_n, input.tx_time, proof_hash
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preimage_layout() {
        let input = KernelInput {
            modifier: 0x0102_0304_0506_0708,
            block_from_time: 0x1111_1111,
            tx_prev_time: 0x1111_1111,
            prevout_n: 2,
            tx_time: 0x2222_2222,
        };
        let bytes = input.to_bytes();
        assert_eq!(&bytes[0..8], &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[8..12], &[0x11; 4]);
        assert_eq!(&bytes[12..16], &[0x11; 4]);
        assert_eq!(&bytes[16..20], &[2, 0, 0, 0]);
        assert_eq!(&bytes[20..24], &[0x22; 4]);
        assert_eq!(input.proof_hash(), sha256d(&bytes));
    }

    #[test]
    fn test_coin_day_weight_truncates_in_order() {
        let params = StakeParams::default();
        // 1.5 coins held for one day is 1 coin-day after truncation.
        assert_eq!(coin_day_weight(150_000_000, SECONDS_PER_DAY, &params), BigInt::from(1));
        // Dividing by the coin first would lose the sub-coin value entirely.
        assert_eq!(coin_day_weight(50_000_000, 2 * SECONDS_PER_DAY, &params), BigInt::from(1));
        assert_eq!(coin_day_weight(0, 90 * SECONDS_PER_DAY, &params), BigInt::from(0));
        assert_eq!(coin_day_weight(-150_000_000, SECONDS_PER_DAY, &params), BigInt::from(-1));
    }
}
