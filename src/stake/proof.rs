// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Coinstake validation.

use tracing::debug;

use crate::config::COINSTAKE_TIMESTAMP_SLACK;
use crate::error::PosError;
use crate::stake::kernel::{check_kernel_hash, StakeContext};
use crate::types::block::SourceBlock;
use crate::types::hash::Hash256;
use crate::types::transaction::Transaction;

/// Script/signature verification, provided by the transaction subsystem.
pub trait SignatureVerifier {
    fn verify_signature(
        &self,
        tx_from: &Transaction,
        tx_to: &Transaction,
        input_index: usize,
        check_output_scripts: bool,
        flags: u32,
    ) -> bool;
}

/// Checks the kernel hash target and the coinstake signature.
///
/// `block_from` is the block holding the transaction the coinstake's first
/// input spends.
pub fn check_proof_of_stake(
    ctx: &StakeContext<'_>,
    verifier: &dyn SignatureVerifier,
    tx: &Transaction,
    target_bits: u32,
    block_from: &SourceBlock,
    tx_time: u32,
) -> Result<Hash256, PosError> {
    let txid = tx.txid();
    if !tx.is_coinstake() {
        return Err(PosError::NotCoinstake(txid));
    }

    // is_coinstake guarantees an input.
    let prevout = match tx.inputs.first() {
        Some(input) => input.prevout,
        None => return Err(PosError::NotCoinstake(txid)),
    };

    // May simply not be downloaded yet during initial sync.
    let tx_prev = block_from
        .find_transaction(&prevout.hash)
        .ok_or(PosError::SourceTxMissing(prevout.hash))?;

    if !verifier.verify_signature(tx_prev, tx, 0, true, 0) {
        return Err(PosError::BadSignature(txid));
    }

    let proof = check_kernel_hash(
        ctx,
        target_bits,
        block_from.time,
        &block_from.hash,
        tx_prev,
        prevout.n,
        tx_time,
        ctx.params.debug,
    )
    .map_err(|source| PosError::KernelCheckFailed { txid, source })?;

    debug!("CheckProofOfStake: coinstake {} hashProof={}", txid, proof);
    Ok(proof)
}

/// A block may lead its coinstake timestamp by at most ten seconds.
pub fn check_coinstake_timestamp(block_time: i64, tx_time: i64) -> bool {
    block_time <= tx_time + COINSTAKE_TIMESTAMP_SLACK
}
