// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Shared chain fixtures.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::chain::index::BlockIndex;
use crate::config::{StakeParams, COIN, GENESIS_EPOCH};
use crate::stake::checksum::CheckpointTable;
use crate::stake::modifier::{SelectionObserver, SelectionReport};
use crate::stake::proof::SignatureVerifier;
use crate::types::{Hash256, NewBlock, OutPoint, SourceBlock, Transaction, TxIn, TxOut};
use crate::ChainState;

pub const T0: i64 = GENESIS_EPOCH;

pub fn block_hash(n: u32, salt: u8) -> Hash256 {
    let mut bytes = [salt; 32];
    bytes[0..4].copy_from_slice(&n.to_le_bytes());
    Hash256(bytes)
}

pub fn genesis() -> NewBlock {
    NewBlock { hash: block_hash(0, 0xb0), prev_hash: None, time: T0, proof_hash: None }
}

pub fn child(prev: &NewBlock, n: u32, time: i64) -> NewBlock {
    NewBlock { hash: block_hash(n, 0xb0), prev_hash: Some(prev.hash), time, proof_hash: None }
}

/// Genesis followed by one block per timestamp.
pub fn linear_chain(times: &[i64]) -> Vec<NewBlock> {
    let mut blocks = vec![genesis()];
    for (i, t) in times.iter().enumerate() {
        let prev = blocks[i].clone();
        blocks.push(child(&prev, i as u32 + 1, *t));
    }
    blocks
}

/// Ten minute modifier interval keeps scenarios short.
pub fn short_params() -> StakeParams {
    StakeParams { modifier_interval: 600, ..StakeParams::default() }
}

pub fn build(params: StakeParams, checkpoints: CheckpointTable, blocks: &[NewBlock]) -> ChainState {
    let state = ChainState::new(params, checkpoints, blocks[0].clone()).unwrap();
    for b in &blocks[1..] {
        state.connect_block(b.clone()).unwrap();
    }
    state
}

/// A plain payment holding `value` in output 0.
pub fn funding_tx(value: i64) -> Transaction {
    Transaction {
        version: 1,
        time: T0 as u32,
        inputs: vec![TxIn::new(OutPoint::new(Hash256([0x42; 32]), 0))],
        outputs: vec![TxOut::new(value, vec![0x76, 0xa9])],
        lock_time: 0,
    }
}

pub fn coinstake_spending(prev: &Transaction, time: u32) -> Transaction {
    Transaction {
        version: 1,
        time,
        inputs: vec![TxIn::new(OutPoint::new(prev.txid(), 0))],
        outputs: vec![TxOut::empty(), TxOut::new(prev.outputs[0].value + COIN, vec![0x76, 0xa9])],
        lock_time: 0,
    }
}

/// Genesis plus a source block at `T0 + 600` holding `funding`.
pub fn staking_chain(params: StakeParams, funding: &Transaction) -> (ChainState, SourceBlock) {
    let blocks = linear_chain(&[T0 + 600]);
    let state = build(params, CheckpointTable::new(), &blocks);
    let source = SourceBlock {
        hash: blocks[1].hash,
        time: blocks[1].time as u32,
        transactions: vec![funding.clone()],
    };
    (state, source)
}

pub struct FixedVerifier(pub bool);

impl SignatureVerifier for FixedVerifier {
    fn verify_signature(&self, _from: &Transaction, _to: &Transaction, input_index: usize, check_output_scripts: bool, flags: u32) -> bool {
        assert_eq!(input_index, 0);
        assert!(check_output_scripts);
        assert_eq!(flags, 0);
        self.0
    }
}

/// Collects selection maps for inspection.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    pub maps: Arc<Mutex<Vec<String>>>,
}

impl SelectionObserver for RecordingObserver {
    fn on_selection(&self, index: &BlockIndex, report: &SelectionReport) {
        self.maps.lock().push(report.selection_map(index));
    }
}
