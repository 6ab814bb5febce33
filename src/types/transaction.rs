// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Transactions, as far as the stake kernel needs them.

use serde::{Deserialize, Serialize};

use crate::hash::HashWriter;
use crate::types::hash::Hash256;

/// Reference to an output of a previous transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash256,
    pub n: u32,
}

impl OutPoint {
    pub fn new(hash: Hash256, n: u32) -> Self {
        Self { hash, n }
    }

    pub fn null() -> Self {
        Self { hash: Hash256::ZERO, n: u32::MAX }
    }

    pub fn is_null(&self) -> bool {
        self.hash.is_zero() && self.n == u32::MAX
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    pub prevout: OutPoint,
    #[serde(with = "hex::serde", default)]
    pub script_sig: Vec<u8>,
    #[serde(default = "final_sequence")]
    pub sequence: u32,
}

fn final_sequence() -> u32 {
    u32::MAX
}

impl TxIn {
    pub fn new(prevout: OutPoint) -> Self {
        Self { prevout, script_sig: Vec::new(), sequence: u32::MAX }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    pub value: i64,
    #[serde(with = "hex::serde", default)]
    pub script_pubkey: Vec<u8>,
}

impl TxOut {
    pub fn new(value: i64, script_pubkey: Vec<u8>) -> Self {
        Self { value, script_pubkey }
    }

    pub fn empty() -> Self {
        Self { value: 0, script_pubkey: Vec::new() }
    }

    /// The marker output a coinstake places first.
    pub fn is_empty(&self) -> bool {
        self.value == 0 && self.script_pubkey.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub time: u32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    #[serde(default)]
    pub lock_time: u32,
}

impl Transaction {
    /// Double SHA-256 of the canonical little-endian encoding.
    pub fn txid(&self) -> Hash256 {
        let mut w = HashWriter::new();
        w.write_u32(self.version).write_u32(self.time);

        w.write_compact_size(self.inputs.len());
        for input in &self.inputs {
            w.write_hash(&input.prevout.hash)
                .write_u32(input.prevout.n)
                .write_var_bytes(&input.script_sig)
                .write_u32(input.sequence);
        }

        w.write_compact_size(self.outputs.len());
        for output in &self.outputs {
            w.write_i64(output.value).write_var_bytes(&output.script_pubkey);
        }

        w.write_u32(self.lock_time);
        w.finish()
    }

    /// A coinstake spends a real output and marks itself with an empty first output.
    pub fn is_coinstake(&self) -> bool {
        match (self.inputs.first(), self.outputs.first()) {
            (Some(input), Some(marker)) => {
                !input.prevout.is_null() && self.outputs.len() >= 2 && marker.is_empty()
            }
            _ => false,
        }
    }
}
