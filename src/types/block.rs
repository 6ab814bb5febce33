// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Block-level inputs to the kernel.

use serde::{Deserialize, Serialize};

use crate::types::hash::Hash256;
use crate::types::transaction::Transaction;

/// The block that contains the output a coinstake spends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBlock {
    pub hash: Hash256,
    pub time: u32,
    pub transactions: Vec<Transaction>,
}

impl SourceBlock {
    pub fn find_transaction(&self, txid: &Hash256) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.txid() == *txid)
    }
}

/// A block being connected to the index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBlock {
    pub hash: Hash256,
    /// `None` only for the genesis block.
    #[serde(default)]
    pub prev_hash: Option<Hash256>,
    pub time: i64,
    /// Proof hash of the coinstake kernel; present only for proof-of-stake blocks.
    #[serde(default)]
    pub proof_hash: Option<Hash256>,
}

impl NewBlock {
    pub fn is_proof_of_stake(&self) -> bool {
        self.proof_hash.is_some()
    }
}
