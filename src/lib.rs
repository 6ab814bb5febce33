// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! stake-kernel: proof-of-stake kernel verification.
//!
//! Stake modifier generation, kernel hash target checks, coinstake
//! validation and the stake modifier checksum chain. Every result is a pure
//! function of the block index and the protocol parameters; the only
//! ambient input is the adjusted clock used to classify missing modifiers.

pub mod config;
pub mod error;
pub mod hash;
pub mod bignum;
pub mod types;
pub mod clock;
pub mod chain;
pub mod stake;

#[cfg(test)]
pub mod tests;

pub use chain::{BlockIndex, BlockIndexEntry, ChainState};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::StakeParams;
pub use error::{ChainError, ChecksumError, KernelError, ModifierError, ParamsError, PosError};
pub use types::{BlockRef, Hash256, NewBlock, OutPoint, SourceBlock, Transaction, TxIn, TxOut};
