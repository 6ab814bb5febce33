// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Proof-of-stake kernel protocol.

pub mod interval;
pub mod modifier;
pub mod kernel;
pub mod proof;
pub mod checksum;

pub use checksum::{check_checkpoints, stake_modifier_checksum, CheckpointTable};
pub use kernel::{check_kernel_hash, StakeContext};
pub use modifier::{compute_next_modifier, kernel_stake_modifier, ModifierCache, ModifierUpdate};
pub use proof::{check_coinstake_timestamp, check_proof_of_stake, SignatureVerifier};
