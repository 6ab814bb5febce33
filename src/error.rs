// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

use crate::types::hash::Hash256;

/// Misbehaviour score for failures plausibly caused by sync lag.
pub const DOS_LOW: u32 = 1;
/// Misbehaviour score for cryptographic or structural forgery.
pub const DOS_HIGH: u32 = 100;

/// Failure to find the modifier a kernel must be hashed with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModifierError {
    #[error("block {0} not indexed")]
    NotIndexed(Hash256),

    #[error("reached best block {reached} at height {height} from block {source_hash}")]
    ReachedTip {
        reached: Hash256,
        height: u32,
        source_hash: Hash256,
    },

    /// The chain does not extend far enough yet; retry once more blocks arrive.
    #[error("stake modifier for block {source_hash} not yet available")]
    Deferred { source_hash: Hash256 },
}

impl ModifierError {
    /// Soft failures (`Deferred`) are expected while syncing.
    pub fn is_hard(&self) -> bool {
        !matches!(self, ModifierError::Deferred { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("nTime violation: candidate time {candidate_time} precedes source time {source_time}")]
    TimestampViolation { source_time: u32, candidate_time: u32 },

    #[error("min age violation: source time {source_time} + {min_age}s > candidate time {candidate_time}")]
    MinAgeViolation {
        source_time: u32,
        candidate_time: u32,
        min_age: i64,
    },

    #[error("output index {index} out of range ({outputs} outputs)")]
    OutputIndexOutOfRange { index: u32, outputs: usize },

    #[error("stake modifier: {0}")]
    Modifier(#[from] ModifierError),

    /// Not a protocol violation: the kernel simply does not prove stake.
    #[error("proof hash {proof_hash} does not meet target")]
    TargetNotMet { proof_hash: Hash256 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PosError {
    #[error("called on non-coinstake {0}")]
    NotCoinstake(Hash256),

    #[error("source transaction {0} not found in source block")]
    SourceTxMissing(Hash256),

    #[error("signature verification failed on coinstake {0}")]
    BadSignature(Hash256),

    #[error("check kernel failed on coinstake {txid}: {source}")]
    KernelCheckFailed {
        txid: Hash256,
        #[source]
        source: KernelError,
    },
}

impl PosError {
    /// Penalty the caller should apply to the peer that relayed the block.
    pub fn dos_score(&self) -> u32 {
        match self {
            PosError::NotCoinstake(_) | PosError::BadSignature(_) => DOS_HIGH,
            PosError::SourceTxMissing(_) | PosError::KernelCheckFailed { .. } => DOS_LOW,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChecksumError {
    #[error("block {0} has no previous entry and is not the genesis block")]
    MissingPrevious(Hash256),
}

/// Stake parameters no network could run with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("modifier interval must be positive, got {0}")]
    ModifierInterval(i64),

    #[error("modifier interval ratio must be at least 1, got {0}")]
    ModifierIntervalRatio(i64),

    #[error("stake min age {min_age} must be non-negative and at most max age {max_age}")]
    StakeAge { min_age: i64, max_age: i64 },

    #[error("coin value must be positive, got {0}")]
    Coin(i64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("previous block {0} not indexed")]
    UnknownPrevious(Hash256),

    #[error("block {0} already indexed")]
    Duplicate(Hash256),

    #[error("block {0} has no previous block but the index already has a genesis")]
    SecondGenesis(Hash256),

    #[error("block {0} not indexed")]
    UnknownBlock(Hash256),

    #[error("stake modifier checkpoint mismatch at height {height}: expected {expected:#010x}, found {found:#010x}")]
    CheckpointMismatch { height: u32, expected: u32, found: u32 },

    #[error("checksum: {0}")]
    Checksum(#[from] ChecksumError),

    #[error("invalid stake parameters: {0}")]
    InvalidParams(#[from] ParamsError),
}

pub type KernelResult<T> = core::result::Result<T, KernelError>;
pub type ChainResult<T> = core::result::Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dos_scores() {
        let h = Hash256::ZERO;
        assert_eq!(PosError::NotCoinstake(h).dos_score(), DOS_HIGH);
        assert_eq!(PosError::BadSignature(h).dos_score(), DOS_HIGH);
        assert_eq!(PosError::SourceTxMissing(h).dos_score(), DOS_LOW);
        let kernel = PosError::KernelCheckFailed {
            txid: h,
            source: KernelError::TargetNotMet { proof_hash: h },
        };
        assert_eq!(kernel.dos_score(), DOS_LOW);
    }

    #[test]
    fn test_modifier_error_severity() {
        let h = Hash256::ZERO;
        assert!(ModifierError::NotIndexed(h).is_hard());
        assert!(ModifierError::ReachedTip { reached: h, height: 0, source_hash: h }.is_hard());
        assert!(!ModifierError::Deferred { source_hash: h }.is_hard());
    }
}
