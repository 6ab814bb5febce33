// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Protocol constants and tunable stake parameters.

use serde::{Deserialize, Serialize};

use crate::error::ParamsError;

/// Checksum assigned to the genesis entry of every chain.
pub const GENESIS_CHECKSUM: u32 = 3437301338;

/// Timestamp the modifier throttle measures from before any modifier was generated.
pub const GENESIS_EPOCH: i64 = 1392281929;

/// Number of selection sections making up one selection interval.
pub const SELECTION_SECTIONS: usize = 64;

/// Maximum number of selection rounds contributing bits to a new modifier.
pub const MAX_SELECTION_ROUNDS: usize = 6;

/// Allowed lead of a block timestamp over its coinstake timestamp.
pub const COINSTAKE_TIMESTAMP_SLACK: i64 = 10;

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

pub const COIN: i64 = 100_000_000;

/// Scale factor applied to the coin-day weighted target (protocol v0.3).
pub const PROTOCOL_SCALE: u32 = 1_000_000;

/// Stake protocol parameters.
///
/// Every node on a network must agree on these values; they are plain data
/// so tools can load them from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakeParams {
    /// Seconds between modifier regenerations.
    pub modifier_interval: i64,
    /// Ratio between the longest and the shortest selection section.
    pub modifier_interval_ratio: i64,
    pub stake_min_age: i64,
    pub stake_max_age: i64,
    pub coin: i64,
    pub protocol_scale: u32,
    pub genesis_epoch: i64,
    /// Test networks skip hard checkpoints.
    pub testnet: bool,
    /// Emits kernel diagnostics for every checked coinstake.
    pub debug: bool,
}

impl Default for StakeParams {
    fn default() -> Self {
        Self {
            modifier_interval: 6 * 60 * 60,
            modifier_interval_ratio: 3,
            stake_min_age: 30 * SECONDS_PER_DAY,
            stake_max_age: 90 * SECONDS_PER_DAY,
            coin: COIN,
            protocol_scale: PROTOCOL_SCALE,
            genesis_epoch: GENESIS_EPOCH,
            testnet: false,
            debug: false,
        }
    }
}

impl StakeParams {
    pub fn mainnet() -> Self {
        Self::default()
    }

    pub fn testnet() -> Self {
        Self {
            modifier_interval: 20 * 60,
            stake_min_age: 60 * 60,
            testnet: true,
            ..Self::default()
        }
    }

    /// Rejects values the interval and weight arithmetic cannot run with.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.modifier_interval <= 0 {
            return Err(ParamsError::ModifierInterval(self.modifier_interval));
        }
        if self.modifier_interval_ratio < 1 {
            return Err(ParamsError::ModifierIntervalRatio(self.modifier_interval_ratio));
        }
        if self.stake_min_age < 0 || self.stake_min_age > self.stake_max_age {
            return Err(ParamsError::StakeAge { min_age: self.stake_min_age, max_age: self.stake_max_age });
        }
        if self.coin <= 0 {
            return Err(ParamsError::Coin(self.coin));
        }
        Ok(())
    }
}
