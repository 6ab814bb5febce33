// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Network-adjusted wall clock.

use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock {
    /// Seconds since the Unix epoch, corrected by the peer time offset.
    fn adjusted_time(&self) -> i64;
}

/// System time plus a fixed offset learned from peers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    pub offset: i64,
}

impl Clock for SystemClock {
    fn adjusted_time(&self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        now + self.offset
    }
}

/// A clock frozen at one instant; used for replays and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn adjusted_time(&self) -> i64 {
        self.0
    }
}
