// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod index;
pub mod state;

pub use index::{BlockIndex, BlockIndexEntry};
pub use state::ChainState;
