// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity types.

/// Stable position of an entry in the block index arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct BlockRef(pub u32);

impl BlockRef {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
