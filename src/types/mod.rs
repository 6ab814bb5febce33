// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod id;
pub mod hash;
pub mod block;
pub mod transaction;

pub use block::{NewBlock, SourceBlock};
pub use hash::Hash256;
pub use id::BlockRef;
pub use transaction::{OutPoint, Transaction, TxIn, TxOut};
