// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Consensus hashing.
//!
//! Every consensus hash (kernel proof, modifier checksum, txid) is a double
//! SHA-256 over a little-endian byte preimage. Preimages are built with
//! [`HashWriter`], which mirrors the field-by-field layout the protocol uses.

use sha2::{Digest, Sha256};

use crate::types::hash::Hash256;

/// SHA-256 applied twice.
pub fn sha256d(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    Hash256(second.into())
}

/// Streaming preimage builder for [`sha256d`].
#[derive(Clone, Default)]
pub struct HashWriter {
    inner: Sha256,
}

impl HashWriter {
    pub fn new() -> Self {
        Self { inner: Sha256::new() }
    }

    pub fn write(&mut self, bytes: &[u8]) -> &mut Self {
        self.inner.update(bytes);
        self
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.write(&value.to_le_bytes())
    }

    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.write(&value.to_le_bytes())
    }

    pub fn write_i64(&mut self, value: i64) -> &mut Self {
        self.write(&value.to_le_bytes())
    }

    pub fn write_hash(&mut self, hash: &Hash256) -> &mut Self {
        self.write(hash.as_bytes())
    }

    /// Bitcoin-style variable length integer.
    pub fn write_compact_size(&mut self, len: usize) -> &mut Self {
        let len = len as u64;
        if len < 0xfd {
            self.write(&[len as u8])
        } else if len <= 0xffff {
            self.write(&[0xfd]).write(&(len as u16).to_le_bytes())
        } else if len <= 0xffff_ffff {
            self.write(&[0xfe]).write_u32(len as u32)
        } else {
            self.write(&[0xff]).write_u64(len)
        }
    }

    pub fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_compact_size(bytes.len()).write(bytes)
    }

    pub fn finish(self) -> Hash256 {
        let first = self.inner.finalize();
        Hash256(Sha256::digest(first).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256d_known_vector() {
        // Double SHA-256 of the empty string.
        let expected = "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456";
        assert_eq!(hex::encode(sha256d(b"").as_bytes()), expected);
    }

    #[test]
    fn test_writer_matches_one_shot() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&7u64.to_le_bytes());
        buf.extend_from_slice(&9u32.to_le_bytes());

        let mut writer = HashWriter::new();
        writer.write_u64(7).write_u32(9);
        assert_eq!(writer.finish(), sha256d(&buf));
    }

    #[test]
    fn test_compact_size_prefixes() {
        let mut small = HashWriter::new();
        small.write_compact_size(3);
        assert_eq!(small.finish(), sha256d(&[3]));

        let mut medium = HashWriter::new();
        medium.write_compact_size(0x1234);
        assert_eq!(medium.finish(), sha256d(&[0xfd, 0x34, 0x12]));
    }
}
