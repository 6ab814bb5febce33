// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Stake record payload.
//!
//! # Layout (little-endian)
//! ```text
//! hash            32
//! prev_hash       32   zero for genesis
//! time             8   i64
//! stake_modifier   8   u64
//! flags            1   bit 0 generated, bit 1 proof-of-stake
//! proof_hash      32   zero for proof-of-work
//! stake_checksum   4   u32
//! ```

use std::io::{Cursor, Read};

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use stake_kernel::{BlockIndexEntry, Hash256, NewBlock};

use crate::error::{PersistenceError, Result};

const FLAG_GENERATED: u8 = 0b01;
const FLAG_PROOF_OF_STAKE: u8 = 0b10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeRecord {
    pub height: u32,
    pub hash: Hash256,
    pub prev_hash: Option<Hash256>,
    pub time: i64,
    pub stake_modifier: u64,
    pub generated_modifier: bool,
    pub proof_hash: Option<Hash256>,
    pub stake_checksum: u32,
}

impl StakeRecord {
    pub const PAYLOAD_SIZE: usize = 32 + 32 + 8 + 8 + 1 + 32 + 4;

    pub fn from_entry(entry: &BlockIndexEntry, prev_hash: Option<Hash256>) -> Self {
        Self {
            height: entry.height,
            hash: entry.hash,
            prev_hash,
            time: entry.time,
            stake_modifier: entry.stake_modifier,
            generated_modifier: entry.generated_modifier,
            proof_hash: if entry.proof_of_stake { entry.proof_hash } else { None },
            stake_checksum: entry.checksum,
        }
    }

    /// The block as it must be reconnected to rebuild the index.
    pub fn to_new_block(&self) -> NewBlock {
        NewBlock {
            hash: self.hash,
            prev_hash: self.prev_hash,
            time: self.time,
            proof_hash: self.proof_hash,
        }
    }

    pub fn is_proof_of_stake(&self) -> bool {
        self.proof_hash.is_some()
    }

    pub fn encode_payload(&self) -> [u8; Self::PAYLOAD_SIZE] {
        let mut flags = 0u8;
        if self.generated_modifier {
            flags |= FLAG_GENERATED;
        }
        if self.is_proof_of_stake() {
            flags |= FLAG_PROOF_OF_STAKE;
        }

        let mut buf = [0u8; Self::PAYLOAD_SIZE];
        buf[0..32].copy_from_slice(self.hash.as_bytes());
        buf[32..64].copy_from_slice(self.prev_hash.unwrap_or(Hash256::ZERO).as_bytes());
        LittleEndian::write_i64(&mut buf[64..72], self.time);
        LittleEndian::write_u64(&mut buf[72..80], self.stake_modifier);
        buf[80] = flags;
        buf[81..113].copy_from_slice(self.proof_hash.unwrap_or(Hash256::ZERO).as_bytes());
        LittleEndian::write_u32(&mut buf[113..117], self.stake_checksum);
        buf
    }

    pub fn decode_payload(height: u32, payload: &[u8]) -> Result<Self> {
        if payload.len() != Self::PAYLOAD_SIZE {
            return Err(PersistenceError::InvalidFormat(format!(
                "payload at height {} is {} bytes, expected {}",
                height,
                payload.len(),
                Self::PAYLOAD_SIZE
            )));
        }

        let mut cursor = Cursor::new(payload);
        let hash = read_hash(&mut cursor)?;
        let prev_hash = read_hash(&mut cursor)?;
        let time = cursor.read_i64::<LittleEndian>()?;
        let stake_modifier = cursor.read_u64::<LittleEndian>()?;
        let flags = cursor.read_u8()?;
        if flags & !(FLAG_GENERATED | FLAG_PROOF_OF_STAKE) != 0 {
            return Err(PersistenceError::InvalidFormat(format!(
                "unknown flags {:#04x} at height {}",
                flags, height
            )));
        }
        let proof_hash = read_hash(&mut cursor)?;
        let stake_checksum = cursor.read_u32::<LittleEndian>()?;

        Ok(Self {
            height,
            hash,
            prev_hash: if height == 0 { None } else { Some(prev_hash) },
            time,
            stake_modifier,
            generated_modifier: flags & FLAG_GENERATED != 0,
            proof_hash: if flags & FLAG_PROOF_OF_STAKE != 0 { Some(proof_hash) } else { None },
            stake_checksum,
        })
    }
}

fn read_hash(cursor: &mut Cursor<&[u8]>) -> Result<Hash256> {
    let mut bytes = [0u8; 32];
    cursor.read_exact(&mut bytes)?;
    Ok(Hash256(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(height: u32, pos: bool) -> StakeRecord {
        StakeRecord {
            height,
            hash: Hash256([height as u8 + 1; 32]),
            prev_hash: if height == 0 { None } else { Some(Hash256([height as u8; 32])) },
            time: 1_392_281_929 + height as i64 * 600,
            stake_modifier: 0x7fff_efdf,
            generated_modifier: height % 2 == 0,
            proof_hash: if pos { Some(Hash256([0xcc; 32])) } else { None },
            stake_checksum: 0xdead_beef,
        }
    }

    #[test]
    fn test_payload_layout() {
        let r = record(3, true);
        let bytes = r.encode_payload();
        assert_eq!(bytes.len(), StakeRecord::PAYLOAD_SIZE);
        assert_eq!(&bytes[0..32], &[4u8; 32]);
        assert_eq!(&bytes[32..64], &[3u8; 32]);
        assert_eq!(&bytes[72..80], &0x7fff_efdfu64.to_le_bytes());
        assert_eq!(bytes[80], FLAG_PROOF_OF_STAKE);
        assert_eq!(&bytes[113..117], &[0xef, 0xbe, 0xad, 0xde]);
        assert_eq!(StakeRecord::decode_payload(3, &bytes).unwrap(), r);
    }

    #[test]
    fn test_genesis_and_proof_of_work_decode_to_none() {
        let genesis = record(0, false);
        let bytes = genesis.encode_payload();
        assert_eq!(&bytes[32..64], &[0u8; 32]);
        assert_eq!(bytes[80], FLAG_GENERATED);
        let decoded = StakeRecord::decode_payload(0, &bytes).unwrap();
        assert_eq!(decoded.prev_hash, None);
        assert_eq!(decoded.proof_hash, None);
        assert_eq!(decoded.to_new_block().prev_hash, None);
    }

    #[test]
    fn test_rejects_malformed_payloads() {
        let mut bytes = record(2, false).encode_payload();
        assert!(matches!(
            StakeRecord::decode_payload(2, &bytes[..100]),
            Err(PersistenceError::InvalidFormat(_))
        ));
        bytes[80] = 0x80;
        assert!(matches!(
            StakeRecord::decode_payload(2, &bytes),
            Err(PersistenceError::InvalidFormat(_))
        ));
    }
}
