// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! 256-bit hash values.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 256-bit hash stored as raw digest bytes.
///
/// The bytes are interpreted as a little-endian unsigned integer: byte 31 is
/// the most significant. Ordering, big-integer conversion and the hex form all
/// follow that interpretation, so `Display` prints the bytes reversed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Hash256(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Unsigned integer value of the hash.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.0)
    }

    pub fn to_bigint(&self) -> BigInt {
        BigInt::from_biguint(Sign::Plus, self.to_biguint())
    }

    /// The hash shifted right by 224 bits, i.e. its most significant 32 bits.
    pub fn high_u32(&self) -> u32 {
        u32::from_le_bytes([self.0[28], self.0[29], self.0[30], self.0[31]])
    }
}

impl Ord for Hash256 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl PartialOrd for Hash256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&hex::encode(reversed))
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid 256-bit hash: {0}")]
pub struct ParseHashError(String);

impl FromStr for Hash256 {
    type Err = ParseHashError;

    /// Parses the display form (64 hex digits, most significant byte first).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| ParseHashError(format!("{s}: {e}")))?;
        bytes.reverse();
        Ok(Hash256(bytes))
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Hash256(bytes)
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_byte(index: usize, value: u8) -> Hash256 {
        let mut bytes = [0u8; 32];
        bytes[index] = value;
        Hash256(bytes)
    }

    #[test]
    fn test_ordering_is_numeric() {
        // Byte 31 outweighs byte 0 regardless of raw lexical order.
        let low = with_byte(0, 0xff);
        let high = with_byte(31, 0x01);
        assert!(low < high);
        assert_eq!(low.to_biguint(), BigUint::from(0xffu32));
        assert!(low.to_biguint() < high.to_biguint());
    }

    #[test]
    fn test_display_parse() {
        let h = with_byte(31, 0xab);
        let text = h.to_string();
        assert!(text.starts_with("ab"));
        assert_eq!(text.len(), 64);
        assert_eq!(text.parse::<Hash256>().unwrap(), h);
        assert!("zz".parse::<Hash256>().is_err());
    }

    #[test]
    fn test_high_u32() {
        let mut bytes = [0u8; 32];
        bytes[28..32].copy_from_slice(&0xdead_beefu32.to_le_bytes());
        bytes[0] = 0x77;
        assert_eq!(Hash256(bytes).high_u32(), 0xdead_beef);
        let shifted = Hash256(bytes).to_biguint() >> 224u32;
        assert_eq!(shifted, BigUint::from(0xdead_beefu32));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let h = with_byte(1, 0x10);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", h));
        let back: Hash256 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }
}
