// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Compact ("nBits") target encoding.
//!
//! The compact form is `[size: u8][sign: 1 bit][mantissa: 23 bits]` and
//! denotes `mantissa * 256^(size - 3)`. The sign bit is honoured, so decoded
//! targets are signed big integers; a negative target can never be met.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{Signed, ToPrimitive, Zero};

const SIGN_BIT: u32 = 0x0080_0000;
const MANTISSA_MASK: u32 = 0x007f_ffff;

pub fn decode_compact(bits: u32) -> BigInt {
    let size = (bits >> 24) as usize;
    let mantissa = bits & MANTISSA_MASK;

    let magnitude = if size <= 3 {
        BigUint::from(mantissa >> (8 * (3 - size)))
    } else {
        BigUint::from(mantissa) << (8 * (size - 3))
    };

    let sign = if bits & SIGN_BIT != 0 { Sign::Minus } else { Sign::Plus };
    BigInt::from_biguint(sign, magnitude)
}

pub fn encode_compact(value: &BigInt) -> u32 {
    let magnitude = value.magnitude();
    let mut size = ((magnitude.bits() + 7) / 8) as u32;

    let mut compact = if size <= 3 {
        let low = magnitude.to_u32().unwrap_or(0);
        low << (8 * (3 - size))
    } else {
        let shifted: BigUint = magnitude >> (8 * (size - 3));
        shifted.to_u32().unwrap_or(0)
    };

    // Keep the mantissa positive by moving into the next size byte.
    if compact & SIGN_BIT != 0 {
        compact >>= 8;
        size += 1;
    }

    compact |= size << 24;
    if value.is_negative() && !value.is_zero() {
        compact |= SIGN_BIT;
    }
    compact
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_difficulty_one() {
        let target = decode_compact(0x1d00_ffff);
        let expected = BigInt::from(0xffffu32) << (8 * (0x1d - 3));
        assert_eq!(target, expected);
        assert_eq!(encode_compact(&target), 0x1d00_ffff);
    }

    #[test]
    fn test_decode_small_sizes() {
        assert_eq!(decode_compact(0x0112_3456), BigInt::from(0x12));
        assert_eq!(decode_compact(0x0212_3456), BigInt::from(0x1234));
        assert_eq!(decode_compact(0x0312_3456), BigInt::from(0x12_3456));
        assert!(decode_compact(0x0000_0000).is_zero());
        assert!(decode_compact(0x0012_3456).is_zero());
    }

    #[test]
    fn test_decode_negative_flag() {
        let target = decode_compact(0x0392_3456);
        assert!(target.is_negative());
        assert_eq!(target, BigInt::from(-0x12_3456));
        assert_eq!(encode_compact(&target), 0x0392_3456);
    }

    #[test]
    fn test_encode_normalizes_high_mantissa_bit() {
        let value = BigInt::from(0x80u32);
        let bits = encode_compact(&value);
        assert_eq!(bits, 0x0200_8000);
        assert_eq!(decode_compact(bits), value);
    }
}
