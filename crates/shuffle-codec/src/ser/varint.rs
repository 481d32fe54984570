// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! ULEB128 length prefixes.
//!
//! Every composite codec writes its element count with this encoding:
//! 7 data bits per byte, least significant group first, bit 7 set on every
//! byte except the last.
//!
//! ```text
//! 3     -> 03
//! 300   -> AC 02
//! 16384 -> 80 80 01
//! ```
//!
//! The encoder always emits the shortest form, so equal counts produce equal
//! bytes and length prefixes never break codec determinism.

use crate::config::MAX_VARINT_LEN;
use std::fmt;

const CONTINUATION_BIT: u8 = 0x80;
const DATA_MASK: u8 = 0x7F;

/// Malformed varint input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    /// Input ended while the continuation bit was still set.
    Truncated,
    /// More than 10 bytes, or a 10th byte carrying bits beyond 2^64.
    Overflow,
}

impl fmt::Display for VarintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "varint truncated before its final byte"),
            Self::Overflow => write!(f, "varint overflows u64"),
        }
    }
}

impl std::error::Error for VarintError {}

/// Encode `value` into a stack buffer; returns the buffer and the used length.
#[inline]
#[must_use]
pub fn encode(mut value: u64) -> ([u8; MAX_VARINT_LEN], usize) {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let mut len = 0;
    loop {
        let group = (value & u64::from(DATA_MASK)) as u8;
        value >>= 7;
        if value == 0 {
            buf[len] = group;
            return (buf, len + 1);
        }
        buf[len] = group | CONTINUATION_BIT;
        len += 1;
    }
}

/// Number of bytes [`encode`] produces for `value`.
#[inline]
#[must_use]
pub const fn encoded_len(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Decode one varint from the front of `buf`.
///
/// Returns the value and the number of bytes consumed; bytes after the
/// terminating group are left untouched.
pub fn decode(buf: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut value: u64 = 0;
    for (i, &byte) in buf.iter().enumerate() {
        if i >= MAX_VARINT_LEN {
            return Err(VarintError::Overflow);
        }
        let group = u64::from(byte & DATA_MASK);
        let shift = 7 * i as u32;
        // 10th byte sits at bit 63: only its lowest bit is addressable.
        if shift == 63 && group > 1 {
            return Err(VarintError::Overflow);
        }
        value |= group << shift;
        if byte & CONTINUATION_BIT == 0 {
            return Ok((value, i + 1));
        }
    }
    if buf.len() >= MAX_VARINT_LEN {
        Err(VarintError::Overflow)
    } else {
        Err(VarintError::Truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: u64) -> Vec<u8> {
        let (buf, len) = encode(value);
        buf[..len].to_vec()
    }

    #[test]
    fn test_small_counts_take_one_byte() {
        assert_eq!(encoded(0), vec![0x00]);
        assert_eq!(encoded(3), vec![0x03]);
        assert_eq!(encoded(127), vec![0x7F]);
    }

    #[test]
    fn test_group_boundaries() {
        assert_eq!(encoded(128), vec![0x80, 0x01]);
        assert_eq!(encoded(300), vec![0xAC, 0x02]);
        assert_eq!(encoded(16_383), vec![0xFF, 0x7F]);
        assert_eq!(encoded(16_384), vec![0x80, 0x80, 0x01]);
        assert_eq!(encoded(u64::MAX).len(), MAX_VARINT_LEN);
    }

    #[test]
    fn test_encoded_len_matches_encoder() {
        for value in [0, 1, 127, 128, 16_383, 16_384, 1 << 35, u64::MAX / 3, u64::MAX] {
            assert_eq!(encoded_len(value), encoded(value).len(), "value {}", value);
        }
    }

    #[test]
    fn test_decode_stops_at_final_group() {
        assert_eq!(decode(&[0xAC, 0x02, 0xFF]), Ok((300, 2)));
        assert_eq!(decode(&[0x00]), Ok((0, 1)));
    }

    #[test]
    fn test_decode_rejects_truncated_input() {
        assert_eq!(decode(&[]), Err(VarintError::Truncated));
        assert_eq!(decode(&[0x80, 0x80]), Err(VarintError::Truncated));
    }

    #[test]
    fn test_decode_rejects_overflow() {
        assert_eq!(decode(&[0x80; 11]), Err(VarintError::Overflow));
        assert_eq!(decode(&[0x80; MAX_VARINT_LEN]), Err(VarintError::Overflow));

        let mut too_wide = [0xFF; MAX_VARINT_LEN];
        too_wide[MAX_VARINT_LEN - 1] = 0x02;
        assert_eq!(decode(&too_wide), Err(VarintError::Overflow));
    }

    #[test]
    fn test_max_value_roundtrips() {
        let bytes = encoded(u64::MAX);
        assert_eq!(decode(&bytes), Ok((u64::MAX, MAX_VARINT_LEN)));
    }
}
