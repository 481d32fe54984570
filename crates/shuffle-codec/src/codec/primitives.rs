// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Leaf codecs.
//!
//! # Wire Format
//!
//! ```text
//! i8..i64, u8..u64   fixed width, big-endian
//! f32, f64           IEEE-754 bit pattern, big-endian
//! bool               0x00 | 0x01
//! ()                 nothing
//! String, Vec<u8>    [varint len][raw bytes]
//! ```
//!
//! Every leaf is deterministic. Floats are not consistent with equals:
//! `NaN != NaN` although both encode identically, and `0.0 == -0.0` although
//! their bit patterns differ.

use super::{Codec, StructuralValue};
use crate::config::{FLAG_FALSE, FLAG_TRUE};
use crate::error::{DecodeError, DecodeResult, EncodeResult, NonDeterministic};
use crate::ser::{varint, Sink, Source};
use crate::size::ByteSizeObserver;

/// Encoded size of a `[varint len][len bytes]` payload.
pub(crate) fn prefixed_size(len: usize) -> u64 {
    varint::encoded_len(len as u64) as u64 + len as u64
}

/// Generate a unit-struct codec for a fixed-width number.
macro_rules! fixed_width_codec {
    ($($(#[$meta:meta])* $name:ident: $type:ty, $write:ident, $read:ident, equals: $eq:expr;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
            pub struct $name;

            impl Codec for $name {
                type Value = $type;

                fn describe(&self) -> String {
                    stringify!($name).to_string()
                }

                fn encode(&self, value: &$type, sink: &mut Sink<'_>) -> EncodeResult<()> {
                    sink.$write(*value)
                }

                fn decode(&self, source: &mut Source<'_>) -> DecodeResult<$type> {
                    source.$read()
                }

                fn verify_deterministic(&self) -> Result<(), NonDeterministic> {
                    Ok(())
                }

                fn is_consistent_with_equals(&self) -> bool {
                    $eq
                }

                fn structural_value(&self, value: &$type) -> EncodeResult<StructuralValue> {
                    Ok(StructuralValue::Bytes(value.to_be_bytes().to_vec()))
                }

                fn is_cheap_to_estimate(&self, _value: &$type) -> bool {
                    true
                }

                fn register_byte_size_observer(
                    &self,
                    _value: &$type,
                    observer: &mut dyn ByteSizeObserver,
                ) -> EncodeResult<()> {
                    observer.update(std::mem::size_of::<$type>() as u64);
                    Ok(())
                }
            }
        )*
    };
}

fixed_width_codec! {
    I8Codec: i8, write_i8, read_i8, equals: true;
    I16Codec: i16, write_i16, read_i16, equals: true;
    /// 32-bit signed integer, 4 bytes big-endian.
    I32Codec: i32, write_i32, read_i32, equals: true;
    I64Codec: i64, write_i64, read_i64, equals: true;
    /// Single byte; also the base of the `char` codec.
    U8Codec: u8, write_u8, read_u8, equals: true;
    U16Codec: u16, write_u16, read_u16, equals: true;
    U32Codec: u32, write_u32, read_u32, equals: true;
    U64Codec: u64, write_u64, read_u64, equals: true;
    /// IEEE-754 single precision by bit pattern.
    F32Codec: f32, write_f32, read_f32, equals: false;
    /// IEEE-754 double precision by bit pattern.
    F64Codec: f64, write_f64, read_f64, equals: false;
}

// ============================================================================
// bool / unit / Never
// ============================================================================

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BoolCodec;

impl Codec for BoolCodec {
    type Value = bool;

    fn describe(&self) -> String {
        "BoolCodec".to_string()
    }

    fn encode(&self, value: &bool, sink: &mut Sink<'_>) -> EncodeResult<()> {
        sink.write_u8(if *value { FLAG_TRUE } else { FLAG_FALSE })
    }

    fn decode(&self, source: &mut Source<'_>) -> DecodeResult<bool> {
        let offset = source.offset();
        match source.read_u8()? {
            FLAG_FALSE => Ok(false),
            FLAG_TRUE => Ok(true),
            byte => Err(DecodeError::InvalidFlag { offset, byte }),
        }
    }

    fn verify_deterministic(&self) -> Result<(), NonDeterministic> {
        Ok(())
    }

    fn is_consistent_with_equals(&self) -> bool {
        true
    }

    fn structural_value(&self, value: &bool) -> EncodeResult<StructuralValue> {
        Ok(StructuralValue::Bytes(vec![u8::from(*value)]))
    }

    fn is_cheap_to_estimate(&self, _value: &bool) -> bool {
        true
    }

    fn register_byte_size_observer(
        &self,
        _value: &bool,
        observer: &mut dyn ByteSizeObserver,
    ) -> EncodeResult<()> {
        observer.update(1);
        Ok(())
    }
}

/// `()` takes no bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UnitCodec;

impl Codec for UnitCodec {
    type Value = ();

    fn describe(&self) -> String {
        "UnitCodec".to_string()
    }

    fn encode(&self, _value: &(), _sink: &mut Sink<'_>) -> EncodeResult<()> {
        Ok(())
    }

    fn decode(&self, _source: &mut Source<'_>) -> DecodeResult<()> {
        Ok(())
    }

    fn verify_deterministic(&self) -> Result<(), NonDeterministic> {
        Ok(())
    }

    fn is_consistent_with_equals(&self) -> bool {
        true
    }

    fn structural_value(&self, _value: &()) -> EncodeResult<StructuralValue> {
        Ok(StructuralValue::Bytes(Vec::new()))
    }

    fn is_cheap_to_estimate(&self, _value: &()) -> bool {
        true
    }

    fn register_byte_size_observer(
        &self,
        _value: &(),
        _observer: &mut dyn ByteSizeObserver,
    ) -> EncodeResult<()> {
        Ok(())
    }
}

/// A type with no values.
///
/// `Option<Never>` is always `None`, which makes [`NeverCodec`] the element of
/// the always-empty optional codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Never {}

/// Codec for [`Never`]. Decoding always fails: a well-formed stream can never
/// hold a `Never` value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NeverCodec;

impl Codec for NeverCodec {
    type Value = Never;

    fn describe(&self) -> String {
        "NeverCodec".to_string()
    }

    fn encode(&self, value: &Never, _sink: &mut Sink<'_>) -> EncodeResult<()> {
        match *value {}
    }

    fn decode(&self, _source: &mut Source<'_>) -> DecodeResult<Never> {
        Err(DecodeError::Uninhabited)
    }

    fn verify_deterministic(&self) -> Result<(), NonDeterministic> {
        Ok(())
    }

    fn is_consistent_with_equals(&self) -> bool {
        true
    }

    fn structural_value(&self, value: &Never) -> EncodeResult<StructuralValue> {
        match *value {}
    }

    fn is_cheap_to_estimate(&self, value: &Never) -> bool {
        match *value {}
    }

    fn register_byte_size_observer(
        &self,
        value: &Never,
        _observer: &mut dyn ByteSizeObserver,
    ) -> EncodeResult<()> {
        match *value {}
    }
}

// ============================================================================
// Length-prefixed payloads
// ============================================================================

/// UTF-8 string: `[varint byte_len][utf8 bytes]`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StringCodec;

impl Codec for StringCodec {
    type Value = String;

    fn describe(&self) -> String {
        "StringCodec".to_string()
    }

    fn encode(&self, value: &String, sink: &mut Sink<'_>) -> EncodeResult<()> {
        sink.write_len(value.len())?;
        sink.write_bytes(value.as_bytes())
    }

    fn decode(&self, source: &mut Source<'_>) -> DecodeResult<String> {
        let len = source.read_len()?;
        let offset = source.offset();
        let bytes = source.read_vec(len)?;
        String::from_utf8(bytes).map_err(|source| DecodeError::InvalidUtf8 { offset, source })
    }

    fn verify_deterministic(&self) -> Result<(), NonDeterministic> {
        Ok(())
    }

    fn is_consistent_with_equals(&self) -> bool {
        true
    }

    fn structural_value(&self, value: &String) -> EncodeResult<StructuralValue> {
        Ok(StructuralValue::Bytes(value.as_bytes().to_vec()))
    }

    fn is_cheap_to_estimate(&self, _value: &String) -> bool {
        true
    }

    fn register_byte_size_observer(
        &self,
        value: &String,
        observer: &mut dyn ByteSizeObserver,
    ) -> EncodeResult<()> {
        observer.update(prefixed_size(value.len()));
        Ok(())
    }
}

/// Raw bytes: `[varint len][bytes]`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BytesCodec;

impl Codec for BytesCodec {
    type Value = Vec<u8>;

    fn describe(&self) -> String {
        "BytesCodec".to_string()
    }

    fn encode(&self, value: &Vec<u8>, sink: &mut Sink<'_>) -> EncodeResult<()> {
        sink.write_len(value.len())?;
        sink.write_bytes(value)
    }

    fn decode(&self, source: &mut Source<'_>) -> DecodeResult<Vec<u8>> {
        let len = source.read_len()?;
        source.read_vec(len)
    }

    fn verify_deterministic(&self) -> Result<(), NonDeterministic> {
        Ok(())
    }

    fn is_consistent_with_equals(&self) -> bool {
        true
    }

    fn structural_value(&self, value: &Vec<u8>) -> EncodeResult<StructuralValue> {
        Ok(StructuralValue::Bytes(value.clone()))
    }

    fn is_cheap_to_estimate(&self, _value: &Vec<u8>) -> bool {
        true
    }

    fn register_byte_size_observer(
        &self,
        value: &Vec<u8>,
        observer: &mut dyn ByteSizeObserver,
    ) -> EncodeResult<()> {
        observer.update(prefixed_size(value.len()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_from_slice, encode_to_vec, encoded_size};
    use crate::size::estimate_size;

    #[test]
    fn test_integers_are_fixed_width_big_endian() {
        assert_eq!(
            encode_to_vec(&I32Codec, &1).expect("encode"),
            vec![0, 0, 0, 1]
        );
        assert_eq!(encode_to_vec(&I16Codec, &-1).expect("encode"), vec![0xFF, 0xFF]);
        assert_eq!(
            encode_to_vec(&U64Codec, &0x0102_0304_0506_0708).expect("encode"),
            vec![1, 2, 3, 4, 5, 6, 7, 8]
        );
        assert_eq!(decode_from_slice(&I8Codec, &[0x80]).expect("decode"), i8::MIN);
        assert_eq!(
            decode_from_slice(&I64Codec, &i64::MAX.to_be_bytes()).expect("decode"),
            i64::MAX
        );
    }

    #[test]
    fn test_float_bit_pattern_roundtrip() {
        let bytes = encode_to_vec(&F64Codec, &f64::NAN).expect("encode");
        let back = decode_from_slice(&F64Codec, &bytes).expect("decode");
        assert!(back.is_nan());
        assert_eq!(back.to_bits(), f64::NAN.to_bits());

        let neg_zero = encode_to_vec(&F32Codec, &-0.0).expect("encode");
        let pos_zero = encode_to_vec(&F32Codec, &0.0).expect("encode");
        assert_ne!(neg_zero, pos_zero);
    }

    #[test]
    fn test_floats_deterministic_but_not_consistent_with_equals() {
        assert!(F32Codec.verify_deterministic().is_ok());
        assert!(F64Codec.verify_deterministic().is_ok());
        assert!(!F32Codec.is_consistent_with_equals());
        assert!(!F64Codec.is_consistent_with_equals());
        assert!(I32Codec.is_consistent_with_equals());
        assert_eq!(
            F64Codec.structural_value(&f64::NAN).expect("structural"),
            F64Codec.structural_value(&f64::NAN).expect("structural")
        );
    }

    #[test]
    fn test_bool_rejects_unknown_flag() {
        assert_eq!(encode_to_vec(&BoolCodec, &true).expect("encode"), vec![0x01]);
        assert!(!decode_from_slice(&BoolCodec, &[0x00]).expect("decode"));
        match decode_from_slice(&BoolCodec, &[0x02]) {
            Err(DecodeError::InvalidFlag { offset, byte }) => {
                assert_eq!(offset, 0);
                assert_eq!(byte, 0x02);
            }
            other => panic!("expected InvalidFlag, got {:?}", other),
        }
    }

    #[test]
    fn test_unit_is_empty() {
        assert!(encode_to_vec(&UnitCodec, &()).expect("encode").is_empty());
        decode_from_slice(&UnitCodec, &[]).expect("decode");
        assert_eq!(estimate_size(&UnitCodec, &()).expect("size").total(), 0);
    }

    #[test]
    fn test_never_decode_fails() {
        assert!(matches!(
            decode_from_slice(&NeverCodec, &[]),
            Err(DecodeError::Uninhabited)
        ));
        assert!(NeverCodec.verify_deterministic().is_ok());
    }

    #[test]
    fn test_string_is_length_prefixed() {
        let bytes = encode_to_vec(&StringCodec, &"hi".to_string()).expect("encode");
        assert_eq!(bytes, vec![0x02, b'h', b'i']);
        assert_eq!(decode_from_slice(&StringCodec, &bytes).expect("decode"), "hi");

        let long = "x".repeat(200);
        let bytes = encode_to_vec(&StringCodec, &long).expect("encode");
        assert_eq!(&bytes[..2], &[0xC8, 0x01]);
        assert_eq!(bytes.len(), 202);
    }

    #[test]
    fn test_string_invalid_utf8_reports_payload_offset() {
        match decode_from_slice(&StringCodec, &[0x02, 0xC3, 0x28]) {
            Err(DecodeError::InvalidUtf8 { offset, .. }) => assert_eq!(offset, 1),
            other => panic!("expected InvalidUtf8, got {:?}", other),
        }
    }

    #[test]
    fn test_bytes_truncated_payload() {
        assert!(matches!(
            decode_from_slice(&BytesCodec, &[0x05, 1, 2]),
            Err(DecodeError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_leaf_size_estimates_match_encoding() {
        let text = "size".repeat(40);
        let estimate = estimate_size(&StringCodec, &text).expect("size");
        assert!(StringCodec.is_cheap_to_estimate(&text));
        assert_eq!(
            estimate.total(),
            encoded_size(&StringCodec, &text).expect("encoded size")
        );

        assert_eq!(estimate_size(&I64Codec, &7).expect("size").total(), 8);
        assert_eq!(estimate_size(&BoolCodec, &false).expect("size").total(), 1);
        assert_eq!(
            estimate_size(&BytesCodec, &vec![0u8; 3]).expect("size").total(),
            4
        );
    }
}
