// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codecs defined by mapping a type onto an existing base codec.
//!
//! ```text
//! char        --char_to_byte-->     u8             (U8Codec)
//! BigInt      --to_signed_bytes-->  Vec<u8>        (BytesCodec)
//! BigDecimal  --normalized-->       (i64, BigInt)  (PairCodec)
//! ```
//!
//! The wire format, determinism and equality-consistency all come from the
//! base codec. Mapping functions are plain `fn` pointers, so a derived codec
//! stays `Send + Sync` without boxing closures.

use super::primitives::{BytesCodec, I64Codec, U8Codec};
use super::tuple::PairCodec;
use super::{Codec, CodecRef, StructuralValue};
use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult, NonDeterministic};
use crate::ser::{Sink, Source};
use crate::size::ByteSizeObserver;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::sync::Arc;

/// Codec for `T` expressed through a codec for `B`.
pub struct DerivedCodec<B, T> {
    name: &'static str,
    base: CodecRef<B>,
    to_base: fn(&T) -> Result<B, String>,
    from_base: fn(B) -> Result<T, String>,
}

impl<B, T> DerivedCodec<B, T> {
    /// `to_base` runs before encoding, `from_base` after decoding. Either may
    /// reject a value with a message, surfaced as a `Mapping` error.
    pub fn new(
        name: &'static str,
        base: CodecRef<B>,
        to_base: fn(&T) -> Result<B, String>,
        from_base: fn(B) -> Result<T, String>,
    ) -> Self {
        Self {
            name,
            base,
            to_base,
            from_base,
        }
    }

    pub fn base(&self) -> &CodecRef<B> {
        &self.base
    }
}

impl<B, T> std::fmt::Debug for DerivedCodec<B, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedCodec")
            .field("name", &self.name)
            .field("base", &self.base.describe())
            .finish()
    }
}

impl<B, T> Codec for DerivedCodec<B, T>
where
    B: 'static,
    T: 'static,
{
    type Value = T;

    fn describe(&self) -> String {
        format!("{}({})", self.name, self.base.describe())
    }

    fn encode(&self, value: &T, sink: &mut Sink<'_>) -> EncodeResult<()> {
        let base = (self.to_base)(value).map_err(EncodeError::Mapping)?;
        self.base.encode(&base, sink)
    }

    fn decode(&self, source: &mut Source<'_>) -> DecodeResult<T> {
        let base = self.base.decode(source)?;
        (self.from_base)(base).map_err(DecodeError::Mapping)
    }

    fn verify_deterministic(&self) -> Result<(), NonDeterministic> {
        self.base.verify_deterministic()
    }

    fn is_consistent_with_equals(&self) -> bool {
        self.base.is_consistent_with_equals()
    }

    fn structural_value(&self, value: &T) -> EncodeResult<StructuralValue> {
        let base = (self.to_base)(value).map_err(EncodeError::Mapping)?;
        self.base.structural_value(&base)
    }

    fn is_cheap_to_estimate(&self, value: &T) -> bool {
        (self.to_base)(value).is_ok_and(|base| self.base.is_cheap_to_estimate(&base))
    }

    fn register_byte_size_observer(
        &self,
        value: &T,
        observer: &mut dyn ByteSizeObserver,
    ) -> EncodeResult<()> {
        let base = (self.to_base)(value).map_err(EncodeError::Mapping)?;
        self.base.register_byte_size_observer(&base, observer)
    }
}

// ============================================================================
// char
// ============================================================================

fn char_to_byte(c: &char) -> Result<u8, String> {
    u8::try_from(*c).map_err(|_| format!("char U+{:04X} needs more than one byte", u32::from(*c)))
}

fn byte_to_char(byte: u8) -> Result<char, String> {
    Ok(char::from(byte))
}

/// One-byte `char` codec (U+0000..=U+00FF).
pub fn char_codec() -> DerivedCodec<u8, char> {
    DerivedCodec::new("CharCodec", Arc::new(U8Codec), char_to_byte, byte_to_char)
}

// ============================================================================
// Arbitrary precision
// ============================================================================

fn big_int_to_bytes(value: &BigInt) -> Result<Vec<u8>, String> {
    Ok(value.to_signed_bytes_be())
}

fn bytes_to_big_int(bytes: Vec<u8>) -> Result<BigInt, String> {
    Ok(BigInt::from_signed_bytes_be(&bytes))
}

/// `BigInt` as minimal two's-complement big-endian bytes.
pub fn big_int_codec() -> DerivedCodec<Vec<u8>, BigInt> {
    DerivedCodec::new(
        "BigIntCodec",
        Arc::new(BytesCodec),
        big_int_to_bytes,
        bytes_to_big_int,
    )
}

fn big_decimal_to_parts(value: &BigDecimal) -> Result<(i64, BigInt), String> {
    let (digits, scale) = value.normalized().into_bigint_and_exponent();
    Ok((scale, digits))
}

fn parts_to_big_decimal((scale, digits): (i64, BigInt)) -> Result<BigDecimal, String> {
    Ok(BigDecimal::new(digits, scale))
}

/// `BigDecimal` as `(scale, unscaled)` of its normalized form.
///
/// `1.50` and `1.5` are equal and encode identically.
pub fn big_decimal_codec() -> DerivedCodec<(i64, BigInt), BigDecimal> {
    let parts: CodecRef<(i64, BigInt)> =
        Arc::new(PairCodec::new(Arc::new(I64Codec), Arc::new(big_int_codec())));
    DerivedCodec::new(
        "BigDecimalCodec",
        parts,
        big_decimal_to_parts,
        parts_to_big_decimal,
    )
}
