// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The [`Codec`] contract and its implementations.
//!
//! # Module Organization
//!
//! - [`primitives`] - fixed-width numbers, bool, unit, `Never`, strings, bytes
//! - [`derived`] - codecs defined by mapping onto a base codec (char, big numbers)
//! - [`sequence`] - one length-prefixed combinator for every container shape
//! - [`tuple`] - pairs and triples
//! - [`option`] - presence flag + value
//! - [`map`] - key/value containers, always non-deterministic
//!
//! # Composition
//!
//! Composite codecs hold their components as [`CodecRef`] (`Arc<dyn Codec>`),
//! so one `I32Codec` instance can back every `Vec<i32>`, `(i32, String)` and
//! `HashMap<i32, _>` codec in a pipeline:
//!
//! ```text
//! SeqCodec<Vec<(i32, String)>>
//! +-- PairCodec
//!     +-- I32Codec      (shared)
//!     +-- StringCodec   (shared)
//! ```

pub mod derived;
pub mod map;
pub mod option;
pub mod primitives;
pub mod sequence;
pub mod tuple;

use crate::error::{DecodeError, DecodeResult, EncodeResult, NonDeterministic};
use crate::ser::{Sink, Source};
use crate::size::{observe_by_encoding, ByteSizeObserver, CountingWriter};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Encode/decode contract for one semantic type.
///
/// Implementations are immutable after construction and shared across
/// threads; `encode`/`decode` must not keep per-call state in `self`.
pub trait Codec: Send + Sync {
    /// The type this codec reads and writes.
    type Value;

    /// Human-readable composition, e.g. `PairCodec(BoolCodec, StringCodec)`.
    fn describe(&self) -> String;

    /// Write `value` to `sink`.
    fn encode(&self, value: &Self::Value, sink: &mut Sink<'_>) -> EncodeResult<()>;

    /// Read one value from `source`.
    fn decode(&self, source: &mut Source<'_>) -> DecodeResult<Self::Value>;

    /// `Ok` if equal values always encode to identical bytes.
    ///
    /// Composite codecs aggregate every failing component into one error.
    fn verify_deterministic(&self) -> Result<(), NonDeterministic>;

    /// Whether `==` on decoded values agrees with equality of encodings.
    fn is_consistent_with_equals(&self) -> bool;

    /// Equality/hash stand-in for values whose `==` is not trustworthy here.
    ///
    /// Defaults to the encoded bytes.
    fn structural_value(&self, value: &Self::Value) -> EncodeResult<StructuralValue> {
        encode_to_vec(self, value).map(StructuralValue::Bytes)
    }

    /// Whether [`Codec::register_byte_size_observer`] runs in O(1) for `value`.
    fn is_cheap_to_estimate(&self, _value: &Self::Value) -> bool {
        false
    }

    /// Report the encoded size of `value` to `observer`.
    ///
    /// Defaults to encoding into a counting sink.
    fn register_byte_size_observer(
        &self,
        value: &Self::Value,
        observer: &mut dyn ByteSizeObserver,
    ) -> EncodeResult<()> {
        observe_by_encoding(self, value, observer)
    }
}

/// Shared handle to a codec for `T`.
pub type CodecRef<T> = Arc<dyn Codec<Value = T>>;

impl<C> Codec for Arc<C>
where
    C: Codec + ?Sized,
{
    type Value = C::Value;

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn encode(&self, value: &Self::Value, sink: &mut Sink<'_>) -> EncodeResult<()> {
        (**self).encode(value, sink)
    }

    fn decode(&self, source: &mut Source<'_>) -> DecodeResult<Self::Value> {
        (**self).decode(source)
    }

    fn verify_deterministic(&self) -> Result<(), NonDeterministic> {
        (**self).verify_deterministic()
    }

    fn is_consistent_with_equals(&self) -> bool {
        (**self).is_consistent_with_equals()
    }

    fn structural_value(&self, value: &Self::Value) -> EncodeResult<StructuralValue> {
        (**self).structural_value(value)
    }

    fn is_cheap_to_estimate(&self, value: &Self::Value) -> bool {
        (**self).is_cheap_to_estimate(value)
    }

    fn register_byte_size_observer(
        &self,
        value: &Self::Value,
        observer: &mut dyn ByteSizeObserver,
    ) -> EncodeResult<()> {
        (**self).register_byte_size_observer(value, observer)
    }
}

/// Opaque, comparable stand-in for a value.
///
/// Two values are structurally equal when their structural values are `==`.
/// Unordered containers map to `Set`/`Map`, so iteration order never leaks
/// into the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StructuralValue {
    /// Leaf value, usually its encoding.
    Bytes(Vec<u8>),
    /// Fixed-arity product (pairs, triples).
    Tuple(Vec<StructuralValue>),
    /// Optional value.
    Optional(Option<Box<StructuralValue>>),
    /// Ordered container.
    Seq(Vec<StructuralValue>),
    /// Container whose iteration order is not significant.
    Set(BTreeSet<StructuralValue>),
    /// Key/value container.
    Map(BTreeMap<StructuralValue, StructuralValue>),
}

// ============================================================================
// Whole-buffer helpers
// ============================================================================

/// Encode `value` into a fresh buffer.
pub fn encode_to_vec<C>(codec: &C, value: &C::Value) -> EncodeResult<Vec<u8>>
where
    C: Codec + ?Sized,
{
    let mut out = Vec::new();
    codec.encode(value, &mut Sink::new(&mut out))?;
    Ok(out)
}

/// Decode exactly one value from `bytes`.
///
/// Fails with [`DecodeError::TrailingBytes`] if the codec stops early.
pub fn decode_from_slice<C>(codec: &C, bytes: &[u8]) -> DecodeResult<C::Value>
where
    C: Codec + ?Sized,
{
    let mut rest = bytes;
    let (value, consumed) = {
        let mut source = Source::new(&mut rest);
        let value = codec.decode(&mut source)?;
        (value, source.offset())
    };
    if !rest.is_empty() {
        return Err(DecodeError::TrailingBytes {
            consumed,
            remaining: rest.len(),
        });
    }
    Ok(value)
}

/// Exact encoded length of `value`, without keeping the bytes.
pub fn encoded_size<C>(codec: &C, value: &C::Value) -> EncodeResult<u64>
where
    C: Codec + ?Sized,
{
    let mut counter = CountingWriter::default();
    codec.encode(value, &mut Sink::new(&mut counter))?;
    Ok(counter.count())
}

pub use derived::{big_decimal_codec, big_int_codec, char_codec, DerivedCodec};
pub use map::{MapCodec, Mapping};
pub use option::{absent_codec, OptionCodec};
pub use primitives::{
    BoolCodec, BytesCodec, F32Codec, F64Codec, I16Codec, I32Codec, I64Codec, I8Codec, Never,
    NeverCodec, StringCodec, U16Codec, U32Codec, U64Codec, U8Codec, UnitCodec,
};
pub use sequence::{IterationOrder, SeqBuilder, SeqCodec, Sequence};
pub use tuple::{PairCodec, TripleCodec};
