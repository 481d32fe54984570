// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-arity products.
//!
//! # Wire Format
//!
//! ```text
//! (A, B)     [first][second]
//! (A, B, C)  [first][second][third]
//! ```
//!
//! No framing between slots. Component failures are wrapped with the slot
//! label, so a bad string inside the second slot of a pair reports
//! `decoding second failed: invalid UTF-8 ...`.

use super::{Codec, CodecRef, StructuralValue};
use crate::error::{DecodeResult, EncodeResult, NonDeterministic};
use crate::ser::{Sink, Source};
use crate::size::ByteSizeObserver;
use crate::verify::DeterminismCheck;

/// Codec for `(A, B)`.
pub struct PairCodec<A, B> {
    first: CodecRef<A>,
    second: CodecRef<B>,
}

impl<A, B> PairCodec<A, B> {
    pub fn new(first: CodecRef<A>, second: CodecRef<B>) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &CodecRef<A> {
        &self.first
    }

    pub fn second(&self) -> &CodecRef<B> {
        &self.second
    }
}

impl<A, B> Codec for PairCodec<A, B>
where
    A: 'static,
    B: 'static,
{
    type Value = (A, B);

    fn describe(&self) -> String {
        format!(
            "PairCodec({}, {})",
            self.first.describe(),
            self.second.describe()
        )
    }

    fn encode(&self, value: &(A, B), sink: &mut Sink<'_>) -> EncodeResult<()> {
        self.first
            .encode(&value.0, sink)
            .map_err(|e| e.labeled("first"))?;
        self.second
            .encode(&value.1, sink)
            .map_err(|e| e.labeled("second"))
    }

    fn decode(&self, source: &mut Source<'_>) -> DecodeResult<(A, B)> {
        let a = self.first.decode(source).map_err(|e| e.labeled("first"))?;
        let b = self.second.decode(source).map_err(|e| e.labeled("second"))?;
        Ok((a, b))
    }

    fn verify_deterministic(&self) -> Result<(), NonDeterministic> {
        let mut check = DeterminismCheck::new(self.describe());
        check
            .component("first", self.first.verify_deterministic())
            .component("second", self.second.verify_deterministic());
        check.finish()
    }

    fn is_consistent_with_equals(&self) -> bool {
        self.first.is_consistent_with_equals() && self.second.is_consistent_with_equals()
    }

    fn structural_value(&self, value: &(A, B)) -> EncodeResult<StructuralValue> {
        Ok(StructuralValue::Tuple(vec![
            self.first.structural_value(&value.0)?,
            self.second.structural_value(&value.1)?,
        ]))
    }

    fn is_cheap_to_estimate(&self, value: &(A, B)) -> bool {
        self.first.is_cheap_to_estimate(&value.0) && self.second.is_cheap_to_estimate(&value.1)
    }

    fn register_byte_size_observer(
        &self,
        value: &(A, B),
        observer: &mut dyn ByteSizeObserver,
    ) -> EncodeResult<()> {
        self.first.register_byte_size_observer(&value.0, observer)?;
        self.second.register_byte_size_observer(&value.1, observer)
    }
}

/// Codec for `(A, B, C)`.
pub struct TripleCodec<A, B, C> {
    first: CodecRef<A>,
    second: CodecRef<B>,
    third: CodecRef<C>,
}

impl<A, B, C> TripleCodec<A, B, C> {
    pub fn new(first: CodecRef<A>, second: CodecRef<B>, third: CodecRef<C>) -> Self {
        Self {
            first,
            second,
            third,
        }
    }
}

impl<A, B, C> Codec for TripleCodec<A, B, C>
where
    A: 'static,
    B: 'static,
    C: 'static,
{
    type Value = (A, B, C);

    fn describe(&self) -> String {
        format!(
            "TripleCodec({}, {}, {})",
            self.first.describe(),
            self.second.describe(),
            self.third.describe()
        )
    }

    fn encode(&self, value: &(A, B, C), sink: &mut Sink<'_>) -> EncodeResult<()> {
        self.first
            .encode(&value.0, sink)
            .map_err(|e| e.labeled("first"))?;
        self.second
            .encode(&value.1, sink)
            .map_err(|e| e.labeled("second"))?;
        self.third
            .encode(&value.2, sink)
            .map_err(|e| e.labeled("third"))
    }

    fn decode(&self, source: &mut Source<'_>) -> DecodeResult<(A, B, C)> {
        let a = self.first.decode(source).map_err(|e| e.labeled("first"))?;
        let b = self.second.decode(source).map_err(|e| e.labeled("second"))?;
        let c = self.third.decode(source).map_err(|e| e.labeled("third"))?;
        Ok((a, b, c))
    }

    fn verify_deterministic(&self) -> Result<(), NonDeterministic> {
        let mut check = DeterminismCheck::new(self.describe());
        check
            .component("first", self.first.verify_deterministic())
            .component("second", self.second.verify_deterministic())
            .component("third", self.third.verify_deterministic());
        check.finish()
    }

    fn is_consistent_with_equals(&self) -> bool {
        self.first.is_consistent_with_equals()
            && self.second.is_consistent_with_equals()
            && self.third.is_consistent_with_equals()
    }

    fn structural_value(&self, value: &(A, B, C)) -> EncodeResult<StructuralValue> {
        Ok(StructuralValue::Tuple(vec![
            self.first.structural_value(&value.0)?,
            self.second.structural_value(&value.1)?,
            self.third.structural_value(&value.2)?,
        ]))
    }

    fn is_cheap_to_estimate(&self, value: &(A, B, C)) -> bool {
        self.first.is_cheap_to_estimate(&value.0)
            && self.second.is_cheap_to_estimate(&value.1)
            && self.third.is_cheap_to_estimate(&value.2)
    }

    fn register_byte_size_observer(
        &self,
        value: &(A, B, C),
        observer: &mut dyn ByteSizeObserver,
    ) -> EncodeResult<()> {
        self.first.register_byte_size_observer(&value.0, observer)?;
        self.second.register_byte_size_observer(&value.1, observer)?;
        self.third.register_byte_size_observer(&value.2, observer)
    }
}
