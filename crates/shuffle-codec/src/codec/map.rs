// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Key/value containers.
//!
//! # Wire Format
//!
//! ```text
//! [varint count][k1][v1][k2][v2]...[kn][vn]
//! ```
//!
//! Decoding inserts entries in stream order, so a key repeated later in the
//! stream overwrites the earlier value.
//!
//! Map codecs are never deterministic and never consistent with equals, even
//! over deterministic key and value codecs: entry order is not part of the
//! wire contract, and two equal maps may be written differently by different
//! producers. Use the structural value to compare decoded maps.

use super::{Codec, CodecRef, StructuralValue};
use crate::error::{DecodeResult, EncodeResult, NonDeterministic};
use crate::ser::{varint, Sink, Source};
use crate::size::ByteSizeObserver;
use crate::verify::DeterminismCheck;
use std::collections::{btree_map, hash_map, BTreeMap, HashMap};
use std::hash::Hash;
use std::marker::PhantomData;

/// A key/value container [`MapCodec`] can encode and decode.
pub trait Mapping: Sized {
    type Key;
    type Val;
    type Iter<'a>: Iterator<Item = (&'a Self::Key, &'a Self::Val)>
    where
        Self: 'a,
        Self::Key: 'a,
        Self::Val: 'a;

    /// Name used in `describe()` output.
    const SHAPE: &'static str;

    fn count(&self) -> usize;
    fn entries(&self) -> Self::Iter<'_>;
    fn with_capacity(capacity: usize) -> Self;

    /// Insert, replacing any value already stored under `key`.
    fn insert_entry(&mut self, key: Self::Key, value: Self::Val);
}

impl<K: Eq + Hash, V> Mapping for HashMap<K, V> {
    type Key = K;
    type Val = V;
    type Iter<'a>
        = hash_map::Iter<'a, K, V>
    where
        K: 'a,
        V: 'a;

    const SHAPE: &'static str = "HashMap";

    fn count(&self) -> usize {
        self.len()
    }

    fn entries(&self) -> Self::Iter<'_> {
        self.iter()
    }

    fn with_capacity(capacity: usize) -> Self {
        HashMap::with_capacity(capacity)
    }

    fn insert_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

impl<K: Ord, V> Mapping for BTreeMap<K, V> {
    type Key = K;
    type Val = V;
    type Iter<'a>
        = btree_map::Iter<'a, K, V>
    where
        K: 'a,
        V: 'a;

    const SHAPE: &'static str = "BTreeMap";

    fn count(&self) -> usize {
        self.len()
    }

    fn entries(&self) -> Self::Iter<'_> {
        self.iter()
    }

    fn with_capacity(_capacity: usize) -> Self {
        BTreeMap::new()
    }

    fn insert_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

/// Codec for any [`Mapping`].
pub struct MapCodec<M: Mapping> {
    key: CodecRef<M::Key>,
    value: CodecRef<M::Val>,
    _shape: PhantomData<fn() -> M>,
}

impl<M: Mapping> MapCodec<M> {
    pub fn new(key: CodecRef<M::Key>, value: CodecRef<M::Val>) -> Self {
        Self {
            key,
            value,
            _shape: PhantomData,
        }
    }

    pub fn key_codec(&self) -> &CodecRef<M::Key> {
        &self.key
    }

    pub fn value_codec(&self) -> &CodecRef<M::Val> {
        &self.value
    }

    /// Decode one map from `source` into an existing `target`.
    ///
    /// Entries already in `target` stay unless the stream overwrites their key.
    pub fn decode_into(&self, source: &mut Source<'_>, target: &mut M) -> DecodeResult<()> {
        let count = source.read_len()?;
        for _ in 0..count {
            let key = self.key.decode(source).map_err(|e| e.labeled("key"))?;
            let value = self.value.decode(source).map_err(|e| e.labeled("value"))?;
            target.insert_entry(key, value);
        }
        Ok(())
    }
}

impl<M> Codec for MapCodec<M>
where
    M: Mapping + 'static,
    M::Key: 'static,
    M::Val: 'static,
{
    type Value = M;

    fn describe(&self) -> String {
        format!(
            "MapCodec<{}>({}, {})",
            M::SHAPE,
            self.key.describe(),
            self.value.describe()
        )
    }

    fn encode(&self, value: &M, sink: &mut Sink<'_>) -> EncodeResult<()> {
        sink.write_len(value.count())?;
        for (k, v) in value.entries() {
            self.key.encode(k, sink).map_err(|e| e.labeled("key"))?;
            self.value.encode(v, sink).map_err(|e| e.labeled("value"))?;
        }
        Ok(())
    }

    fn decode(&self, source: &mut Source<'_>) -> DecodeResult<M> {
        let count = source.read_len()?;
        let mut map = M::with_capacity(source.limits().prealloc(count));
        for _ in 0..count {
            let key = self.key.decode(source).map_err(|e| e.labeled("key"))?;
            let value = self.value.decode(source).map_err(|e| e.labeled("value"))?;
            map.insert_entry(key, value);
        }
        Ok(map)
    }

    fn verify_deterministic(&self) -> Result<(), NonDeterministic> {
        let mut check = DeterminismCheck::new(self.describe());
        check
            .reason(format!("{} entry order is not part of the encoding", M::SHAPE))
            .component("key", self.key.verify_deterministic())
            .component("value", self.value.verify_deterministic());
        check.finish()
    }

    fn is_consistent_with_equals(&self) -> bool {
        false
    }

    fn structural_value(&self, value: &M) -> EncodeResult<StructuralValue> {
        let mut entries = BTreeMap::new();
        for (k, v) in value.entries() {
            entries.insert(
                self.key.structural_value(k)?,
                self.value.structural_value(v)?,
            );
        }
        Ok(StructuralValue::Map(entries))
    }

    fn is_cheap_to_estimate(&self, _value: &M) -> bool {
        false
    }

    fn register_byte_size_observer(
        &self,
        value: &M,
        observer: &mut dyn ByteSizeObserver,
    ) -> EncodeResult<()> {
        observer.update(varint::encoded_len(value.count() as u64) as u64);
        for (k, v) in value.entries() {
            self.key.register_byte_size_observer(k, observer)?;
            self.value.register_byte_size_observer(v, observer)?;
        }
        Ok(())
    }
}
