// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-keyed codec registry.
//!
//! [`resolve_codec::<T>()`](resolve_codec) returns the canonical codec for
//! `T`, composing it from the codecs of `T`'s components on first use and
//! memoizing every shape it builds:
//!
//! ```text
//! resolve::<Vec<(i32, String)>>()
//!   miss -> SeqCodec::new(resolve::<(i32, String)>())
//!             miss -> PairCodec::new(resolve::<i32>(), resolve::<String>())
//!                       miss -> I32Codec
//!                       miss -> StringCodec
//! ```
//!
//! Builds run outside any map lock, so resolution may recurse freely. Two
//! threads racing on the same type may both build it; the first insert wins
//! and both callers get that instance.

use crate::codec::derived::{big_decimal_codec, big_int_codec, char_codec};
use crate::codec::map::MapCodec;
use crate::codec::option::OptionCodec;
use crate::codec::primitives::{
    BoolCodec, F32Codec, F64Codec, I16Codec, I32Codec, I64Codec, I8Codec, Never, NeverCodec,
    StringCodec, U16Codec, U32Codec, U64Codec, U8Codec, UnitCodec,
};
use crate::codec::sequence::SeqCodec;
use crate::codec::tuple::{PairCodec, TripleCodec};
use crate::codec::CodecRef;
use bigdecimal::BigDecimal;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use num_bigint::BigInt;
use parking_lot::RwLock;
use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::hash::Hash;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// A type with a canonical codec.
pub trait Resolve: Sized + 'static {
    /// Compose the codec for `Self`, resolving component codecs via `registry`.
    fn build_codec(registry: &CodecRegistry) -> CodecRef<Self>;
}

/// Resolution hit/miss statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    /// Time spent building the most recent miss, components included.
    pub last_build_ns: u64,
}

/// Memo table from type to codec.
pub struct CodecRegistry {
    codecs: DashMap<TypeId, Box<dyn Any + Send + Sync>>,
    stats: RwLock<LookupStats>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("codecs", &self.codecs.len())
            .field("stats", &self.stats())
            .finish()
    }
}

impl CodecRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            codecs: DashMap::new(),
            stats: RwLock::new(LookupStats::default()),
        }
    }

    /// Process-wide registry behind [`resolve_codec`].
    pub fn global() -> &'static CodecRegistry {
        static GLOBAL: OnceLock<CodecRegistry> = OnceLock::new();
        GLOBAL.get_or_init(CodecRegistry::new)
    }

    /// Memoized codec for `T`, if one was resolved or registered.
    #[must_use]
    pub fn lookup<T: 'static>(&self) -> Option<CodecRef<T>> {
        self.codecs
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<CodecRef<T>>().cloned())
    }

    /// Install `codec` as the codec for `T`, replacing any memoized one.
    ///
    /// Composites resolved afterwards pick it up; composites already built
    /// keep the codec they were built with.
    pub fn register<T: 'static>(&self, codec: CodecRef<T>) -> Option<CodecRef<T>> {
        log::debug!(
            "[CodecRegistry] registering {} for {}",
            codec.describe(),
            type_name::<T>()
        );
        self.codecs
            .insert(TypeId::of::<T>(), Box::new(codec))
            .and_then(|old| old.downcast::<CodecRef<T>>().ok())
            .map(|old| *old)
    }

    /// Canonical codec for `T`, building and memoizing it on first use.
    pub fn resolve<T: Resolve>(&self) -> CodecRef<T> {
        if let Some(hit) = self.lookup::<T>() {
            self.record_hit();
            return hit;
        }

        let start = Instant::now();
        log::debug!("[CodecRegistry] miss for {}, building", type_name::<T>());
        let built = T::build_codec(self);

        let codec = match self.codecs.entry(TypeId::of::<T>()) {
            Entry::Occupied(existing) => {
                log::debug!(
                    "[CodecRegistry] {} resolved concurrently, discarding duplicate build",
                    type_name::<T>()
                );
                existing
                    .get()
                    .downcast_ref::<CodecRef<T>>()
                    .cloned()
                    .unwrap_or(built)
            }
            Entry::Vacant(slot) => {
                slot.insert(Box::new(Arc::clone(&built)));
                built
            }
        };
        self.record_miss(start);
        codec
    }

    /// Number of memoized types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        *self.stats.read()
    }

    fn record_hit(&self) {
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
    }

    fn record_miss(&self, start: Instant) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
        stats.last_build_ns = start.elapsed().as_nanos() as u64;
    }
}

/// Canonical codec for `T` from the global registry.
pub fn resolve_codec<T: Resolve>() -> CodecRef<T> {
    CodecRegistry::global().resolve::<T>()
}

// ============================================================================
// Canonical codecs
// ============================================================================

/// Leaf types map to a unit-struct codec.
macro_rules! resolve_leaf {
    ($($type:ty => $codec:expr),* $(,)?) => {
        $(
            impl Resolve for $type {
                fn build_codec(_registry: &CodecRegistry) -> CodecRef<Self> {
                    Arc::new($codec)
                }
            }
        )*
    };
}

resolve_leaf! {
    i8 => I8Codec,
    i16 => I16Codec,
    i32 => I32Codec,
    i64 => I64Codec,
    u8 => U8Codec,
    u16 => U16Codec,
    u32 => U32Codec,
    u64 => U64Codec,
    f32 => F32Codec,
    f64 => F64Codec,
    bool => BoolCodec,
    () => UnitCodec,
    String => StringCodec,
    Never => NeverCodec,
    char => char_codec(),
    BigInt => big_int_codec(),
    BigDecimal => big_decimal_codec(),
}

/// Sequence shapes map to `SeqCodec` over the resolved element codec.
macro_rules! resolve_sequence {
    ($($shape:ident<T> $(where T: $($bound:path),+)?;)*) => {
        $(
            impl<T: Resolve $($(+ $bound)+)?> Resolve for $shape<T> {
                fn build_codec(registry: &CodecRegistry) -> CodecRef<Self> {
                    Arc::new(SeqCodec::<$shape<T>>::new(registry.resolve::<T>()))
                }
            }
        )*
    };
}

resolve_sequence! {
    Vec<T>;
    VecDeque<T>;
    LinkedList<T>;
    BTreeSet<T> where T: Ord;
    HashSet<T> where T: Eq, Hash;
}

impl<T: Resolve> Resolve for Box<[T]> {
    fn build_codec(registry: &CodecRegistry) -> CodecRef<Self> {
        Arc::new(SeqCodec::<Box<[T]>>::new(registry.resolve::<T>()))
    }
}

impl<T: Resolve, const N: usize> Resolve for [T; N] {
    fn build_codec(registry: &CodecRegistry) -> CodecRef<Self> {
        Arc::new(SeqCodec::<[T; N]>::new(registry.resolve::<T>()))
    }
}

impl<T: Resolve> Resolve for Option<T> {
    fn build_codec(registry: &CodecRegistry) -> CodecRef<Self> {
        Arc::new(OptionCodec::new(registry.resolve::<T>()))
    }
}

impl<A: Resolve, B: Resolve> Resolve for (A, B) {
    fn build_codec(registry: &CodecRegistry) -> CodecRef<Self> {
        Arc::new(PairCodec::new(registry.resolve::<A>(), registry.resolve::<B>()))
    }
}

impl<A: Resolve, B: Resolve, C: Resolve> Resolve for (A, B, C) {
    fn build_codec(registry: &CodecRegistry) -> CodecRef<Self> {
        Arc::new(TripleCodec::new(
            registry.resolve::<A>(),
            registry.resolve::<B>(),
            registry.resolve::<C>(),
        ))
    }
}

impl<K: Resolve + Eq + Hash, V: Resolve> Resolve for HashMap<K, V> {
    fn build_codec(registry: &CodecRegistry) -> CodecRef<Self> {
        Arc::new(MapCodec::<HashMap<K, V>>::new(
            registry.resolve::<K>(),
            registry.resolve::<V>(),
        ))
    }
}

impl<K: Resolve + Ord, V: Resolve> Resolve for BTreeMap<K, V> {
    fn build_codec(registry: &CodecRegistry) -> CodecRef<Self> {
        Arc::new(MapCodec::<BTreeMap<K, V>>::new(
            registry.resolve::<K>(),
            registry.resolve::<V>(),
        ))
    }
}
