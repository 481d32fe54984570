// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One length-prefixed combinator for every container shape.
//!
//! # Wire Format
//!
//! ```text
//! +---------------+------+------+-----+------+
//! | count (varint)|  e1  |  e2  | ... |  en  |
//! +---------------+------+------+-----+------+
//! ```
//!
//! [`SeqCodec`] never knows which container it is reading or writing. A shape
//! plugs in by implementing [`Sequence`]: element iteration for encoding and a
//! [`SeqBuilder`] that collects decoded elements and materializes the
//! container.
//!
//! | Shape         | Order     | Builder finish            |
//! |---------------|-----------|---------------------------|
//! | `Vec<T>`      | Insertion | infallible                |
//! | `VecDeque<T>` | Insertion | infallible                |
//! | `LinkedList`  | Insertion | infallible                |
//! | `Box<[T]>`    | Insertion | infallible                |
//! | `[T; N]`      | Insertion | fails unless N elements   |
//! | `BTreeSet<T>` | Sorted    | infallible                |
//! | `HashSet<T>`  | Hashed    | infallible                |
//!
//! Hashed shapes are never deterministic: two equal sets can iterate in
//! different orders.

use super::{Codec, CodecRef, StructuralValue};
use crate::error::{DecodeError, DecodeResult, EncodeResult, NonDeterministic};
use crate::ser::{varint, Sink, Source};
use crate::size::ByteSizeObserver;
use crate::verify::DeterminismCheck;
use std::collections::{btree_set, hash_set, linked_list, vec_deque};
use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};
use std::hash::Hash;
use std::marker::PhantomData;

/// How a container orders its elements when iterated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOrder {
    /// Order of insertion (lists, arrays).
    Insertion,
    /// Sorted by the element's `Ord`.
    Sorted,
    /// Depends on hashing; differs between equal containers.
    Hashed,
}

/// Accumulates decoded elements and produces the container.
pub trait SeqBuilder {
    type Elem;
    type Output;

    fn push(&mut self, elem: Self::Elem);

    /// Materialize the container once every announced element was pushed.
    fn finish(self) -> DecodeResult<Self::Output>;
}

/// A container shape [`SeqCodec`] can encode and decode.
pub trait Sequence: Sized {
    type Elem;
    type Builder: SeqBuilder<Elem = Self::Elem, Output = Self>;
    type Iter<'a>: Iterator<Item = &'a Self::Elem>
    where
        Self: 'a,
        Self::Elem: 'a;

    /// Name used in `describe()` output.
    const SHAPE: &'static str;
    const ORDER: IterationOrder;

    fn count(&self) -> usize;
    fn elements(&self) -> Self::Iter<'_>;

    /// Builder for a container announced with `capacity` elements.
    ///
    /// `capacity` is already capped by the source's preallocation limit.
    fn builder(capacity: usize) -> Self::Builder;
}

// ============================================================================
// Shapes that are their own builder
// ============================================================================

impl<T> SeqBuilder for Vec<T> {
    type Elem = T;
    type Output = Vec<T>;

    fn push(&mut self, elem: T) {
        Vec::push(self, elem);
    }

    fn finish(self) -> DecodeResult<Vec<T>> {
        Ok(self)
    }
}

impl<T> Sequence for Vec<T> {
    type Elem = T;
    type Builder = Vec<T>;
    type Iter<'a>
        = std::slice::Iter<'a, T>
    where
        T: 'a;

    const SHAPE: &'static str = "Vec";
    const ORDER: IterationOrder = IterationOrder::Insertion;

    fn count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }

    fn builder(capacity: usize) -> Vec<T> {
        Vec::with_capacity(capacity)
    }
}

impl<T> SeqBuilder for VecDeque<T> {
    type Elem = T;
    type Output = VecDeque<T>;

    fn push(&mut self, elem: T) {
        self.push_back(elem);
    }

    fn finish(self) -> DecodeResult<VecDeque<T>> {
        Ok(self)
    }
}

impl<T> Sequence for VecDeque<T> {
    type Elem = T;
    type Builder = VecDeque<T>;
    type Iter<'a>
        = vec_deque::Iter<'a, T>
    where
        T: 'a;

    const SHAPE: &'static str = "VecDeque";
    const ORDER: IterationOrder = IterationOrder::Insertion;

    fn count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }

    fn builder(capacity: usize) -> VecDeque<T> {
        VecDeque::with_capacity(capacity)
    }
}

impl<T> SeqBuilder for LinkedList<T> {
    type Elem = T;
    type Output = LinkedList<T>;

    fn push(&mut self, elem: T) {
        self.push_back(elem);
    }

    fn finish(self) -> DecodeResult<LinkedList<T>> {
        Ok(self)
    }
}

impl<T> Sequence for LinkedList<T> {
    type Elem = T;
    type Builder = LinkedList<T>;
    type Iter<'a>
        = linked_list::Iter<'a, T>
    where
        T: 'a;

    const SHAPE: &'static str = "LinkedList";
    const ORDER: IterationOrder = IterationOrder::Insertion;

    fn count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }

    fn builder(_capacity: usize) -> LinkedList<T> {
        LinkedList::new()
    }
}

impl<T: Ord> SeqBuilder for BTreeSet<T> {
    type Elem = T;
    type Output = BTreeSet<T>;

    fn push(&mut self, elem: T) {
        self.insert(elem);
    }

    fn finish(self) -> DecodeResult<BTreeSet<T>> {
        Ok(self)
    }
}

impl<T: Ord> Sequence for BTreeSet<T> {
    type Elem = T;
    type Builder = BTreeSet<T>;
    type Iter<'a>
        = btree_set::Iter<'a, T>
    where
        T: 'a;

    const SHAPE: &'static str = "BTreeSet";
    const ORDER: IterationOrder = IterationOrder::Sorted;

    fn count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }

    fn builder(_capacity: usize) -> BTreeSet<T> {
        BTreeSet::new()
    }
}

impl<T: Eq + Hash> SeqBuilder for HashSet<T> {
    type Elem = T;
    type Output = HashSet<T>;

    fn push(&mut self, elem: T) {
        self.insert(elem);
    }

    fn finish(self) -> DecodeResult<HashSet<T>> {
        Ok(self)
    }
}

impl<T: Eq + Hash> Sequence for HashSet<T> {
    type Elem = T;
    type Builder = HashSet<T>;
    type Iter<'a>
        = hash_set::Iter<'a, T>
    where
        T: 'a;

    const SHAPE: &'static str = "HashSet";
    const ORDER: IterationOrder = IterationOrder::Hashed;

    fn count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }

    fn builder(capacity: usize) -> HashSet<T> {
        HashSet::with_capacity(capacity)
    }
}

// ============================================================================
// Shapes with a separate builder
// ============================================================================

/// Collects into a `Vec` and freezes it into a boxed slice.
#[derive(Debug)]
pub struct BoxedSliceBuilder<T>(Vec<T>);

impl<T> SeqBuilder for BoxedSliceBuilder<T> {
    type Elem = T;
    type Output = Box<[T]>;

    fn push(&mut self, elem: T) {
        self.0.push(elem);
    }

    fn finish(self) -> DecodeResult<Box<[T]>> {
        Ok(self.0.into_boxed_slice())
    }
}

impl<T> Sequence for Box<[T]> {
    type Elem = T;
    type Builder = BoxedSliceBuilder<T>;
    type Iter<'a>
        = std::slice::Iter<'a, T>
    where
        T: 'a;

    const SHAPE: &'static str = "BoxedSlice";
    const ORDER: IterationOrder = IterationOrder::Insertion;

    fn count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }

    fn builder(capacity: usize) -> BoxedSliceBuilder<T> {
        BoxedSliceBuilder(Vec::with_capacity(capacity))
    }
}

/// Collects exactly `N` elements into an array.
#[derive(Debug)]
pub struct ArrayBuilder<T, const N: usize>(Vec<T>);

impl<T, const N: usize> SeqBuilder for ArrayBuilder<T, N> {
    type Elem = T;
    type Output = [T; N];

    fn push(&mut self, elem: T) {
        self.0.push(elem);
    }

    fn finish(self) -> DecodeResult<[T; N]> {
        <[T; N]>::try_from(self.0).map_err(|rest| DecodeError::ElementCount {
            expected: N,
            found: rest.len(),
        })
    }
}

impl<T, const N: usize> Sequence for [T; N] {
    type Elem = T;
    type Builder = ArrayBuilder<T, N>;
    type Iter<'a>
        = std::slice::Iter<'a, T>
    where
        T: 'a;

    const SHAPE: &'static str = "Array";
    const ORDER: IterationOrder = IterationOrder::Insertion;

    fn count(&self) -> usize {
        N
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }

    fn builder(capacity: usize) -> ArrayBuilder<T, N> {
        ArrayBuilder(Vec::with_capacity(capacity.min(N)))
    }
}

// ============================================================================
// Codec
// ============================================================================

/// `[varint count][e1]...[en]` for any [`Sequence`] shape.
///
/// Element failures propagate unchanged; the element's own error already
/// carries the stream offset.
pub struct SeqCodec<S: Sequence> {
    elem: CodecRef<S::Elem>,
    _shape: PhantomData<fn() -> S>,
}

impl<S: Sequence> SeqCodec<S> {
    pub fn new(elem: CodecRef<S::Elem>) -> Self {
        Self {
            elem,
            _shape: PhantomData,
        }
    }

    pub fn elem_codec(&self) -> &CodecRef<S::Elem> {
        &self.elem
    }
}

impl<S> Codec for SeqCodec<S>
where
    S: Sequence + 'static,
    S::Elem: 'static,
{
    type Value = S;

    fn describe(&self) -> String {
        format!("SeqCodec<{}>({})", S::SHAPE, self.elem.describe())
    }

    fn encode(&self, value: &S, sink: &mut Sink<'_>) -> EncodeResult<()> {
        sink.write_len(value.count())?;
        for elem in value.elements() {
            self.elem.encode(elem, sink)?;
        }
        Ok(())
    }

    fn decode(&self, source: &mut Source<'_>) -> DecodeResult<S> {
        let count = source.read_len()?;
        let mut builder = S::builder(source.limits().prealloc(count));
        for _ in 0..count {
            builder.push(self.elem.decode(source)?);
        }
        builder.finish()
    }

    fn verify_deterministic(&self) -> Result<(), NonDeterministic> {
        let mut check = DeterminismCheck::new(self.describe());
        if S::ORDER == IterationOrder::Hashed {
            check.reason(format!("{} iteration order depends on hashing", S::SHAPE));
        }
        check.component("element", self.elem.verify_deterministic());
        check.finish()
    }

    fn is_consistent_with_equals(&self) -> bool {
        S::ORDER != IterationOrder::Hashed && self.elem.is_consistent_with_equals()
    }

    fn structural_value(&self, value: &S) -> EncodeResult<StructuralValue> {
        if S::ORDER == IterationOrder::Hashed {
            let set = value
                .elements()
                .map(|elem| self.elem.structural_value(elem))
                .collect::<EncodeResult<BTreeSet<_>>>()?;
            Ok(StructuralValue::Set(set))
        } else {
            let seq = value
                .elements()
                .map(|elem| self.elem.structural_value(elem))
                .collect::<EncodeResult<Vec<_>>>()?;
            Ok(StructuralValue::Seq(seq))
        }
    }

    fn is_cheap_to_estimate(&self, _value: &S) -> bool {
        false
    }

    fn register_byte_size_observer(
        &self,
        value: &S,
        observer: &mut dyn ByteSizeObserver,
    ) -> EncodeResult<()> {
        observer.update(varint::encoded_len(value.count() as u64) as u64);
        for elem in value.elements() {
            self.elem.register_byte_size_observer(elem, observer)?;
        }
        Ok(())
    }
}
