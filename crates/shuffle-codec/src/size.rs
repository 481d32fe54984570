// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte-size estimation.
//!
//! Runners ask "how many bytes will this element take on the wire?" to size
//! shuffle buffers and apply backpressure. Codecs answer by visiting a
//! [`ByteSizeObserver`] with the sizes of their parts:
//!
//! ```text
//! Vec<(i32, String)> [ (1, "ab") ]
//!   -> update(1)            count prefix
//!   -> update(4)            i32
//!   -> update(1 + 2)        string prefix + bytes
//! ```
//!
//! `is_cheap_to_estimate` tells the caller whether that walk is O(1).
//! Containers always answer `false`: their size needs every element.

use crate::codec::Codec;
use crate::error::EncodeResult;
use crate::ser::Sink;
use std::io;

/// Accumulator visited by `Codec::register_byte_size_observer`.
pub trait ByteSizeObserver {
    /// Record `bytes` more encoded bytes.
    fn update(&mut self, bytes: u64);

    /// Mark the running total as an approximation.
    fn set_lazy(&mut self) {}
}

/// Default observer: sums updates into a single total.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SizeEstimate {
    total: u64,
    lazy: bool,
}

impl SizeEstimate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }
}

impl ByteSizeObserver for SizeEstimate {
    fn update(&mut self, bytes: u64) {
        self.total = self.total.saturating_add(bytes);
    }

    fn set_lazy(&mut self) {
        self.lazy = true;
    }
}

/// Estimate the encoded size of `value` in one pass.
pub fn estimate_size<C>(codec: &C, value: &C::Value) -> EncodeResult<SizeEstimate>
where
    C: Codec + ?Sized,
{
    let mut estimate = SizeEstimate::new();
    codec.register_byte_size_observer(value, &mut estimate)?;
    Ok(estimate)
}

/// Writer that discards bytes and counts them.
#[derive(Debug, Default)]
pub(crate) struct CountingWriter {
    count: u64,
}

impl CountingWriter {
    pub(crate) fn count(&self) -> u64 {
        self.count
    }
}

impl io::Write for CountingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.count = self.count.saturating_add(buf.len() as u64);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Fallback observation: encode into a counting sink and report the length.
///
/// Used by codecs with no cheaper way to know their size.
pub fn observe_by_encoding<C>(
    codec: &C,
    value: &C::Value,
    observer: &mut dyn ByteSizeObserver,
) -> EncodeResult<()>
where
    C: Codec + ?Sized,
{
    let mut counter = CountingWriter::default();
    codec.encode(value, &mut Sink::new(&mut counter))?;
    observer.update(counter.count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_estimate_accumulates_and_saturates() {
        let mut estimate = SizeEstimate::new();
        estimate.update(3);
        estimate.update(4);
        assert_eq!(estimate.total(), 7);
        estimate.update(u64::MAX);
        assert_eq!(estimate.total(), u64::MAX);
        assert!(!estimate.is_lazy());
        estimate.set_lazy();
        assert!(estimate.is_lazy());
    }

    #[test]
    fn test_counting_writer_counts_without_storing() {
        let mut counter = CountingWriter::default();
        counter.write_all(&[0u8; 17]).expect("infallible");
        counter.write_all(b"abc").expect("infallible");
        assert_eq!(counter.count(), 20);
    }
}
