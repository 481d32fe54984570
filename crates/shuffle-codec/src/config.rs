// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration - single source of truth for wire constants and limits.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: wire-format constants (flag bytes, varint width)
//! - **Level 2 (Per source)**: [`DecodeLimits`] carried by every
//!   [`Source`](crate::ser::Source), overridable with
//!   [`Source::with_limits`](crate::ser::Source::with_limits)
//!
//! Limits only guard decoding. Encoding never consults them: a value that
//! exists in memory can always be written.

// =======================================================================
// Wire constants
// =======================================================================

/// Maximum bytes of a ULEB128-encoded `u64` (ceil(64 / 7)).
pub const MAX_VARINT_LEN: usize = 10;

/// Flag byte for `false` / an absent optional value.
pub const FLAG_FALSE: u8 = 0x00;

/// Flag byte for `true` / a present optional value.
pub const FLAG_TRUE: u8 = 0x01;

// =======================================================================
// Decode limits
// =======================================================================

/// Default upper bound for a decoded length prefix (elements or bytes).
///
/// Matches the largest signed 32-bit count, which is what pipelines written
/// against JVM runners can produce.
pub const DEFAULT_MAX_LEN: usize = i32::MAX as usize;

/// Default cap on up-front allocation driven by an untrusted length prefix.
///
/// Containers still grow past this while decoding; the cap only stops a
/// corrupt prefix from reserving gigabytes before the first element is read.
pub const DEFAULT_MAX_PREALLOC: usize = 64 * 1024;

/// Bounds applied while decoding length-prefixed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    max_len: usize,
    max_prealloc: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeLimits {
    /// Limits with the crate defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_len: DEFAULT_MAX_LEN,
            max_prealloc: DEFAULT_MAX_PREALLOC,
        }
    }

    /// Accept any length the platform can address.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_len: usize::MAX,
            max_prealloc: DEFAULT_MAX_PREALLOC,
        }
    }

    #[must_use]
    pub const fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    #[must_use]
    pub const fn with_max_prealloc(mut self, max_prealloc: usize) -> Self {
        self.max_prealloc = max_prealloc;
        self
    }

    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    #[must_use]
    pub const fn max_prealloc(&self) -> usize {
        self.max_prealloc
    }

    /// Capacity to reserve for a container announced with `len` entries.
    #[must_use]
    pub fn prealloc(&self, len: usize) -> usize {
        len.min(self.max_prealloc)
    }
}
