// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte-level plumbing shared by every codec: stream cursors and varints.

pub mod cursor;
pub mod varint;

pub use cursor::{Sink, Source};
pub use varint::VarintError;
