// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # shuffle-codec - composable binary codecs for shuffle and grouping
//!
//! Every element that crosses a shuffle boundary of a data-processing
//! pipeline is written through a [`Codec`]. Codecs compose: the codec for
//! `Vec<(i32, String)>` is a sequence combinator over a pair combinator over
//! two leaf codecs, and the composition carries the contracts a runner needs
//! to know about, such as whether equal values always produce equal bytes
//! (required before encoded bytes can be used as a grouping key).
//!
//! ## Quick Start
//!
//! ```rust
//! use shuffle_codec::{decode_from_slice, encode_to_vec, resolve_codec, Codec};
//!
//! let codec = resolve_codec::<Vec<(bool, String)>>();
//! let value = vec![(true, "hi".to_string())];
//!
//! let bytes = encode_to_vec(&codec, &value)?;
//! assert_eq!(bytes, [0x01, 0x01, 0x02, b'h', b'i']);
//! assert_eq!(decode_from_slice(&codec, &bytes)?, value);
//! assert!(codec.verify_deterministic().is_ok());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                            registry                                 |
//! |   resolve_codec::<T>() -> CodecRegistry (DashMap<TypeId, codec>)    |
//! +---------------------------------------------------------------------+
//! |                             codec                                   |
//! |   SeqCodec | PairCodec | TripleCodec | OptionCodec | MapCodec       |
//! |   leaf codecs | DerivedCodec (char, BigInt, BigDecimal)             |
//! +---------------------------------------------------------------------+
//! |              verify               |              size               |
//! |   DeterminismCheck, values_match  |   ByteSizeObserver, estimates   |
//! +---------------------------------------------------------------------+
//! |                               ser                                   |
//! |   Sink / Source over io::Write / io::Read | ULEB128 varints         |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`codec`] - the [`Codec`] trait and every implementation (start here)
//! - [`registry`] - canonical codec per type
//! - [`verify`] - determinism aggregation and equality helpers
//! - [`size`] - encoded-size estimation
//! - [`ser`] - byte cursors and varints
//! - [`config`] - wire constants and decode limits
//! - [`error`] - encode, decode and determinism errors

/// The `Codec` trait and its implementations.
pub mod codec;
/// Wire constants and decode limits.
pub mod config;
/// Error types.
pub mod error;
/// Type-keyed codec registry.
pub mod registry;
/// Byte sink/source and varints.
pub mod ser;
/// Encoded-size estimation.
pub mod size;
/// Determinism and equality helpers.
pub mod verify;

pub use codec::{
    absent_codec, big_decimal_codec, big_int_codec, char_codec, decode_from_slice,
    encode_to_vec, encoded_size, BoolCodec, BytesCodec, Codec, CodecRef, DerivedCodec,
    F32Codec, F64Codec, I16Codec, I32Codec, I64Codec, I8Codec, IterationOrder, MapCodec,
    Mapping, Never, NeverCodec, OptionCodec, PairCodec, SeqBuilder, SeqCodec, Sequence,
    StringCodec, StructuralValue, TripleCodec, U16Codec, U32Codec, U64Codec, U8Codec,
    UnitCodec,
};
pub use config::DecodeLimits;
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult, NonDeterministic, Reason};
pub use registry::{resolve_codec, CodecRegistry, LookupStats, Resolve};
pub use ser::{Sink, Source};
pub use size::{estimate_size, ByteSizeObserver, SizeEstimate};
pub use verify::{values_match, verify_deterministic_logged, DeterminismCheck};
