// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use shuffle_codec::{decode_from_slice, encode_to_vec, resolve_codec, Codec, DecodeLimits, Source};
use std::collections::{BTreeMap, HashSet};

type Record = (
    Vec<(String, Option<i64>)>,
    BTreeMap<u16, HashSet<u8>>,
    Option<[bool; 2]>,
);

fuzz_target!(|data: &[u8]| {
    let codec = resolve_codec::<Record>();

    // Whatever decodes must re-encode to the bytes it was read from
    if let Ok(value) = decode_from_slice(&codec, data) {
        let bytes = encode_to_vec(&codec, &value).expect("decoded value re-encodes");
        let again = decode_from_slice(&codec, &bytes).expect("re-encoded bytes decode");
        assert_eq!(
            codec.structural_value(&value).expect("structural"),
            codec.structural_value(&again).expect("structural")
        );
    }

    // Tight limits must fail cleanly, never allocate past them
    let mut input = data;
    let limits = DecodeLimits::new().with_max_len(16).with_max_prealloc(4);
    let _ = codec.decode(&mut Source::with_limits(&mut input, limits));
});
