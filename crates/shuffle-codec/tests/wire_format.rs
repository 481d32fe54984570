// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::too_many_lines)] // Example/test code

//! Golden wire-format vectors
//!
//! Every vector is checked three ways: encoding matches the expected bytes,
//! decoding yields the original value, and re-encoding the decoded value is
//! byte-identical.

use shuffle_codec::{
    decode_from_slice, encode_to_vec, resolve_codec, Codec, CodecRegistry, DecodeError, Resolve,
};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt::Debug;

fn golden_test<T>(name: &str, value: &T, expected: &[u8])
where
    T: Resolve + PartialEq + Debug,
{
    let codec = resolve_codec::<T>();
    let encoded = encode_to_vec(&codec, value).unwrap_or_else(|e| panic!("{name}: encode: {e}"));
    assert_eq!(encoded, expected, "{name}: encoded bytes differ from golden");

    let decoded = decode_from_slice(&codec, &encoded).unwrap_or_else(|e| panic!("{name}: decode: {e}"));
    assert_eq!(&decoded, value, "{name}: roundtrip value mismatch");

    let re_encoded = encode_to_vec(&codec, &decoded).expect("re-encode");
    assert_eq!(re_encoded, encoded, "{name}: re-encoded bytes differ");
}

#[test]
fn golden_vec_i32() {
    golden_test(
        "vec_i32",
        &vec![1i32, 2, 3],
        &[
            0x03, // count
            0x00, 0x00, 0x00, 0x01, //
            0x00, 0x00, 0x00, 0x02, //
            0x00, 0x00, 0x00, 0x03,
        ],
    );
}

#[test]
fn golden_pair_bool_string() {
    golden_test(
        "pair_bool_string",
        &(true, "hi".to_string()),
        &[0x01, 0x02, b'h', b'i'],
    );
}

#[test]
fn golden_optional() {
    golden_test::<Option<i64>>("option_none", &None, &[0x00]);
    golden_test(
        "option_some",
        &Some(-1i64),
        &[0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
    );
}

#[test]
fn golden_btree_map() {
    let map: BTreeMap<u8, bool> = [(1, true), (2, false)].into_iter().collect();
    golden_test("btree_map", &map, &[0x02, 0x01, 0x01, 0x02, 0x00]);
}

#[test]
fn golden_multibyte_length_prefix() {
    let value: Vec<u8> = vec![0x5A; 300];
    let mut expected = vec![0xAC, 0x02];
    expected.extend(std::iter::repeat(0x5A).take(300));
    golden_test("bytes_300", &value, &expected);
}

#[test]
fn golden_empty_containers() {
    golden_test::<Vec<String>>("empty_vec", &Vec::new(), &[0x00]);
    golden_test::<VecDeque<u32>>("empty_deque", &VecDeque::new(), &[0x00]);
    golden_test::<BTreeSet<i16>>("empty_set", &BTreeSet::new(), &[0x00]);
    golden_test::<String>("empty_string", &String::new(), &[0x00]);
}

#[test]
fn golden_floats_by_bit_pattern() {
    golden_test("f32_one", &1.0f32, &[0x3F, 0x80, 0x00, 0x00]);
    golden_test(
        "f64_neg_two",
        &-2.0f64,
        &[0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    );
}

#[test]
fn golden_nested_shapes() {
    let value: Vec<(u16, Option<char>)> = vec![(1, Some('a')), (0x0203, None)];
    golden_test(
        "vec_pair_option",
        &value,
        &[0x02, 0x00, 0x01, 0x01, b'a', 0x02, 0x03, 0x00],
    );

    golden_test(
        "triple_unit",
        &((), 7u8, [true, false]),
        &[0x07, 0x02, 0x01, 0x00],
    );
}

#[test]
fn length_prefix_matches_element_count() {
    let codec = resolve_codec::<Vec<u64>>();
    for n in [0usize, 1, 127, 128, 1000] {
        let value: Vec<u64> = (0..n as u64).collect();
        let bytes = encode_to_vec(&codec, &value).expect("encode");
        let prefix = if n < 128 { 1 } else { 2 };
        assert_eq!(bytes.len(), prefix + n * 8, "n = {}", n);
        assert_eq!(decode_from_slice(&codec, &bytes).expect("decode").len(), n);
    }
}

#[test]
fn trailing_bytes_are_rejected() {
    let codec = resolve_codec::<u16>();
    match decode_from_slice(&codec, &[0x00, 0x01, 0xFF]) {
        Err(DecodeError::TrailingBytes {
            consumed,
            remaining,
        }) => {
            assert_eq!(consumed, 2);
            assert_eq!(remaining, 1);
        }
        other => panic!("expected TrailingBytes, got {:?}", other),
    }
}

#[test]
fn truncated_inputs_fail_cleanly() {
    let registry = CodecRegistry::new();
    let codec = registry.resolve::<Vec<(i32, String)>>();
    let bytes = encode_to_vec(&codec, &vec![(5, "abc".to_string()), (6, "de".to_string())])
        .expect("encode");

    for cut in 0..bytes.len() {
        let err = decode_from_slice(&codec, &bytes[..cut]).expect_err("truncated input");
        assert!(
            matches!(err.root(), DecodeError::UnexpectedEof { .. }),
            "cut {}: {:?}",
            cut,
            err
        );
    }
}

#[test]
fn overlong_varint_prefix_is_malformed() {
    let codec = resolve_codec::<String>();
    let mut bytes = vec![0xFF; 10];
    bytes.push(0x01);
    assert!(matches!(
        decode_from_slice(&codec, &bytes),
        Err(DecodeError::MalformedVarint { offset: 0 })
    ));
}

#[test]
fn describe_names_the_composition() {
    let codec = resolve_codec::<BTreeMap<String, Vec<Option<bool>>>>();
    assert_eq!(
        codec.describe(),
        "MapCodec<BTreeMap>(StringCodec, SeqCodec<Vec>(OptionCodec(BoolCodec)))"
    );
}
