// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use shuffle_codec::ser::varint;

fuzz_target!(|data: &[u8]| {
    if let Ok((value, used)) = varint::decode(data) {
        assert!(used <= data.len());
        let (buf, len) = varint::encode(value);
        assert!(len <= used);
        assert_eq!(varint::encoded_len(value), len);
        assert_eq!(varint::decode(&buf[..len]), Ok((value, len)));
    }
});
