// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Optional values: `[0x00]` or `[0x01][value]`.

use super::primitives::{Never, NeverCodec};
use super::{Codec, CodecRef, StructuralValue};
use crate::config::{FLAG_FALSE, FLAG_TRUE};
use crate::error::{DecodeError, DecodeResult, EncodeResult, NonDeterministic};
use crate::ser::{Sink, Source};
use crate::size::ByteSizeObserver;
use crate::verify::DeterminismCheck;
use std::sync::Arc;

/// Codec for `Option<T>`.
pub struct OptionCodec<T> {
    value: CodecRef<T>,
}

impl<T> OptionCodec<T> {
    pub fn new(value: CodecRef<T>) -> Self {
        Self { value }
    }

    pub fn value_codec(&self) -> &CodecRef<T> {
        &self.value
    }
}

/// Codec for an optional value that is always absent.
///
/// Encodes `None` as `[0x00]`; a present flag on decode fails with
/// [`DecodeError::Uninhabited`].
pub fn absent_codec() -> OptionCodec<Never> {
    OptionCodec::new(Arc::new(NeverCodec))
}

impl<T: 'static> Codec for OptionCodec<T> {
    type Value = Option<T>;

    fn describe(&self) -> String {
        format!("OptionCodec({})", self.value.describe())
    }

    fn encode(&self, value: &Option<T>, sink: &mut Sink<'_>) -> EncodeResult<()> {
        match value {
            None => sink.write_u8(FLAG_FALSE),
            Some(inner) => {
                sink.write_u8(FLAG_TRUE)?;
                self.value
                    .encode(inner, sink)
                    .map_err(|e| e.labeled("value"))
            }
        }
    }

    fn decode(&self, source: &mut Source<'_>) -> DecodeResult<Option<T>> {
        let offset = source.offset();
        match source.read_u8()? {
            FLAG_FALSE => Ok(None),
            FLAG_TRUE => self
                .value
                .decode(source)
                .map(Some)
                .map_err(|e| e.labeled("value")),
            byte => Err(DecodeError::InvalidFlag { offset, byte }),
        }
    }

    fn verify_deterministic(&self) -> Result<(), NonDeterministic> {
        let mut check = DeterminismCheck::new(self.describe());
        check.component("value", self.value.verify_deterministic());
        check.finish()
    }

    fn is_consistent_with_equals(&self) -> bool {
        self.value.is_consistent_with_equals()
    }

    fn structural_value(&self, value: &Option<T>) -> EncodeResult<StructuralValue> {
        let inner = match value {
            None => None,
            Some(inner) => Some(Box::new(self.value.structural_value(inner)?)),
        };
        Ok(StructuralValue::Optional(inner))
    }

    fn is_cheap_to_estimate(&self, value: &Option<T>) -> bool {
        value
            .as_ref()
            .map_or(true, |inner| self.value.is_cheap_to_estimate(inner))
    }

    fn register_byte_size_observer(
        &self,
        value: &Option<T>,
        observer: &mut dyn ByteSizeObserver,
    ) -> EncodeResult<()> {
        observer.update(1);
        match value {
            None => Ok(()),
            Some(inner) => self.value.register_byte_size_observer(inner, observer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitives::{F32Codec, I32Codec, StringCodec};
    use crate::codec::{decode_from_slice, encode_to_vec};
    use crate::size::estimate_size;

    #[test]
    fn test_absent_and_present_roundtrip() {
        let codec = OptionCodec::new(Arc::new(I32Codec));
        assert_eq!(encode_to_vec(&codec, &None).expect("encode"), vec![0x00]);

        let bytes = encode_to_vec(&codec, &Some(5)).expect("encode");
        assert_eq!(bytes, vec![0x01, 0, 0, 0, 5]);
        assert_eq!(decode_from_slice(&codec, &bytes).expect("decode"), Some(5));
        assert_eq!(decode_from_slice(&codec, &[0x00]).expect("decode"), None);
    }

    #[test]
    fn test_invalid_presence_flag() {
        let codec = OptionCodec::new(Arc::new(StringCodec));
        assert!(matches!(
            decode_from_slice(&codec, &[0x02]),
            Err(DecodeError::InvalidFlag { offset: 0, byte: 0x02 })
        ));
    }

    #[test]
    fn test_absent_codec() {
        let codec = absent_codec();
        assert_eq!(encode_to_vec(&codec, &None).expect("encode"), vec![0x00]);
        assert_eq!(decode_from_slice(&codec, &[0x00]).expect("decode"), None);

        let err = decode_from_slice(&codec, &[0x01]).expect_err("never decodes");
        assert!(matches!(err.root(), DecodeError::Uninhabited));
        assert!(codec.verify_deterministic().is_ok());
    }

    #[test]
    fn test_inherits_element_contract() {
        let codec = OptionCodec::new(Arc::new(F32Codec));
        assert!(codec.verify_deterministic().is_ok());
        assert!(!codec.is_consistent_with_equals());
        assert_eq!(
            codec.structural_value(&Some(f32::NAN)).expect("structural"),
            codec.structural_value(&Some(f32::NAN)).expect("structural")
        );
        assert_ne!(
            codec.structural_value(&None).expect("structural"),
            codec.structural_value(&Some(0.0)).expect("structural")
        );
    }

    #[test]
    fn test_size_counts_flag() {
        let codec = OptionCodec::new(Arc::new(StringCodec));
        assert!(codec.is_cheap_to_estimate(&None));
        assert_eq!(estimate_size(&codec, &None).expect("size").total(), 1);
        assert_eq!(
            estimate_size(&codec, &Some("ab".to_string()))
                .expect("size")
                .total(),
            4
        );
    }
}
