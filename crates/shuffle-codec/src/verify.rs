// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Contract verification helpers.
//!
//! Composite codecs verify determinism by asking each component and
//! collecting every failure under the component's label, instead of stopping
//! at the first one:
//!
//! ```ignore
//! let mut check = DeterminismCheck::new(self.describe());
//! check
//!     .component("first", self.first.verify_deterministic())
//!     .component("second", self.second.verify_deterministic());
//! check.finish()
//! ```

use crate::codec::Codec;
use crate::error::{EncodeResult, NonDeterministic, Reason};

/// Collector for a composite codec's determinism verdict.
#[derive(Debug)]
pub struct DeterminismCheck {
    codec: String,
    reasons: Vec<Reason>,
}

impl DeterminismCheck {
    pub fn new(codec: impl Into<String>) -> Self {
        Self {
            codec: codec.into(),
            reasons: Vec::new(),
        }
    }

    /// Record a reason that belongs to the composite itself.
    pub fn reason(&mut self, message: impl Into<String>) -> &mut Self {
        self.reasons.push(Reason::Message(message.into()));
        self
    }

    /// Record a component's verification outcome under `label`.
    pub fn component(
        &mut self,
        label: &'static str,
        outcome: Result<(), NonDeterministic>,
    ) -> &mut Self {
        if let Err(cause) = outcome {
            self.reasons.push(Reason::Component {
                label,
                cause: Box::new(cause),
            });
        }
        self
    }

    /// `Ok` when nothing was recorded, else one aggregated failure.
    pub fn finish(self) -> Result<(), NonDeterministic> {
        if self.reasons.is_empty() {
            Ok(())
        } else {
            Err(NonDeterministic::from_reasons(self.codec, self.reasons))
        }
    }
}

/// `verify_deterministic`, logging the failure at warn level.
///
/// For call sites that are about to use a codec as a grouping key and want
/// the full reason chain in the job log.
pub fn verify_deterministic_logged<C>(codec: &C) -> Result<(), NonDeterministic>
where
    C: Codec + ?Sized,
{
    let outcome = codec.verify_deterministic();
    if let Err(err) = &outcome {
        log::warn!("[verify] {}", err);
    }
    outcome
}

/// Compare two values under the codec's declared equality contract.
///
/// Native `==` when the codec is consistent with equals, structural values
/// otherwise.
pub fn values_match<C>(codec: &C, a: &C::Value, b: &C::Value) -> EncodeResult<bool>
where
    C: Codec + ?Sized,
    C::Value: PartialEq,
{
    if codec.is_consistent_with_equals() {
        Ok(a == b)
    } else {
        Ok(codec.structural_value(a)? == codec.structural_value(b)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_check_passes() {
        assert!(DeterminismCheck::new("PairCodec").finish().is_ok());
    }

    #[test]
    fn test_passing_components_are_not_recorded() {
        let mut check = DeterminismCheck::new("PairCodec");
        check.component("first", Ok(())).component("second", Ok(()));
        assert!(check.finish().is_ok());
    }

    #[test]
    fn test_every_failure_is_kept_in_order() {
        let mut check = DeterminismCheck::new("TripleCodec");
        check
            .component("first", Err(NonDeterministic::new("F32Codec", "nan")))
            .component("second", Ok(()))
            .component("third", Err(NonDeterministic::new("MapCodec", "order")));

        let err = check.finish().expect_err("two components failed");
        assert_eq!(err.labels().collect::<Vec<_>>(), vec!["first", "third"]);
        assert_eq!(err.first_cause().map(|c| c.codec()), Some("F32Codec"));
    }

    #[test]
    fn test_own_reason_without_component_failure() {
        let mut check = DeterminismCheck::new("MapCodec");
        check.reason("map entry order is unspecified");
        let err = check.finish().expect_err("own reason recorded");
        assert_eq!(err.labels().count(), 0);
        assert!(err.first_cause().is_none());
    }
}
