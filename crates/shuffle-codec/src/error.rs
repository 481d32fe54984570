// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for encoding, decoding, and determinism verification.
//!
//! Three families, never mixed:
//!
//! - [`EncodeError`] - the sink rejected a write or a value could not be mapped
//! - [`DecodeError`] - the source ended early, held corrupt data, or a mapping failed
//! - [`NonDeterministic`] - only produced by `verify_deterministic`
//!
//! Composite codecs wrap component failures in a `Component` variant carrying
//! a slot label (`"first"`, `"key"`, ...). The original failure stays
//! reachable through [`std::error::Error::source`].

use std::fmt;
use std::io;

// ============================================================================
// Encode errors
// ============================================================================

/// Failure while writing a value to a sink.
#[derive(Debug)]
pub enum EncodeError {
    /// The underlying writer failed.
    Io { offset: usize, source: io::Error },
    /// A length does not fit the 64-bit length prefix.
    LengthOverflow { len: usize },
    /// A derived codec could not map the value onto its base representation.
    Mapping(String),
    /// A component codec failed; `label` names the component.
    Component {
        label: &'static str,
        source: Box<EncodeError>,
    },
}

impl EncodeError {
    /// Wrap this error with the label of the component that raised it.
    #[must_use]
    pub fn labeled(self, label: &'static str) -> Self {
        EncodeError::Component {
            label,
            source: Box::new(self),
        }
    }

    /// Component labels from the outermost wrapper inwards.
    #[must_use]
    pub fn label_path(&self) -> Vec<&'static str> {
        let mut path = Vec::new();
        let mut current = self;
        while let EncodeError::Component { label, source } = current {
            path.push(*label);
            current = source;
        }
        path
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::Io { offset, source } => {
                write!(f, "write failed at offset {}: {}", offset, source)
            }
            EncodeError::LengthOverflow { len } => {
                write!(f, "length {} does not fit a 64-bit prefix", len)
            }
            EncodeError::Mapping(msg) => write!(f, "cannot map value for encoding: {}", msg),
            EncodeError::Component { label, source } => {
                write!(f, "encoding {} failed: {}", label, source)
            }
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::Io { source, .. } => Some(source),
            EncodeError::Component { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

// ============================================================================
// Decode errors
// ============================================================================

/// Failure while reading a value from a source.
///
/// Every variant is fatal for the current stream: the codec layer never
/// resynchronizes or retries.
#[derive(Debug)]
pub enum DecodeError {
    /// The underlying reader failed.
    Io { offset: usize, source: io::Error },
    /// Input ended before the value was complete.
    UnexpectedEof { offset: usize },
    /// A varint ran past 10 bytes or overflowed `u64`.
    MalformedVarint { offset: usize },
    /// A length prefix exceeds the configured limit or the address space.
    LengthLimit {
        offset: usize,
        len: u64,
        limit: usize,
    },
    /// A flag byte (boolean or presence) was neither `0x00` nor `0x01`.
    InvalidFlag { offset: usize, byte: u8 },
    /// String payload is not valid UTF-8.
    InvalidUtf8 {
        offset: usize,
        source: std::string::FromUtf8Error,
    },
    /// The stream claims to contain a value of an uninhabited type.
    Uninhabited,
    /// A fixed-size container received the wrong number of elements.
    ElementCount { expected: usize, found: usize },
    /// A derived codec rejected the decoded base value.
    Mapping(String),
    /// A whole-buffer decode left unread bytes behind.
    TrailingBytes { consumed: usize, remaining: usize },
    /// A component codec failed; `label` names the component.
    Component {
        label: &'static str,
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Wrap this error with the label of the component that raised it.
    #[must_use]
    pub fn labeled(self, label: &'static str) -> Self {
        DecodeError::Component {
            label,
            source: Box::new(self),
        }
    }

    /// Component labels from the outermost wrapper inwards.
    #[must_use]
    pub fn label_path(&self) -> Vec<&'static str> {
        let mut path = Vec::new();
        let mut current = self;
        while let DecodeError::Component { label, source } = current {
            path.push(*label);
            current = source;
        }
        path
    }

    /// The innermost error, below every component label.
    #[must_use]
    pub fn root(&self) -> &DecodeError {
        match self {
            DecodeError::Component { source, .. } => source.root(),
            other => other,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Io { offset, source } => {
                write!(f, "read failed at offset {}: {}", offset, source)
            }
            DecodeError::UnexpectedEof { offset } => {
                write!(f, "unexpected end of input at offset {}", offset)
            }
            DecodeError::MalformedVarint { offset } => {
                write!(f, "malformed varint at offset {}", offset)
            }
            DecodeError::LengthLimit { offset, len, limit } => write!(
                f,
                "length prefix {} at offset {} exceeds limit {}",
                len, offset, limit
            ),
            DecodeError::InvalidFlag { offset, byte } => {
                write!(f, "invalid flag byte {:#04x} at offset {}", byte, offset)
            }
            DecodeError::InvalidUtf8 { offset, source } => {
                write!(f, "invalid UTF-8 in string at offset {}: {}", offset, source)
            }
            DecodeError::Uninhabited => write!(f, "attempted to decode an uninhabited type"),
            DecodeError::ElementCount { expected, found } => write!(
                f,
                "fixed-size container expects {} elements, stream holds {}",
                expected, found
            ),
            DecodeError::Mapping(msg) => write!(f, "cannot map decoded value: {}", msg),
            DecodeError::TrailingBytes {
                consumed,
                remaining,
            } => write!(
                f,
                "decoder consumed {} bytes but {} bytes remain",
                consumed, remaining
            ),
            DecodeError::Component { label, source } => {
                write!(f, "decoding {} failed: {}", label, source)
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Io { source, .. } => Some(source),
            DecodeError::InvalidUtf8 { source, .. } => Some(source),
            DecodeError::Component { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result alias for encode paths.
pub type EncodeResult<T> = core::result::Result<T, EncodeError>;

/// Result alias for decode paths.
pub type DecodeResult<T> = core::result::Result<T, DecodeError>;

// ============================================================================
// Determinism failures
// ============================================================================

/// One reason a codec cannot guarantee deterministic encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// The codec itself is non-deterministic.
    Message(String),
    /// A component codec failed verification.
    Component {
        label: &'static str,
        cause: Box<NonDeterministic>,
    },
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Message(msg) => write!(f, "{}", msg),
            Reason::Component { label, cause } => write!(f, "{}: {}", label, cause),
        }
    }
}

/// Aggregated determinism failure.
///
/// Carries every labeled reason collected while verifying a composite codec,
/// so a failure deep inside `Vec<(K, HashMap<..>)>` still reports the full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonDeterministic {
    codec: String,
    reasons: Vec<Reason>,
}

impl NonDeterministic {
    /// Single-reason failure raised by a leaf codec.
    pub fn new(codec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            codec: codec.into(),
            reasons: vec![Reason::Message(reason.into())],
        }
    }

    /// Failure with a pre-collected reason list.
    pub fn from_reasons(codec: impl Into<String>, reasons: Vec<Reason>) -> Self {
        Self {
            codec: codec.into(),
            reasons,
        }
    }

    /// Description of the codec that failed verification.
    #[must_use]
    pub fn codec(&self) -> &str {
        &self.codec
    }

    #[must_use]
    pub fn reasons(&self) -> &[Reason] {
        &self.reasons
    }

    /// Labels of the components that failed, in verification order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.reasons.iter().filter_map(|reason| match reason {
            Reason::Component { label, .. } => Some(*label),
            Reason::Message(_) => None,
        })
    }

    /// The first component failure, if any component failed.
    #[must_use]
    pub fn first_cause(&self) -> Option<&NonDeterministic> {
        self.reasons.iter().find_map(|reason| match reason {
            Reason::Component { cause, .. } => Some(cause.as_ref()),
            Reason::Message(_) => None,
        })
    }
}

impl fmt::Display for NonDeterministic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not deterministic", self.codec)?;
        for (i, reason) in self.reasons.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for NonDeterministic {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.first_cause()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}
