// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte sink and source wrapping `std::io` streams.
//!
//! Codecs never see a raw `Write`/`Read`: they go through [`Sink`] and
//! [`Source`], which track the stream offset (reported in every error) and,
//! on the read side, enforce [`DecodeLimits`]. All fixed-width values are
//! big-endian.

use super::varint;
use crate::config::{DecodeLimits, MAX_VARINT_LEN};
use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
use std::io::{self, Read, Write};

/// Generate big-endian write methods for fixed-width primitives.
macro_rules! impl_write_be {
    ($($name:ident: $type:ty),* $(,)?) => {
        $(
            pub fn $name(&mut self, value: $type) -> EncodeResult<()> {
                self.write_bytes(&value.to_be_bytes())
            }
        )*
    };
}

/// Generate big-endian read methods for fixed-width primitives.
macro_rules! impl_read_be {
    ($($name:ident: $type:ty),* $(,)?) => {
        $(
            pub fn $name(&mut self) -> DecodeResult<$type> {
                let mut bytes = [0u8; std::mem::size_of::<$type>()];
                self.read_exact(&mut bytes)?;
                Ok(<$type>::from_be_bytes(bytes))
            }
        )*
    };
}

/// Output side of a codec call.
pub struct Sink<'a> {
    inner: &'a mut dyn Write,
    offset: usize,
}

impl<'a> Sink<'a> {
    pub fn new(inner: &'a mut dyn Write) -> Self {
        Self { inner, offset: 0 }
    }

    impl_write_be!(
        write_u8: u8,
        write_u16: u16,
        write_u32: u32,
        write_u64: u64,
        write_i8: i8,
        write_i16: i16,
        write_i32: i32,
        write_i64: i64,
        write_f32: f32,
        write_f64: f64,
    );

    pub fn write_bytes(&mut self, data: &[u8]) -> EncodeResult<()> {
        self.inner
            .write_all(data)
            .map_err(|source| EncodeError::Io {
                offset: self.offset,
                source,
            })?;
        self.offset += data.len();
        Ok(())
    }

    pub fn write_varint(&mut self, value: u64) -> EncodeResult<()> {
        let (buf, len) = varint::encode(value);
        self.write_bytes(&buf[..len])
    }

    /// Write a container or byte-string length prefix.
    pub fn write_len(&mut self, len: usize) -> EncodeResult<()> {
        let value = u64::try_from(len).map_err(|_| EncodeError::LengthOverflow { len })?;
        self.write_varint(value)
    }

    /// Bytes written through this sink so far.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Input side of a codec call.
pub struct Source<'a> {
    inner: &'a mut dyn Read,
    offset: usize,
    limits: DecodeLimits,
}

impl<'a> Source<'a> {
    pub fn new(inner: &'a mut dyn Read) -> Self {
        Self::with_limits(inner, DecodeLimits::default())
    }

    pub fn with_limits(inner: &'a mut dyn Read, limits: DecodeLimits) -> Self {
        Self {
            inner,
            offset: 0,
            limits,
        }
    }

    impl_read_be!(
        read_u8: u8,
        read_u16: u16,
        read_u32: u32,
        read_u64: u64,
        read_i8: i8,
        read_i16: i16,
        read_i32: i32,
        read_i64: i64,
        read_f32: f32,
        read_f64: f64,
    );

    pub fn read_exact(&mut self, buf: &mut [u8]) -> DecodeResult<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len();
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(DecodeError::UnexpectedEof {
                    offset: self.offset,
                })
            }
            Err(source) => Err(DecodeError::Io {
                offset: self.offset,
                source,
            }),
        }
    }

    /// Read one varint, byte by byte, without over-reading the stream.
    pub fn read_varint(&mut self) -> DecodeResult<u64> {
        let start = self.offset;
        let mut buf = [0u8; MAX_VARINT_LEN];
        for used in 1..=MAX_VARINT_LEN {
            let byte = self.read_u8()?;
            buf[used - 1] = byte;
            if byte & 0x80 == 0 {
                return varint::decode(&buf[..used])
                    .map(|(value, _)| value)
                    .map_err(|_| DecodeError::MalformedVarint { offset: start });
            }
        }
        Err(DecodeError::MalformedVarint { offset: start })
    }

    /// Read a length prefix and check it against the configured limit.
    pub fn read_len(&mut self) -> DecodeResult<usize> {
        let start = self.offset;
        let raw = self.read_varint()?;
        let limit = self.limits.max_len();
        match usize::try_from(raw) {
            Ok(len) if len <= limit => Ok(len),
            _ => Err(DecodeError::LengthLimit {
                offset: start,
                len: raw,
                limit,
            }),
        }
    }

    /// Read exactly `len` raw bytes.
    ///
    /// Allocation grows with the bytes actually received, so a corrupt
    /// length fails with `UnexpectedEof` instead of reserving `len` upfront.
    pub fn read_vec(&mut self, len: usize) -> DecodeResult<Vec<u8>> {
        let mut out = Vec::with_capacity(self.limits.prealloc(len));
        let wanted = u64::try_from(len).map_err(|_| DecodeError::LengthLimit {
            offset: self.offset,
            len: u64::MAX,
            limit: self.limits.max_len(),
        })?;
        let got = (&mut *self.inner)
            .take(wanted)
            .read_to_end(&mut out)
            .map_err(|source| DecodeError::Io {
                offset: self.offset,
                source,
            })?;
        if got < len {
            return Err(DecodeError::UnexpectedEof {
                offset: self.offset + got,
            });
        }
        self.offset += got;
        Ok(out)
    }

    /// Bytes consumed from this source so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_values_are_big_endian() {
        let mut out = Vec::new();
        let mut sink = Sink::new(&mut out);
        sink.write_u16(0x0102).expect("write u16");
        sink.write_i32(-2).expect("write i32");
        sink.write_f32(1.0).expect("write f32");
        assert_eq!(sink.offset(), 10);
        assert_eq!(
            out,
            vec![0x01, 0x02, 0xFF, 0xFF, 0xFF, 0xFE, 0x3F, 0x80, 0x00, 0x00]
        );

        let mut input: &[u8] = &out;
        let mut source = Source::new(&mut input);
        assert_eq!(source.read_u16().expect("read u16"), 0x0102);
        assert_eq!(source.read_i32().expect("read i32"), -2);
        assert_eq!(source.read_f32().expect("read f32"), 1.0);
        assert_eq!(source.offset(), 10);
    }

    #[test]
    fn test_short_read_reports_offset() {
        let mut input: &[u8] = &[0x00, 0x01, 0x02];
        let mut source = Source::new(&mut input);
        assert_eq!(source.read_u16().expect("read u16"), 1);
        match source.read_u32() {
            Err(DecodeError::UnexpectedEof { offset }) => assert_eq!(offset, 2),
            other => panic!("expected UnexpectedEof, got {:?}", other),
        }
    }

    #[test]
    fn test_varint_reads_leave_following_bytes() {
        let mut input: &[u8] = &[0xAC, 0x02, 0x7F];
        let mut source = Source::new(&mut input);
        assert_eq!(source.read_varint().expect("first"), 300);
        assert_eq!(source.read_varint().expect("second"), 127);
        assert_eq!(source.offset(), 3);
    }

    #[test]
    fn test_overlong_varint_is_malformed() {
        let bytes = [0x80u8; 12];
        let mut input: &[u8] = &bytes;
        let mut source = Source::new(&mut input);
        assert!(matches!(
            source.read_varint(),
            Err(DecodeError::MalformedVarint { offset: 0 })
        ));
    }

    #[test]
    fn test_length_limit_is_enforced() {
        let mut input: &[u8] = &[0xAC, 0x02];
        let limits = DecodeLimits::new().with_max_len(100);
        let mut source = Source::with_limits(&mut input, limits);
        match source.read_len() {
            Err(DecodeError::LengthLimit { len, limit, .. }) => {
                assert_eq!(len, 300);
                assert_eq!(limit, 100);
            }
            other => panic!("expected LengthLimit, got {:?}", other),
        }
    }

    #[test]
    fn test_read_vec_fails_on_truncated_payload() {
        let mut input: &[u8] = &[1, 2, 3];
        let mut source = Source::new(&mut input);
        match source.read_vec(1_000_000) {
            Err(DecodeError::UnexpectedEof { offset }) => assert_eq!(offset, 3),
            other => panic!("expected UnexpectedEof, got {:?}", other),
        }
    }

    #[test]
    fn test_sink_surfaces_writer_errors() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut broken = Broken;
        let mut sink = Sink::new(&mut broken);
        assert!(matches!(
            sink.write_u8(1),
            Err(EncodeError::Io { offset: 0, .. })
        ));
    }
}
