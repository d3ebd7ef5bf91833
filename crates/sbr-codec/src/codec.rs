// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Minimal fixed-layout byte codec (LE field scalars, BE address).

use thiserror::Error;

use crate::layout::FieldWidth;

/// Errors produced by the byte reader and writer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Attempted to read beyond the end of the buffer.
    #[error("buffer too short")]
    OutOfBounds,
    /// Value does not fit the requested field width.
    #[error("value {value:#x} does not fit in {} byte(s)", .width.bytes())]
    ValueTooWide {
        /// Offending value.
        value: u32,
        /// Target width.
        width: FieldWidth,
    },
}

/// Append-only writer for record bytes.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Create a new writer with a pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Write a little-endian u16.
    pub fn write_u16_le(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a little-endian u32.
    pub fn write_u32_le(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a big-endian u64.
    pub fn write_u64_be(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Write `len` zero bytes.
    pub fn write_zeros(&mut self, len: usize) {
        self.buf.resize(self.buf.len() + len, 0);
    }

    /// Write `value` little-endian using exactly `width` bytes.
    ///
    /// Refuses values wider than the field instead of truncating them.
    pub fn write_field(&mut self, width: FieldWidth, value: u32) -> Result<(), CodecError> {
        let too_wide = |_| CodecError::ValueTooWide { value, width };
        match width {
            FieldWidth::U8 => self.write_u8(u8::try_from(value).map_err(too_wide)?),
            FieldWidth::U16 => self.write_u16_le(u16::try_from(value).map_err(too_wide)?),
            FieldWidth::U32 => self.write_u32_le(value),
        }
        Ok(())
    }

    /// Bytes written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a byte slice.
#[derive(Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over the provided byte slice.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .offset
            .checked_add(len)
            .ok_or(CodecError::OutOfBounds)?;
        let out = self
            .bytes
            .get(self.offset..end)
            .ok_or(CodecError::OutOfBounds)?;
        self.offset = end;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        self.take(N)?
            .try_into()
            .map_err(|_| CodecError::OutOfBounds)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        let [byte] = self.take_array::<1>()?;
        Ok(byte)
    }

    /// Read a little-endian u16.
    pub fn read_u16_le(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Read a big-endian u64.
    pub fn read_u64_be(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_be_bytes(self.take_array()?))
    }

    /// Read a little-endian field of the given width, widened to u32.
    pub fn read_field(&mut self, width: FieldWidth) -> Result<u32, CodecError> {
        match width {
            FieldWidth::U8 => self.read_u8().map(u32::from),
            FieldWidth::U16 => self.read_u16_le().map(u32::from),
            FieldWidth::U32 => self.read_u32_le(),
        }
    }

    /// Bytes left to read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }
}
