// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed SBR record plus the binary decoder and encoder.
//!
//! Decoding validates but never repairs: a copy mismatch or a bad checksum
//! becomes a [`Warning`] and the first copy is used as-is. Encoding always
//! produces two identical manufacturing copies and fresh checksums.

use core::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::checksum::{self, checksum};
use crate::codec::{CodecError, Reader, Writer};
use crate::error::{SbrError, Warning};
use crate::layout::{
    field_index, Field, MFG_BLOCK_LEN, MFG_COPY_A, MFG_COPY_B, MFG_DATA_LEN, MFG_FIELDS,
    MFG_FIELD_COUNT, MFG_PADDING_LEN, SAS_ADDR, SAS_ADDR_CHECKSUM, SAS_ADDR_PADDING_LEN,
    SAS_REGION_LEN, SBR_LEN, TRAILER_LEN,
};

/// Manufacturing field values in [`MFG_FIELDS`] order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MfgData {
    values: [u32; MFG_FIELD_COUNT],
}

impl MfgData {
    /// Value of the field called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<u32> {
        field_index(name).map(|i| self.values[i])
    }

    /// Set the field called `name`.
    ///
    /// Returns `Ok(false)` when no such field exists. Values wider than the
    /// field are rejected, never truncated.
    pub fn set(&mut self, name: &str, value: u32) -> Result<bool, CodecError> {
        let Some(index) = field_index(name) else {
            return Ok(false);
        };
        let width = MFG_FIELDS[index].width;
        if value > width.max_value() {
            return Err(CodecError::ValueTooWide { value, width });
        }
        self.values[index] = value;
        Ok(true)
    }

    /// Fields paired with their values, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static Field, u32)> + '_ {
        MFG_FIELDS.iter().zip(self.values.iter().copied())
    }

    /// Unpack the 75 data bytes of a manufacturing block.
    pub fn from_bytes(data: &[u8; MFG_DATA_LEN]) -> Result<Self, CodecError> {
        let mut reader = Reader::new(data);
        let mut values = [0u32; MFG_FIELD_COUNT];
        for (slot, field) in values.iter_mut().zip(MFG_FIELDS.iter()) {
            *slot = reader.read_field(field.width)?;
        }
        Ok(Self { values })
    }

    /// Pack the fields into 75 data bytes.
    pub fn to_bytes(&self) -> Result<[u8; MFG_DATA_LEN], CodecError> {
        let mut writer = Writer::with_capacity(MFG_DATA_LEN);
        for (field, value) in self.iter() {
            writer.write_field(field.width, value)?;
        }
        writer
            .into_vec()
            .try_into()
            .map_err(|_| CodecError::OutOfBounds)
    }

    /// Data bytes followed by their checksum: one manufacturing block copy.
    pub fn to_block(&self) -> Result<[u8; MFG_BLOCK_LEN], CodecError> {
        let data = self.to_bytes()?;
        let mut block = [0u8; MFG_BLOCK_LEN];
        block[..MFG_DATA_LEN].copy_from_slice(&data);
        block[MFG_DATA_LEN] = checksum(&data);
        Ok(block)
    }
}

impl Serialize for MfgData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MFG_FIELD_COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.name, &value)?;
        }
        map.end()
    }
}

/// 64-bit SAS address, stored big-endian in the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SasAddress(pub u64);

impl SasAddress {
    /// Big-endian bytes as stored at offset 0xD8.
    #[must_use]
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for SasAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Decoded contents of an SBR record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SbrRecord {
    /// Manufacturing fields (from copy A).
    pub mfg: MfgData,
    /// SAS address. Decoding yields `None` when the address bytes are all
    /// zero; encoding writes the address region for any `Some`.
    pub sas_addr: Option<SasAddress>,
}

/// Result of decoding a record: the data plus any integrity warnings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// Decoded record.
    pub record: SbrRecord,
    /// Non-fatal problems found along the way, in detection order.
    pub warnings: Vec<Warning>,
}

/// Decode a 256-byte SBR image.
///
/// Anything other than exactly 256 bytes is a [`SbrError::RecordSize`].
/// Copy mismatches and checksum errors are returned as warnings.
pub fn decode(bytes: &[u8]) -> Result<Decoded, SbrError> {
    if bytes.len() != SBR_LEN {
        return Err(SbrError::RecordSize {
            expected: SBR_LEN,
            actual: bytes.len(),
        });
    }
    let mut warnings = Vec::new();

    let copy_a = &bytes[MFG_COPY_A];
    let copy_b = &bytes[MFG_COPY_B];
    if copy_a != copy_b {
        warnings.push(Warning::MfgCopiesDiffer);
    }

    let (data, stored) = copy_a.split_at(MFG_DATA_LEN);
    if let Err(mismatch) = checksum::verify(data, stored[0]) {
        warnings.push(Warning::mfg_checksum(mismatch));
    }
    let data: &[u8; MFG_DATA_LEN] = data.try_into().map_err(|_| CodecError::OutOfBounds)?;
    let mfg = MfgData::from_bytes(data)?;

    let addr_bytes = &bytes[SAS_ADDR];
    let sas_addr = if addr_bytes.iter().all(|b| *b == 0) {
        None
    } else {
        if let Err(mismatch) = checksum::verify(addr_bytes, bytes[SAS_ADDR_CHECKSUM]) {
            warnings.push(Warning::sas_addr_checksum(mismatch));
        }
        Some(SasAddress(Reader::new(addr_bytes).read_u64_be()?))
    };

    Ok(Decoded {
        record: SbrRecord { mfg, sas_addr },
        warnings,
    })
}

/// Encode a record into a fresh 256-byte SBR image.
///
/// `None` leaves the address region zeroed. `Some(SasAddress(0))` writes a
/// zero address with its checksum (0x5B), which decodes back as `None`.
pub fn encode(record: &SbrRecord) -> Result<[u8; SBR_LEN], SbrError> {
    let block = record.mfg.to_block()?;

    let mut writer = Writer::with_capacity(SBR_LEN);
    writer.write_bytes(&block);
    writer.write_bytes(&block);
    writer.write_zeros(MFG_PADDING_LEN);

    match record.sas_addr {
        None => writer.write_zeros(SAS_REGION_LEN),
        Some(addr) => {
            let addr_bytes = addr.to_bytes();
            writer.write_bytes(&addr_bytes);
            writer.write_zeros(SAS_ADDR_PADDING_LEN);
            writer.write_u8(checksum(&addr_bytes));
        }
    }
    writer.write_zeros(TRAILER_LEN);

    let actual = writer.len();
    writer
        .into_vec()
        .try_into()
        .map_err(|_| SbrError::LayoutInvariant {
            expected: SBR_LEN,
            actual,
        })
}
