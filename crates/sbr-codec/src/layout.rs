// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed byte layout of the SBR record and the manufacturing field table.
//!
//! Record layout (256 bytes, all offsets fixed):
//!
//! ```text
//! 0x00..0x4C  manufacturing block, copy A (75 data bytes + 1 checksum)
//! 0x4C..0x98  manufacturing block, copy B (byte-identical to copy A)
//! 0x98..0xD8  reserved (zero)
//! 0xD8..0xE0  SAS address, big-endian u64, all-zero when absent
//! 0xE0..0xEF  reserved (zero)
//! 0xEF        SAS address checksum
//! 0xF0..0x100 reserved (zero)
//! ```
//!
//! [`MFG_FIELDS`] *is* the format: renaming or reordering an entry breaks
//! binary compatibility with every record already flashed.

use core::ops::Range;

/// Total size of an SBR record in bytes.
pub const SBR_LEN: usize = 0x100;

/// Packed size of the manufacturing fields (without checksum).
pub const MFG_DATA_LEN: usize = 75;

/// Manufacturing block size including its trailing checksum byte.
pub const MFG_BLOCK_LEN: usize = MFG_DATA_LEN + 1;

/// Copy A of the manufacturing block.
pub const MFG_COPY_A: Range<usize> = 0x00..0x4C;

/// Copy B of the manufacturing block.
pub const MFG_COPY_B: Range<usize> = 0x4C..0x98;

/// Zero padding between copy B and the SAS address.
pub const MFG_PADDING_LEN: usize = 0x40;

/// SAS address bytes (big-endian).
pub const SAS_ADDR: Range<usize> = 0xD8..0xE0;

/// Offset of the SAS address checksum byte.
pub const SAS_ADDR_CHECKSUM: usize = 0xEF;

/// Zero padding between the SAS address and its checksum.
pub const SAS_ADDR_PADDING_LEN: usize = SAS_ADDR_CHECKSUM - SAS_ADDR.end;

/// Length of the whole address region, address through checksum.
pub const SAS_REGION_LEN: usize = SAS_ADDR_CHECKSUM + 1 - SAS_ADDR.start;

/// Trailing reserved bytes after the address checksum.
pub const TRAILER_LEN: usize = SBR_LEN - SAS_ADDR_CHECKSUM - 1;

/// Text key carrying the SAS address.
pub const SAS_ADDR_KEY: &str = "SASAddr";

/// Width of a manufacturing field. All fields are unsigned little-endian.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldWidth {
    /// One byte.
    U8,
    /// Two bytes, little-endian.
    U16,
    /// Four bytes, little-endian.
    U32,
}

impl FieldWidth {
    /// Packed size in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// Largest value the field can hold.
    #[must_use]
    pub const fn max_value(self) -> u32 {
        match self {
            Self::U8 => 0xFF,
            Self::U16 => 0xFFFF,
            Self::U32 => u32::MAX,
        }
    }

    /// Number of hex digits used when rendering the field.
    #[must_use]
    pub const fn hex_digits(self) -> usize {
        self.bytes() * 2
    }
}

/// One named entry of the manufacturing field table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    /// Key used in the config text.
    pub name: &'static str,
    /// Packed width.
    pub width: FieldWidth,
}

const fn field(name: &'static str, width: FieldWidth) -> Field {
    Field { name, width }
}

/// Number of manufacturing fields.
pub const MFG_FIELD_COUNT: usize = 25;

const FIELD_TABLE: [Field; MFG_FIELD_COUNT] = [
    field("Unk00", FieldWidth::U32),
    field("Unk04", FieldWidth::U32),
    field("Unk08", FieldWidth::U32),
    field("PCIVID", FieldWidth::U16),
    field("PCIPID", FieldWidth::U16),
    field("Unk10", FieldWidth::U16),
    field("HwConfig", FieldWidth::U16),
    field("SubsysVID", FieldWidth::U16),
    field("SubsysPID", FieldWidth::U16),
    field("Unk18", FieldWidth::U32),
    field("Unk1c", FieldWidth::U32),
    field("Unk20", FieldWidth::U32),
    field("Unk24", FieldWidth::U32),
    field("Unk28", FieldWidth::U32),
    field("Unk2c", FieldWidth::U32),
    field("Unk30", FieldWidth::U32),
    field("Unk34", FieldWidth::U32),
    field("Unk38", FieldWidth::U32),
    field("Unk3c", FieldWidth::U32),
    field("Interface", FieldWidth::U8),
    field("Unk41", FieldWidth::U8),
    field("Unk42", FieldWidth::U16),
    field("Unk44", FieldWidth::U32),
    field("Unk48", FieldWidth::U16),
    field("Unk4a", FieldWidth::U8),
];

/// Manufacturing fields in packing order.
pub static MFG_FIELDS: [Field; MFG_FIELD_COUNT] = FIELD_TABLE;

const fn packed_len(fields: &[Field]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < fields.len() {
        total += fields[i].width.bytes();
        i += 1;
    }
    total
}

const _: () = assert!(packed_len(&FIELD_TABLE) == MFG_DATA_LEN);
const _: () = assert!(MFG_COPY_A.end - MFG_COPY_A.start == MFG_BLOCK_LEN);
const _: () = assert!(MFG_COPY_B.end - MFG_COPY_B.start == MFG_BLOCK_LEN);
const _: () = assert!(MFG_COPY_B.end + MFG_PADDING_LEN == SAS_ADDR.start);

/// Index of the field called `name` (exact, case-sensitive match).
#[must_use]
pub fn field_index(name: &str) -> Option<usize> {
    MFG_FIELDS.iter().position(|f| f.name == name)
}

/// Byte offset of field `index` inside the manufacturing data block.
///
/// Returns `None` when `index` is past the end of the table.
#[must_use]
pub fn field_offset(index: usize) -> Option<usize> {
    if index >= MFG_FIELD_COUNT {
        return None;
    }
    Some(packed_len(&MFG_FIELDS[..index]))
}
