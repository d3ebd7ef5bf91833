// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fatal errors and recoverable warnings produced by the codec.

use core::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::checksum::ChecksumMismatch;
use crate::codec::CodecError;

/// Fatal codec errors. Any of these aborts the operation with no output.
///
/// Line numbers are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SbrError {
    /// Binary input was not exactly one record long.
    #[error("[SBR_RECORD_SIZE] expected {expected} bytes, got {actual}")]
    RecordSize {
        /// Required size.
        expected: usize,
        /// Size supplied.
        actual: usize,
    },
    /// Config line without a `=` separator.
    #[error("[SBR_MALFORMED_LINE] line {line}: expected `Key = Value`, got {content:?}")]
    MalformedLine {
        /// Line number.
        line: usize,
        /// Raw (trimmed) line.
        content: String,
    },
    /// Value could not be parsed as an unsigned integer.
    #[error("[SBR_INVALID_VALUE] line {line}: {key}: cannot parse {value:?} as an integer")]
    InvalidValue {
        /// Line number.
        line: usize,
        /// Key the value belongs to.
        key: String,
        /// Raw value text.
        value: String,
    },
    /// Value is a valid number but does not fit its field.
    #[error("[SBR_VALUE_RANGE] line {line}: {key}: {value} exceeds {width} byte(s)")]
    ValueOutOfRange {
        /// Line number.
        line: usize,
        /// Key the value belongs to.
        key: String,
        /// Value text as written.
        value: String,
        /// Field width in bytes.
        width: usize,
    },
    /// Key is neither a manufacturing field nor `SASAddr`.
    #[error("[SBR_UNKNOWN_KEY] line {line}: unknown key {key}")]
    UnknownKey {
        /// Line number.
        line: usize,
        /// Offending key.
        key: String,
    },
    /// Assembled record has the wrong size. Indicates a codec defect, not bad input.
    #[error("[SBR_LAYOUT_INVARIANT] codec defect: assembled {actual} bytes, layout requires {expected}")]
    LayoutInvariant {
        /// Required size.
        expected: usize,
        /// Size produced.
        actual: usize,
    },
    /// Low-level reader/writer failure on an already size-checked buffer.
    #[error("[SBR_CODEC] {0}")]
    Codec(#[from] CodecError),
}

impl SbrError {
    /// True for errors caused by a codec defect rather than by the input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::LayoutInvariant { .. } | Self::Codec(_))
    }
}

/// Recoverable integrity problems found while decoding.
///
/// Warnings never stop decoding; they are reported alongside the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Manufacturing copy B differs from copy A; copy A was used.
    MfgCopiesDiffer,
    /// Manufacturing block checksum did not match.
    MfgChecksum {
        /// Byte found in the record.
        stored: u8,
        /// Byte computed from the data.
        computed: u8,
    },
    /// SAS address checksum did not match.
    SasAddrChecksum {
        /// Byte found in the record.
        stored: u8,
        /// Byte computed from the address.
        computed: u8,
    },
}

impl Warning {
    pub(crate) fn mfg_checksum(m: ChecksumMismatch) -> Self {
        Self::MfgChecksum {
            stored: m.stored,
            computed: m.computed,
        }
    }

    pub(crate) fn sas_addr_checksum(m: ChecksumMismatch) -> Self {
        Self::SasAddrChecksum {
            stored: m.stored,
            computed: m.computed,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MfgCopiesDiffer => f.write_str("Mfg data copies differ, using first"),
            Self::MfgChecksum { stored, computed } => write!(
                f,
                "Mfg data checksum error (stored {stored:#04x}, computed {computed:#04x})"
            ),
            Self::SasAddrChecksum { stored, computed } => write!(
                f,
                "SAS address checksum error (stored {stored:#04x}, computed {computed:#04x})"
            ),
        }
    }
}
