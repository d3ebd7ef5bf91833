// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Codec for the 256-byte SBR controller configuration record.
//!
//! An SBR carries a controller's manufacturing identity (PCI IDs, hardware
//! config, interface type, ...) stored twice for redundancy, plus an optional
//! 64-bit SAS address. This crate converts between the binary image and an
//! editable `Key = Value` text form.
//!
//! # Entry points
//!
//! - [`decode_to_config`]: binary image → config text plus [`Warning`]s.
//! - [`encode_config`]: config text → binary image.
//!
//! The typed layer ([`decode`], [`encode`], [`parse_config`],
//! [`render_config`]) is public for callers that want to inspect or edit a
//! [`SbrRecord`] directly.
//!
//! # Failure policy
//!
//! Integrity problems in an image (copy mismatch, bad checksums) are
//! warnings: the first copy is used and decoding continues. Problems in the
//! text (unknown key, malformed line, bad or oversized value) are fatal
//! [`SbrError`]s and no image is produced.
#![forbid(unsafe_code)]

pub mod checksum;
pub mod codec;
mod error;
pub mod layout;
mod record;
mod text;

pub use checksum::{checksum, ChecksumMismatch, CHECKSUM_BASE};
pub use error::{SbrError, Warning};
pub use layout::{Field, FieldWidth, MFG_FIELDS, SAS_ADDR_KEY, SBR_LEN};
pub use record::{decode, encode, Decoded, MfgData, SasAddress, SbrRecord};
pub use text::{parse_config, parse_int, render_config, IntLiteralError};

/// Decode a binary image straight to config text.
///
/// Returns the text together with any integrity warnings; warnings do not
/// affect the text.
pub fn decode_to_config(bytes: &[u8]) -> Result<(String, Vec<Warning>), SbrError> {
    let Decoded { record, warnings } = decode(bytes)?;
    Ok((render_config(&record), warnings))
}

/// Encode config text straight to a binary image.
///
/// Either the whole 256-byte image is returned or an error; never a partial
/// image.
pub fn encode_config(text: &str) -> Result<[u8; SBR_LEN], SbrError> {
    encode(&parse_config(text)?)
}
