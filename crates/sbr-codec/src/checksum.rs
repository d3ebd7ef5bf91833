// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Single-byte additive-complement checksum shared by both record blocks.

/// Base constant the checksum is subtracted from.
pub const CHECKSUM_BASE: u8 = 0x5B;

/// Compute `(0x5B - sum(bytes)) mod 256`.
///
/// Appending the result to `bytes` makes the whole span sum to
/// [`CHECKSUM_BASE`] modulo 256.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(CHECKSUM_BASE, |acc, byte| acc.wrapping_sub(*byte))
}

/// Stored checksum byte disagreed with the one computed over the data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChecksumMismatch {
    /// Byte found in the record.
    pub stored: u8,
    /// Byte computed from the covered data.
    pub computed: u8,
}

/// Check `stored` against the checksum of `data`.
pub fn verify(data: &[u8], stored: u8) -> Result<(), ChecksumMismatch> {
    let computed = checksum(data);
    if computed == stored {
        Ok(())
    } else {
        Err(ChecksumMismatch { stored, computed })
    }
}
