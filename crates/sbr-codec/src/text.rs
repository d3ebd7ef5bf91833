// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `Key = Value` config text: rendering decoded records and parsing edits back.
//!
//! Rendering is canonical: table order, `0x` hex padded to the field width,
//! `SASAddr` last and only when present. Parsing is lenient about order,
//! whitespace, blank lines and number base, and strict about everything else.

use crate::error::SbrError;
use crate::layout::{field_index, MFG_FIELDS, SAS_ADDR_KEY};
use crate::record::{SasAddress, SbrRecord};

/// Render a record as config text, one `Key = Value` line per field.
#[must_use]
pub fn render_config(record: &SbrRecord) -> String {
    let mut out = String::new();
    for (field, value) in record.mfg.iter() {
        let digits = field.width.hex_digits();
        out.push_str(&format!("{} = 0x{value:0digits$x}\n", field.name));
    }
    if let Some(addr) = record.sas_addr {
        out.push_str(&format!("{SAS_ADDR_KEY} = {addr}\n"));
    }
    out
}

/// Parse config text into a record.
///
/// Keys may appear in any order; when a key repeats, its last value wins.
/// Blank lines are skipped; every other line must be a `Key = Value` pair.
/// Any `SASAddr` line marks the address present, including a zero address.
/// Fails on the first malformed line, unparseable value, oversized value or
/// unknown key.
pub fn parse_config(text: &str) -> Result<SbrRecord, SbrError> {
    let mut record = SbrRecord::default();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('=') else {
            return Err(SbrError::MalformedLine {
                line,
                content: trimmed.to_owned(),
            });
        };
        let (key, value) = (key.trim(), value.trim());

        let out_of_range = |width: usize| SbrError::ValueOutOfRange {
            line,
            key: key.to_owned(),
            value: value.to_owned(),
            width,
        };
        let parse_value = |width: usize| {
            parse_int(value).map_err(|err| match err {
                IntLiteralError::Invalid => SbrError::InvalidValue {
                    line,
                    key: key.to_owned(),
                    value: value.to_owned(),
                },
                IntLiteralError::TooLarge => out_of_range(width),
            })
        };

        if key == SAS_ADDR_KEY {
            let parsed = parse_value(8)?;
            let addr = u64::try_from(parsed).map_err(|_| out_of_range(8))?;
            record.sas_addr = Some(SasAddress(addr));
        } else if let Some(index) = field_index(key) {
            let width = MFG_FIELDS[index].width;
            let parsed = parse_value(width.bytes())?;
            let narrowed = u32::try_from(parsed)
                .ok()
                .filter(|v| *v <= width.max_value())
                .ok_or_else(|| out_of_range(width.bytes()))?;
            record.mfg.set(key, narrowed)?;
        } else {
            return Err(SbrError::UnknownKey {
                line,
                key: key.to_owned(),
            });
        }
    }
    Ok(record)
}

/// Why an integer literal was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntLiteralError {
    /// Not a well-formed literal.
    Invalid,
    /// Well-formed, but wider than 128 bits.
    TooLarge,
}

/// Parse an unsigned integer in any of the usual literal bases.
///
/// Accepts `0x`/`0X` hex, `0o`/`0O` octal, `0b`/`0B` binary and plain
/// decimal, with `_` allowed between digits. Decimal literals with a leading
/// zero (other than `0` itself) are rejected as ambiguous.
pub fn parse_int(text: &str) -> Result<u128, IntLiteralError> {
    let text = text.strip_prefix('+').unwrap_or(text);
    let (radix, digits) = match text.get(..2) {
        Some("0x" | "0X") => (16, &text[2..]),
        Some("0o" | "0O") => (8, &text[2..]),
        Some("0b" | "0B") => (2, &text[2..]),
        _ => (10, text),
    };
    // Prefixed literals may put a separator right after the prefix.
    let digits = if radix == 10 {
        digits
    } else {
        digits.strip_prefix('_').unwrap_or(digits)
    };
    if digits.is_empty()
        || !digits.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return Err(IntLiteralError::Invalid);
    }
    if radix == 10 && digits.starts_with('0') && digits.chars().any(|c| matches!(c, '1'..='9')) {
        return Err(IntLiteralError::Invalid);
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if !cleaned.chars().all(|c| c.is_digit(radix)) {
        return Err(IntLiteralError::Invalid);
    }
    // Only overflow is left once every digit is valid for the radix.
    u128::from_str_radix(&cleaned, radix).map_err(|_| IntLiteralError::TooLarge)
}
