// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Integrity report printed by `sbrtool verify`.

use comfy_table::{Cell, Table};
use sbr_codec::layout::field_offset;
use sbr_codec::{Decoded, Warning};
use serde::Serialize;

/// One manufacturing field as shown in the report.
#[derive(Debug, Serialize)]
pub struct FieldRow {
    /// Field key.
    pub name: &'static str,
    /// Byte offset inside the record.
    pub offset: usize,
    /// Width in bytes.
    pub width: usize,
    /// Decoded value.
    pub value: u32,
}

/// Warning plus its human-readable message.
#[derive(Debug, Serialize)]
pub struct WarningRow {
    /// Structured warning.
    #[serde(flatten)]
    pub warning: Warning,
    /// Rendered message.
    pub message: String,
}

/// Full verify report.
#[derive(Debug, Serialize)]
pub struct VerifyReport {
    /// Manufacturing fields in table order.
    pub fields: Vec<FieldRow>,
    /// SAS address as `0x`-prefixed hex, if present.
    pub sas_addr: Option<String>,
    /// Integrity warnings; empty for a clean record.
    pub warnings: Vec<WarningRow>,
}

impl VerifyReport {
    /// Build a report from a decode result.
    pub fn new(decoded: &Decoded) -> Self {
        let fields = decoded
            .record
            .mfg
            .iter()
            .enumerate()
            .map(|(index, (field, value))| FieldRow {
                name: field.name,
                offset: field_offset(index).unwrap_or_default(),
                width: field.width.bytes(),
                value,
            })
            .collect();
        let warnings = decoded
            .warnings
            .iter()
            .map(|w| WarningRow {
                warning: *w,
                message: w.to_string(),
            })
            .collect();
        Self {
            fields,
            sas_addr: decoded.record.sas_addr.map(|a| a.to_string()),
            warnings,
        }
    }

    /// True when the record passed every check.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Render as a table followed by one line per warning.
    pub fn to_text(&self) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Field", "Offset", "Width", "Value"]);
        for row in &self.fields {
            table.add_row(vec![
                Cell::new(row.name),
                Cell::new(format!("{:#04x}", row.offset)),
                Cell::new(row.width),
                Cell::new(format!("0x{:0digits$x}", row.value, digits = row.width * 2)),
            ]);
        }
        let mut out = table.to_string();
        out.push('\n');
        match &self.sas_addr {
            Some(addr) => out.push_str(&format!("SASAddr: {addr}\n")),
            None => out.push_str("SASAddr: absent\n"),
        }
        if self.is_clean() {
            out.push_str("OK: no integrity problems\n");
        }
        for row in &self.warnings {
            out.push_str(&format!("WARNING: {}\n", row.message));
        }
        out
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
