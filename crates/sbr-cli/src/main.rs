// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `sbrtool`: convert SBR controller records between binary and text.
//!
//! # Usage
//! ```text
//! sbrtool parse sbr.bin sbr.cfg
//! sbrtool build sbr.cfg sbr.bin
//! sbrtool verify sbr.bin [--format json]
//! ```
//!
//! Exit status is `0` on success and `1` on any error. `verify` exits `2`
//! when the record decodes but has integrity warnings. Log verbosity follows
//! `RUST_LOG` when set, otherwise `-v`/`-vv`.

// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod report;

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sbr_codec::Warning;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::report::VerifyReport;

const WARNINGS_FOUND: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "sbrtool",
    version,
    about = "Parse, build and verify SBR controller configuration records",
    disable_help_subcommand = true
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a binary SBR image into `Key = Value` config text.
    Parse {
        /// Binary SBR image (256 bytes).
        sbr_bin: PathBuf,
        /// Config text to write.
        sbr_cfg: PathBuf,
    },
    /// Encode `Key = Value` config text into a binary SBR image.
    Build {
        /// Config text to read.
        sbr_cfg: PathBuf,
        /// Binary SBR image to write.
        sbr_bin: PathBuf,
    },
    /// Check a binary SBR image and print a field report without writing anything.
    Verify {
        /// Binary SBR image (256 bytes).
        sbr_bin: PathBuf,
        /// Report format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Parse { sbr_bin, sbr_cfg } => run_parse(&sbr_bin, &sbr_cfg),
        Commands::Build { sbr_cfg, sbr_bin } => run_build(&sbr_cfg, &sbr_bin),
        Commands::Verify { sbr_bin, format } => run_verify(&sbr_bin, format),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn report_warnings(path: &Path, warnings: &[Warning]) {
    for warning in warnings {
        warn!(path = %path.display(), "{warning}");
    }
}

fn run_parse(sbr_bin: &Path, sbr_cfg: &Path) -> Result<ExitCode> {
    let bytes = fs::read(sbr_bin).with_context(|| format!("read {}", sbr_bin.display()))?;
    let (text, warnings) = sbr_codec::decode_to_config(&bytes)
        .with_context(|| format!("decode {}", sbr_bin.display()))?;
    report_warnings(sbr_bin, &warnings);

    fs::write(sbr_cfg, &text).with_context(|| format!("write {}", sbr_cfg.display()))?;
    info!(
        from = %sbr_bin.display(),
        to = %sbr_cfg.display(),
        lines = text.lines().count(),
        warnings = warnings.len(),
        "parsed SBR image"
    );
    Ok(ExitCode::SUCCESS)
}

fn run_build(sbr_cfg: &Path, sbr_bin: &Path) -> Result<ExitCode> {
    let text =
        fs::read_to_string(sbr_cfg).with_context(|| format!("read {}", sbr_cfg.display()))?;
    let record =
        sbr_codec::parse_config(&text).with_context(|| format!("parse {}", sbr_cfg.display()))?;
    debug!(sas_addr = ?record.sas_addr, "config parsed");
    let image = sbr_codec::encode(&record).context("encode SBR image")?;

    // Written only once the whole image exists, so a failed build leaves no file.
    fs::write(sbr_bin, image).with_context(|| format!("write {}", sbr_bin.display()))?;
    info!(
        from = %sbr_cfg.display(),
        to = %sbr_bin.display(),
        bytes = image.len(),
        "built SBR image"
    );
    Ok(ExitCode::SUCCESS)
}

fn run_verify(sbr_bin: &Path, format: Format) -> Result<ExitCode> {
    let bytes = fs::read(sbr_bin).with_context(|| format!("read {}", sbr_bin.display()))?;
    let decoded =
        sbr_codec::decode(&bytes).with_context(|| format!("decode {}", sbr_bin.display()))?;
    report_warnings(sbr_bin, &decoded.warnings);

    let report = VerifyReport::new(&decoded);
    match format {
        Format::Text => print!("{}", report.to_text()),
        Format::Json => println!("{}", report.to_json().context("serialize report")?),
    }

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(WARNINGS_FOUND))
    }
}
