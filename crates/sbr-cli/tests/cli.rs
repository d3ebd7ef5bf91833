// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! End-to-end tests for the `sbrtool` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const CONFIG: &str = "PCIVID = 0x1000\nPCIPID = 0x0072\nSASAddr = 0x5000c50000000001\n";

fn sbrtool() -> Command {
    let mut cmd = Command::cargo_bin("sbrtool").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn build(dir: &Path, config: &str) -> std::path::PathBuf {
    let cfg = dir.join("in.cfg");
    let bin = dir.join("sbr.bin");
    fs::write(&cfg, config).unwrap();
    sbrtool().arg("build").arg(&cfg).arg(&bin).assert().success();
    bin
}

#[test]
fn build_then_parse_round_trips() {
    let dir = tempdir().unwrap();
    let bin = build(dir.path(), CONFIG);
    assert_eq!(fs::read(&bin).unwrap().len(), 256);

    let out = dir.path().join("out.cfg");
    sbrtool()
        .arg("parse")
        .arg(&bin)
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().count(), 26);
    assert!(text.contains("PCIVID = 0x1000\n"));
    assert!(text.contains("PCIPID = 0x0072\n"));
    assert!(text.ends_with("SASAddr = 0x5000c50000000001\n"));

    // Re-building the decoder's own output reproduces the image.
    let rebuilt = dir.path().join("rebuilt.bin");
    sbrtool().arg("build").arg(&out).arg(&rebuilt).assert().success();
    assert_eq!(fs::read(&rebuilt).unwrap(), fs::read(&bin).unwrap());
}

#[test]
fn unknown_key_fails_without_output() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("bad.cfg");
    let bin = dir.path().join("sbr.bin");
    fs::write(&cfg, "PCIVID = 0x1000\nBogus = 0x1\n").unwrap();

    sbrtool()
        .arg("build")
        .arg(&cfg)
        .arg(&bin)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown key Bogus"));
    assert!(!bin.exists());
}

#[test]
fn parse_warns_on_divergent_copies_but_succeeds() {
    let dir = tempdir().unwrap();
    let bin = build(dir.path(), CONFIG);
    let mut bytes = fs::read(&bin).unwrap();
    bytes[0x4C + 0x0D] = 0x20;
    fs::write(&bin, &bytes).unwrap();

    let out = dir.path().join("out.cfg");
    sbrtool()
        .arg("parse")
        .arg(&bin)
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Mfg data copies differ, using first"));
    assert!(fs::read_to_string(&out)
        .unwrap()
        .contains("PCIVID = 0x1000\n"));
}

#[test]
fn parse_rejects_short_image() {
    let dir = tempdir().unwrap();
    let bin = dir.path().join("short.bin");
    let out = dir.path().join("out.cfg");
    fs::write(&bin, [0u8; 255]).unwrap();

    sbrtool()
        .arg("parse")
        .arg(&bin)
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 256 bytes, got 255"));
    assert!(!out.exists());
}

#[test]
fn verify_reports_clean_record() {
    let dir = tempdir().unwrap();
    let bin = build(dir.path(), CONFIG);
    sbrtool()
        .arg("verify")
        .arg(&bin)
        .assert()
        .success()
        .stdout(predicate::str::contains("PCIVID"))
        .stdout(predicate::str::contains("OK: no integrity problems"));
}

#[test]
fn verify_json_flags_bad_address_checksum() {
    let dir = tempdir().unwrap();
    let bin = build(dir.path(), CONFIG);
    let mut bytes = fs::read(&bin).unwrap();
    bytes[0xEF] ^= 0xFF;
    fs::write(&bin, &bytes).unwrap();

    let assert = sbrtool()
        .args(["verify", "--format", "json"])
        .arg(&bin)
        .assert()
        .code(2);
    let json: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(json["warnings"][0]["kind"], "sas_addr_checksum");
    assert_eq!(json["sas_addr"], "0x5000c50000000001");
}

#[test]
fn wrong_invocation_prints_usage() {
    sbrtool()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
    sbrtool()
        .args(["frobnicate", "a", "b"])
        .assert()
        .failure();
    sbrtool()
        .args(["parse", "only-one-arg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
