// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Golden byte vectors for the SBR image layout.

use sbr_codec::{decode, decode_to_config, encode_config, SbrError, Warning, SBR_LEN};

const PCIVID_ONLY: &str = "PCIVID = 0x1000\n";

#[test]
fn pcivid_lands_little_endian_at_offset_12() {
    let bytes = encode_config(PCIVID_ONLY).expect("encode");
    assert_eq!(bytes.len(), SBR_LEN);
    assert_eq!(&bytes[0x0C..0x0E], &[0x00, 0x10]);
    // 0x5B - 0x10
    assert_eq!(bytes[0x4B], 0x4B);
    assert_eq!(&bytes[0x00..0x4C], &bytes[0x4C..0x98]);

    let nonzero: Vec<usize> = (0..SBR_LEN).filter(|i| bytes[*i] != 0).collect();
    assert_eq!(nonzero, vec![0x0D, 0x4B, 0x4C + 0x0D, 0x4C + 0x4B]);

    let (text, warnings) = decode_to_config(&bytes).expect("decode");
    assert!(warnings.is_empty());
    assert!(text.lines().any(|l| l == "PCIVID = 0x1000"));
    assert!(!text.contains("SASAddr"));
}

#[test]
fn sas_address_is_big_endian_with_checksum_at_0xef() {
    let bytes = encode_config("SASAddr = 0x5000c50000000001\n").expect("encode");
    assert_eq!(hex::encode(&bytes[0xD8..0xE0]), "5000c50000000001");
    assert!(bytes[0xE0..0xEF].iter().all(|b| *b == 0));
    // 0x5B - (0x50 + 0xC5 + 0x01) mod 256
    assert_eq!(bytes[0xEF], 0x45);
    assert!(bytes[0xF0..].iter().all(|b| *b == 0));
}

#[test]
fn explicit_zero_address_writes_its_checksum() {
    let bytes = encode_config("SASAddr = 0x0\n").expect("encode");
    assert!(bytes[0xD8..0xEF].iter().all(|b| *b == 0));
    assert_eq!(bytes[0xEF], 0x5B);
    assert_ne!(bytes, encode_config("").expect("encode"));
}

#[test]
fn empty_config_is_all_default_fields() {
    let bytes = encode_config("").expect("encode");
    let mut expected = [0u8; SBR_LEN];
    expected[0x4B] = 0x5B;
    expected[0x97] = 0x5B;
    assert_eq!(bytes, expected);
}

#[test]
fn hand_built_image_decodes_with_every_warning() {
    let mut image = [0u8; SBR_LEN];
    // copy A: Interface = 0x02 at offset 0x40, checksum left wrong (0x00)
    image[0x40] = 0x02;
    // copy B stays zeroed, so the copies differ too
    image[0xD8..0xE0].copy_from_slice(&hex::decode("0000000000000abc").expect("hex"));
    image[0xEF] = 0xFF;

    let decoded = decode(&image).expect("decode");
    assert_eq!(decoded.record.mfg.get("Interface"), Some(0x02));
    assert_eq!(
        decoded.record.sas_addr.map(|a| a.0),
        Some(0x0abc)
    );
    assert_eq!(
        decoded.warnings,
        vec![
            Warning::MfgCopiesDiffer,
            Warning::MfgChecksum {
                stored: 0x00,
                computed: 0x59
            },
            Warning::SasAddrChecksum {
                stored: 0xFF,
                // 0x5B - (0x0A + 0xBC)
                computed: 0x95
            },
        ]
    );
}

#[test]
fn truncated_image_is_a_size_error() {
    let bytes = encode_config(PCIVID_ONLY).expect("encode");
    let err = decode(&bytes[..SBR_LEN - 1]).unwrap_err();
    assert_eq!(
        err,
        SbrError::RecordSize {
            expected: SBR_LEN,
            actual: SBR_LEN - 1
        }
    );
}

#[test]
fn bogus_key_produces_no_image() {
    let err = encode_config("PCIVID = 0x1000\nBogus = 0x1\n").unwrap_err();
    assert!(matches!(err, SbrError::UnknownKey { line: 2, .. }));
    assert!(!err.is_internal());
}
