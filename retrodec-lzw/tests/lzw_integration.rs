//! Integration tests for the LZW decoder.

mod common;

use common::compress;
use proptest::prelude::*;
use retrodec_core::filter::run_decoder;
use retrodec_core::output::Output;
use retrodec_lzw::{LzwConfig, LzwDecoder, decompress_lzw, decompress_z};

fn text(len: usize) -> Vec<u8> {
    b"It was the best of times, it was the worst of times, it was the age of wisdom. "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

fn noise(len: usize, mut seed: u64) -> Vec<u8> {
    (0..len)
        .map(|_| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as u8
        })
        .collect()
}

// ============================================================================
// Round trips through the test encoder
// ============================================================================

#[test]
fn test_text_all_widths() {
    let data = text(20_000);
    for max_bits in [9, 10, 12, 14, 16] {
        let packed = compress(&data, max_bits, true, None);
        let config = LzwConfig::new(max_bits, true);
        assert_eq!(
            decompress_lzw(&packed, config, None).unwrap(),
            data,
            "max_bits {max_bits}"
        );
    }
}

#[test]
fn test_non_block_mode() {
    let data = text(5_000);
    let packed = compress(&data, 12, false, None);
    assert_eq!(
        decompress_lzw(&packed, LzwConfig::new(12, false), None).unwrap(),
        data
    );
}

#[test]
fn test_table_fills_up() {
    // 9-bit codes only leave room for 255 strings
    let data = noise(4_000, 7);
    let packed = compress(&data, 9, true, None);
    assert_eq!(decompress_lzw(&packed, LzwConfig::new(9, true), None).unwrap(), data);
}

#[test]
fn test_clear_codes() {
    let mut data = text(3_000);
    data.extend(noise(3_000, 11));
    let packed = compress(&data, 12, true, Some(700));
    assert_eq!(decompress_lzw(&packed, LzwConfig::new(12, true), None).unwrap(), data);
}

#[test]
fn test_run_of_one_byte() {
    let data = vec![b'z'; 10_000];
    let packed = compress(&data, 16, true, None);
    assert_eq!(decompress_lzw(&packed, LzwConfig::COMPRESS, None).unwrap(), data);
}

// ============================================================================
// Output cap and truncation
// ============================================================================

#[test]
fn test_expected_len_cap() {
    let data = text(5_000);
    let packed = compress(&data, 16, true, None);
    let out = decompress_lzw(&packed, LzwConfig::COMPRESS, Some(3)).unwrap();
    assert_eq!(out, &data[..3]);

    let mut buf = Vec::new();
    let mut decoder = LzwDecoder::new(LzwConfig::COMPRESS).unwrap();
    let res = run_decoder(
        &mut decoder,
        &packed,
        &mut Output::new(&mut buf).with_expected_len(1000),
    );
    assert!(!res.has_error());
    assert_eq!(buf, &data[..1000]);
    assert!(res.bytes_consumed().unwrap() < packed.len() as u64);
}

#[test]
fn test_truncated_stream_keeps_prefix() {
    let data = text(3_000);
    let packed = compress(&data, 16, true, None);
    let out = decompress_lzw(&packed[..packed.len() / 2], LzwConfig::COMPRESS, None).unwrap();
    assert!(!out.is_empty());
    assert_eq!(out, &data[..out.len()]);
}

#[test]
fn test_invalid_config() {
    let err = decompress_lzw(&[0x61], LzwConfig::new(20, true), None).unwrap_err();
    assert_eq!(err.codec, "lzw");
    assert!(err.to_string().starts_with("[lzw] Invalid parameter"));
}

// ============================================================================
// .Z files
// ============================================================================

#[test]
fn test_z_file() {
    let data = text(1_234);
    let mut file = vec![0x1F, 0x9D, 0x8C];
    file.extend(compress(&data, 12, true, None));
    assert_eq!(decompress_z(&file, None).unwrap(), data);
}

#[test]
fn test_z_bad_header() {
    assert!(decompress_z(b"PK\x03\x04", None).is_err());
    assert!(decompress_z(&[0x1F, 0x9D], None).is_err());
    // 31-bit codes
    assert!(decompress_z(&[0x1F, 0x9D, 0x9F, 0x00], None).is_err());
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_roundtrip(
        data in prop::collection::vec(any::<u8>(), 1..3000),
        max_bits in 9u8..=16,
        block_mode in any::<bool>(),
    ) {
        let packed = compress(&data, max_bits, block_mode, None);
        let out = decompress_lzw(&packed, LzwConfig::new(max_bits, block_mode), None).unwrap();
        prop_assert_eq!(out, data);
    }

    #[test]
    fn prop_garbage_is_deterministic(input in prop::collection::vec(any::<u8>(), 0..800)) {
        let a = decompress_lzw(&input, LzwConfig::COMPRESS, Some(10_000));
        let b = decompress_lzw(&input, LzwConfig::COMPRESS, Some(10_000));
        prop_assert_eq!(a, b);
    }
}
