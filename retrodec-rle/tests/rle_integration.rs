//! Integration tests for the RLE90 and PackBits streaming decoders.
//!
//! These tests drive the codecs through the filter protocol with various
//! chunkings, output caps and reset commands.

use proptest::prelude::*;
use retrodec_core::filter::{Codec, Command, Filter, decompress_oneshot};
use retrodec_core::output::Output;
use retrodec_core::{Crc32, DecompressResult};
use retrodec_rle::{
    PackBitsConfig, PackBitsDecoder, Rle90Decoder, decompress_packbits, decompress_rle90,
};

/// Feed `input` in chunks of `chunk` bytes.
fn decode_chunked(codec: Box<dyn Codec>, input: &[u8], chunk: usize) -> (Vec<u8>, DecompressResult) {
    let mut buf = Vec::new();
    let res = {
        let mut filter = Filter::new(codec, Output::new(&mut buf));
        for piece in input.chunks(chunk.max(1)) {
            filter.feed(piece);
        }
        filter.finish();
        filter.into_result()
    };
    (buf, res)
}

/// Minimal RLE90 encoder, enough to produce valid streams for the tests.
fn rle90_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let b = data[i];
        let mut run = 1;
        while i + run < data.len() && data[i + run] == b && run < 255 {
            run += 1;
        }
        if b == 0x90 {
            out.extend_from_slice(&[0x90, 0x00]);
        } else {
            out.push(b);
        }
        if run > 1 {
            out.extend_from_slice(&[0x90, run as u8]);
        }
        i += run;
    }
    out
}

/// Minimal PackBits encoder: repeats of 3+ become runs, the rest literals.
fn packbits_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut literal: Vec<u8> = Vec::new();
    let flush = |literal: &mut Vec<u8>, out: &mut Vec<u8>| {
        for chunk in literal.chunks(128) {
            out.push((chunk.len() - 1) as u8);
            out.extend_from_slice(chunk);
        }
        literal.clear();
    };

    let mut i = 0;
    while i < data.len() {
        let b = data[i];
        let mut run = 1;
        while i + run < data.len() && data[i + run] == b && run < 128 {
            run += 1;
        }
        if run >= 3 {
            flush(&mut literal, &mut out);
            out.push((257 - run) as u8);
            out.push(b);
        } else {
            literal.extend_from_slice(&data[i..i + run]);
        }
        i += run;
    }
    flush(&mut literal, &mut out);
    out
}

// ============================================================================
// Known Vectors
// ============================================================================

#[test]
fn test_rle90_known_vectors() {
    assert_eq!(decompress_rle90(&[0x90, 0x00], None).unwrap(), vec![0x90]);
    assert_eq!(decompress_rle90(&[0x41, 0x90, 0x04], None).unwrap(), b"AAAA");
    assert_eq!(decompress_rle90(&[], None).unwrap(), Vec::<u8>::new());
}

#[test]
fn test_packbits_known_vectors() {
    assert_eq!(decompress_packbits(&[0x00, 0x7F], None).unwrap(), vec![0x7F]);
    assert_eq!(decompress_packbits(&[0xFF, 0x41], None).unwrap(), vec![0x41, 0x41]);

    let mut buf = Vec::new();
    let res = decompress_oneshot(
        Box::new(PackBitsDecoder::default()),
        &[0x80],
        Output::new(&mut buf),
    );
    assert_eq!(res.bytes_consumed(), Some(1));
    assert!(buf.is_empty());
}

// ============================================================================
// Output Cap
// ============================================================================

#[test]
fn test_expected_len_caps_output() {
    // Input able to produce 100 bytes.
    let rle = [0x41, 0x90, 100];
    assert_eq!(decompress_rle90(&rle, Some(3)).unwrap(), b"AAA");

    let pb = [0x9D, 0x42, 0x9D, 0x43, 0x9D, 0x44];
    let out = decompress_packbits(&pb, Some(3)).unwrap();
    assert_eq!(out, b"BBB");
}

#[test]
fn test_cap_marks_filter_finished() {
    let mut buf = Vec::new();
    let mut filter = Filter::new(
        Box::new(PackBitsDecoder::default()),
        Output::new(&mut buf).with_expected_len(2),
    );
    filter.feed(&[0x01, b'x', b'y']);
    assert!(!filter.is_finished());
    filter.feed(&[0x00, b'z']);
    assert!(filter.is_finished());
    filter.feed(&[0x00, b'w']);
    filter.finish();
    assert_eq!(filter.result().bytes_consumed(), Some(3));
    drop(filter);
    assert_eq!(buf, b"xy");
}

// ============================================================================
// Reuse Across Members
// ============================================================================

#[test]
fn test_reinitialize_for_next_member() {
    let mut buf = Vec::new();
    let mut filter = Filter::new(
        Box::new(PackBitsDecoder::new(PackBitsConfig::STANDARD)),
        Output::new(&mut buf).with_expected_len(4),
    );

    filter.feed(&[0xFD, b'a', 0xFD, b'b']);
    filter.finish();
    assert!(filter.is_finished());
    assert_eq!(filter.result().bytes_consumed(), Some(2));

    filter.command(Command::Reinitialize);
    filter.output_mut().set_expected_len(Some(2));
    filter.feed(&[0xFF, b'c']);
    filter.finish();
    assert_eq!(filter.result().bytes_consumed(), Some(2));
    drop(filter);

    assert_eq!(buf, b"aaaacc");
}

#[test]
fn test_listener_crc_matches_output() {
    let mut buf = Vec::new();
    let mut crc = Crc32::new();
    let res = decompress_oneshot(
        Box::new(Rle90Decoder::new()),
        &rle90_encode(b"aaaaabbbbbccccc\x90\x90\x90"),
        Output::new(&mut buf).with_listener(|data: &[u8]| crc.update(data)),
    );
    assert!(!res.has_error());
    assert_eq!(crc.value(), Crc32::compute(&buf));
}

// ============================================================================
// Properties
// ============================================================================

fn runs() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec((prop::sample::select(vec![0u8, 0x41, 0x90, 0xFF]), 1usize..300), 0..20)
        .prop_map(|runs| {
            runs.into_iter()
                .flat_map(|(b, n)| std::iter::repeat_n(b, n))
                .collect()
        })
}

proptest! {
    #[test]
    fn prop_rle90_roundtrip_any_chunking(data in runs(), chunk in 1usize..17) {
        let encoded = rle90_encode(&data);
        let (out, res) = decode_chunked(Box::new(Rle90Decoder::new()), &encoded, chunk);
        prop_assert!(!res.has_error());
        prop_assert_eq!(res.bytes_consumed(), Some(encoded.len() as u64));
        prop_assert_eq!(out, data);
    }

    #[test]
    fn prop_packbits_roundtrip_any_chunking(data in runs(), chunk in 1usize..17) {
        let encoded = packbits_encode(&data);
        let (out, res) = decode_chunked(Box::new(PackBitsDecoder::default()), &encoded, chunk);
        prop_assert!(!res.has_error());
        prop_assert_eq!(res.bytes_consumed(), Some(encoded.len() as u64));
        prop_assert_eq!(out, data);
    }

    #[test]
    fn prop_redecoding_is_idempotent(input in prop::collection::vec(any::<u8>(), 0..512)) {
        let first = decode_chunked(Box::new(PackBitsDecoder::default()), &input, 7);
        let second = decode_chunked(Box::new(PackBitsDecoder::default()), &input, 64);
        prop_assert_eq!(first, second);

        let first = decode_chunked(Box::new(Rle90Decoder::new()), &input, 3);
        let second = decode_chunked(Box::new(Rle90Decoder::new()), &input, 512);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_cap_is_exact(input in prop::collection::vec(any::<u8>(), 0..256), cap in 0u64..64) {
        let capped = decompress_packbits(&input, Some(cap)).unwrap();
        let full = decompress_packbits(&input, None).unwrap();
        let n = full.len().min(cap as usize);
        prop_assert_eq!(&capped[..], &full[..n]);
    }
}
