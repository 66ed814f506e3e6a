//! # retrodec-huff
//!
//! Codecs that are (mostly) plain Huffman coding, all built on
//! [`HuffmanTree`](retrodec_core::HuffmanTree):
//!
//! | Decoder | Format | Codebook |
//! |---------|--------|----------|
//! | [`SqueezeDecoder`] | SQ, ARC method 4 (before RLE90) | node table |
//! | [`StuffItHuffmanDecoder`] | StuffIt method 3 | tree description in the stream |
//! | [`FixedHuffmanDecoder`] | StuffIt method 6 | fixed, plus per-block translation and PackBits |
//!
//! All three are whole-input [`Decoder`](retrodec_core::Decoder)s.
//!
//! ## Example
//!
//! ```rust
//! use retrodec_huff::decompress_squeeze;
//!
//! // one node: 0 -> 'A', 1 -> stop
//! let data = [0x01, 0x00, 0xBE, 0xFF, 0xFF, 0xFE, 0b0000_0100];
//! assert_eq!(decompress_squeeze(&data, None).unwrap(), b"AA");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod fixed;
mod squeeze;
mod tree;

pub use fixed::{FIXED_NUM_CODES, FixedHuffmanDecoder, fixed_code_lengths, fixed_tree};
pub use squeeze::SqueezeDecoder;
pub use tree::StuffItHuffmanDecoder;

use retrodec_core::error::CodecError;
use retrodec_core::filter::{Decoder, run_decoder};
use retrodec_core::output::Output;

fn decode_to_vec(
    decoder: &mut dyn Decoder,
    input: &[u8],
    expected_len: Option<u64>,
) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    {
        let mut out = Output::new(&mut buf);
        out.set_expected_len(expected_len);
        run_decoder(decoder, input, &mut out).into_result()?;
    }
    Ok(buf)
}

/// Decode Squeeze data (without the RLE90 layer) into a new vector.
pub fn decompress_squeeze(input: &[u8], expected_len: Option<u64>) -> Result<Vec<u8>, CodecError> {
    decode_to_vec(&mut SqueezeDecoder::new(), input, expected_len)
}

/// Decode StuffIt method 3 data into a new vector.
pub fn decompress_stuffit_huffman(
    input: &[u8],
    expected_len: Option<u64>,
) -> Result<Vec<u8>, CodecError> {
    decode_to_vec(&mut StuffItHuffmanDecoder::new(), input, expected_len)
}

/// Decode StuffIt method 6 data into a new vector.
pub fn decompress_fixed_huffman(
    input: &[u8],
    expected_len: Option<u64>,
) -> Result<Vec<u8>, CodecError> {
    decode_to_vec(&mut FixedHuffmanDecoder::new(), input, expected_len)
}
