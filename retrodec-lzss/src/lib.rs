//! # retrodec-lzss
//!
//! LZSS decoders built on the shared [`Lz77Buffer`](retrodec_core::Lz77Buffer):
//!
//! - [`LzssDecoder`]: the classic 4 KB-window LZSS of Okumura's LZSS.C and
//!   its relatives, configurable through [`LzssConfig`]:
//!   - [`LzssConfig::OKUMURA`]: window of spaces, cursor at `4096 - 18`
//!   - [`LzssConfig::SZDD`]: cursor at `4096 - 16` (MS `COMPRESS.EXE`)
//!   - [`LzssConfig::LZ5`]: LArc lz5 preloaded dictionary
//! - [`HlpLz77Decoder`]: the Windows Help file variant.
//!
//! Both are whole-input [`Decoder`](retrodec_core::Decoder)s. They stop at
//! the end of input or at the output's expected length, and report the exact
//! number of input bytes consumed.
//!
//! ## Example
//!
//! ```rust
//! use retrodec_lzss::{LzssConfig, decompress_lzss};
//!
//! // flags: literal 'a', literal 'b', then copy 4 bytes from window offset
//! // 4078 (where the first literal landed)
//! let data = [0x03, b'a', b'b', 0xEE, 0xF1];
//! let out = decompress_lzss(&data, LzssConfig::OKUMURA, None).unwrap();
//! assert_eq!(out, b"ababab");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod config;
mod decoder;

pub use config::{LzssConfig, WINDOW_SIZE};
pub use decoder::{HlpLz77Decoder, LzssDecoder};

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

/// Decode classic LZSS data into a new vector.
pub fn decompress_lzss(
    input: &[u8],
    config: LzssConfig,
    expected_len: Option<u64>,
) -> Result<Vec<u8>, CodecError> {
    decode_to_vec(&mut LzssDecoder::new(config), input, expected_len)
}

/// Decode Windows Help LZ77 data into a new vector.
pub fn decompress_hlp_lz77(input: &[u8], expected_len: Option<u64>) -> Result<Vec<u8>, CodecError> {
    decode_to_vec(&mut HlpLz77Decoder::new(), input, expected_len)
}
