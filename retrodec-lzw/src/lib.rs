//! # retrodec-lzw
//!
//! The LZW flavor of Unix `compress`, which StuffIt method 2 and several
//! archivers share:
//!
//! - LSB-first codes, 9 bits wide to begin with, growing up to `max_bits`
//!   (at most 16)
//! - optional block mode, where code 256 clears the dictionary
//! - codes written in groups of eight; a width change skips the rest of
//!   the group
//!
//! [`LzwDecoder`] is a whole-input [`Decoder`](retrodec_core::Decoder). The
//! `.Z` file header is handled by [`decompress_z`].
//!
//! [`DskLzwDecoder`] covers the unrelated LZW of IBM DSK diskette images:
//! fixed 12-bit codes and a table that recycles its least recently built
//! entries instead of clearing.
//!
//! ## Example
//!
//! ```rust
//! use retrodec_lzw::{LzwConfig, decompress_lzw};
//!
//! // 9-bit codes 'a', 'b', 257 ("ab"), LSB-first
//! let data = [0x61, 0xC4, 0x04, 0x04];
//! let out = decompress_lzw(&data, LzwConfig::COMPRESS, None).unwrap();
//! assert_eq!(out, b"abab");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod config;
mod decoder;
mod dictionary;
mod dsk;

pub use config::{CLEAR_CODE, INIT_BITS, LzwConfig, MAX_BITS, Z_MAGIC};
pub use decoder::LzwDecoder;
pub use dictionary::LzwDictionary;
pub use dsk::{DSK_FIRST_DYNAMIC, DSK_MAX_TABLE, DSK_STOP_CODE, DskLzwConfig, DskLzwDecoder};

use retrodec_core::error::{CodecError, DecodeError};
use retrodec_core::filter::run_decoder;
use retrodec_core::output::Output;

/// Decode a raw LZW stream into a new vector.
pub fn decompress_lzw(
    input: &[u8],
    config: LzwConfig,
    expected_len: Option<u64>,
) -> Result<Vec<u8>, CodecError> {
    let mut decoder = LzwDecoder::new(config).map_err(|e| CodecError::new("lzw", e))?;
    let mut buf = Vec::new();
    {
        let mut out = Output::new(&mut buf);
        out.set_expected_len(expected_len);
        run_decoder(&mut decoder, input, &mut out).into_result()?;
    }
    Ok(buf)
}

/// Decode a complete `.Z` file: magic, flags byte, then the LZW stream.
pub fn decompress_z(input: &[u8], expected_len: Option<u64>) -> Result<Vec<u8>, CodecError> {
    let fail = |e| CodecError::new("lzw", e);
    if input.len() < 3 || input[..2] != Z_MAGIC {
        return Err(fail(DecodeError::invalid_data("Not a compress (.Z) file")));
    }
    let config = LzwConfig::from_header_flags(input[2]).map_err(fail)?;
    decompress_lzw(&input[3..], config, expected_len)
}

/// Decode a DSK LZW stream into a new vector.
pub fn decompress_dsk_lzw(
    input: &[u8],
    config: DskLzwConfig,
    expected_len: Option<u64>,
) -> Result<Vec<u8>, CodecError> {
    let mut decoder = DskLzwDecoder::new(config).map_err(|e| CodecError::new("dskdcmprs", e))?;
    let mut buf = Vec::new();
    {
        let mut out = Output::new(&mut buf);
        out.set_expected_len(expected_len);
        run_decoder(&mut decoder, input, &mut out).into_result()?;
    }
    Ok(buf)
}
