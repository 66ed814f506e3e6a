//! # retrodec-rle
//!
//! Run-length decoders, both usable as pushable [`Codec`]s:
//!
//! - [`Rle90Decoder`]: the 0x90-escape scheme of BinHex, ARC and StuffIt.
//! - [`PackBitsDecoder`]: Apple PackBits, with 1- or 2-byte units.
//!
//! Also here is [`ExepackRelocDecoder`], a whole-input decoder that expands
//! the run-grouped relocation table of EXEPACK-compressed DOS programs.
//!
//! The run-length codecs stop cleanly when the output reaches its expected
//! length, report the exact number of input bytes consumed, and can be reset
//! between members with [`Command`](retrodec_core::filter::Command).
//!
//! ## Example
//!
//! ```rust
//! use retrodec_rle::{decompress_packbits, decompress_rle90};
//!
//! assert_eq!(decompress_rle90(&[0x41, 0x90, 0x04], None).unwrap(), b"AAAA");
//! assert_eq!(decompress_packbits(&[0xFF, 0x41], None).unwrap(), b"AA");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod exepack;
mod packbits;
mod rle90;

pub use exepack::{EXEPACK_SEGMENTS, ExepackRelocDecoder, MAX_RELOCS};
pub use packbits::{PackBitsConfig, PackBitsDecoder, UnitSize};
pub use rle90::{RLE90_ESCAPE, Rle90Decoder};

use retrodec_core::error::CodecError;
use retrodec_core::filter::{Codec, decompress_oneshot, run_decoder};
use retrodec_core::output::Output;

fn decompress_to_vec(
    codec: Box<dyn Codec>,
    input: &[u8],
    expected_len: Option<u64>,
) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    let mut out = Output::new(&mut buf);
    out.set_expected_len(expected_len);
    decompress_oneshot(codec, input, out).into_result()?;
    Ok(buf)
}

/// Decode RLE90 data into a new vector, stopping at `expected_len` if given.
pub fn decompress_rle90(input: &[u8], expected_len: Option<u64>) -> Result<Vec<u8>, CodecError> {
    decompress_to_vec(Box::new(Rle90Decoder::new()), input, expected_len)
}

/// Decode classic PackBits data into a new vector, stopping at
/// `expected_len` if given.
pub fn decompress_packbits(
    input: &[u8],
    expected_len: Option<u64>,
) -> Result<Vec<u8>, CodecError> {
    decompress_to_vec(
        Box::new(PackBitsDecoder::new(PackBitsConfig::STANDARD)),
        input,
        expected_len,
    )
}

/// Expand a packed EXEPACK relocation table into MZ `offset, segment`
/// pairs.
pub fn decompress_exepack_relocs(
    input: &[u8],
    expected_len: Option<u64>,
) -> Result<Vec<u8>, CodecError> {
    let mut decoder = ExepackRelocDecoder::new();
    let mut buf = Vec::new();
    {
        let mut out = Output::new(&mut buf);
        out.set_expected_len(expected_len);
        run_decoder(&mut decoder, input, &mut out).into_result()?;
    }
    Ok(buf)
}
