//! # retrodec
//!
//! Pure Rust decoders for the compression methods of legacy archive and
//! image formats. Format parsers pick a [`Method`], hand over the compressed
//! span and get the decoded bytes back.
//!
//! ## Supported methods
//!
//! | Method | Used by | Pushable |
//! |--------|---------|----------|
//! | Stored | everything | yes |
//! | RLE90 | BinHex, ARC, StuffIt 1 | yes |
//! | PackBits | MacPaint, TIFF, StuffIt 6 relay | yes |
//! | LZSS | SZDD, LArc lz5, ARJ-era tools | no |
//! | HLP LZ77 | Windows Help | no |
//! | Squeeze | ARC 4, SQ | no |
//! | StuffIt Huffman | StuffIt 3 | no |
//! | Fixed Huffman | StuffIt 6 | no |
//! | LZW | compress (.Z), StuffIt 2 | no |
//! | DSK LZW | IBM DSK diskette images | no |
//! | EXEPACK relocations | EXEPACK-packed DOS programs | no |
//! | CCITT fax | TIFF 2/3/4 | no |
//!
//! Pushable methods accept input in arbitrary chunks through
//! [`Filter`](retrodec_core::Filter) and can be the second layer of a
//! two-layer chain. The others decode one complete span.
//!
//! ## Example
//!
//! ```rust
//! use retrodec::{Method, decompress};
//!
//! let out = decompress(Method::Rle90, &[0x41, 0x90, 0x04, 0x42], None).unwrap();
//! assert_eq!(out, b"AAAAB");
//! ```
//!
//! ## Two layers
//!
//! ARC "squeezed" members are RLE90 data that was then Huffman coded. They
//! decode with Squeeze first and RLE90 second:
//!
//! ```rust
//! use retrodec::{Method, decompress_layered};
//!
//! // three nodes: 'A' 00, 0x90 01, 0x05 10, stop 11
//! let data = [
//!     0x03, 0x00, 0x01, 0x00, 0x02, 0x00, 0xBE, 0xFF, 0x6F, 0xFF, 0xFA, 0xFF, 0xFF, 0xFE,
//!     0xD8,
//! ];
//! let out = decompress_layered(Method::Squeeze, Method::Rle90, &data, None, None).unwrap();
//! assert_eq!(out, b"AAAAA");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod method;

pub use method::Method;

pub use retrodec_core::{CodecError, DecodeError, DecompressResult, Output, Sink};
pub use retrodec_fax as fax;
pub use retrodec_huff as huff;
pub use retrodec_lzss as lzss;
pub use retrodec_lzw as lzw;
pub use retrodec_rle as rle;

use log::debug;
use retrodec_core::filter::{TwoLayer, decompress_oneshot, decompress_two_layer, run_decoder};

/// Decode `input` with `method` into `output`.
///
/// Errors and the number of input bytes consumed are reported in the
/// returned record. Whatever was decoded before an error stays in the sink.
pub fn decompress_into(method: Method, input: &[u8], mut output: Output<'_>) -> DecompressResult {
    debug!("{method}: {} bytes of input", input.len());
    if let Some(codec) = method.pushable() {
        return decompress_oneshot(codec, input, output);
    }
    match method.direct() {
        Ok(Some(mut decoder)) => run_decoder(decoder.as_mut(), input, &mut output),
        Ok(None) => DecompressResult::new(),
        Err(err) => {
            let mut result = DecompressResult::new();
            result.set_codec_error(err);
            result
        }
    }
}

/// Decode `input` with `method` into a new vector, stopping at
/// `expected_len` if given.
pub fn decompress(
    method: Method,
    input: &[u8],
    expected_len: Option<u64>,
) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    {
        let mut out = Output::new(&mut buf);
        out.set_expected_len(expected_len);
        decompress_into(method, input, out).into_result()?;
    }
    Ok(buf)
}

/// Decode data that was compressed with `second` and then with `first`.
///
/// `second` must be pushable. An error in the first layer is reported in
/// preference to one in the second.
pub fn decompress_layered_into(
    first: Method,
    second: Method,
    input: &[u8],
    intermediate_len: Option<u64>,
    output: Output<'_>,
) -> DecompressResult {
    let mut result = DecompressResult::new();
    let Some(second_codec) = second.pushable() else {
        result.set_error(
            second.name(),
            DecodeError::invalid_parameter(format!("{second} cannot be a second layer")),
        );
        return result;
    };
    let first_layer = match first.layer() {
        Ok(layer) => layer,
        Err(err) => {
            result.set_codec_error(err);
            return result;
        }
    };
    debug!("{first} then {second}");
    decompress_two_layer(
        TwoLayer {
            first: first_layer,
            second: second_codec,
            intermediate_len,
        },
        input,
        output,
    )
}

/// Two-layer version of [`decompress`].
pub fn decompress_layered(
    first: Method,
    second: Method,
    input: &[u8],
    intermediate_len: Option<u64>,
    expected_len: Option<u64>,
) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    {
        let mut out = Output::new(&mut buf);
        out.set_expected_len(expected_len);
        decompress_layered_into(first, second, input, intermediate_len, out).into_result()?;
    }
    Ok(buf)
}

/// Decode an ARC/SQ "squeezed" member: Squeeze, then RLE90.
pub fn decompress_squeezed(input: &[u8], expected_len: Option<u64>) -> Result<Vec<u8>, CodecError> {
    decompress_layered(Method::Squeeze, Method::Rle90, input, None, expected_len)
}
