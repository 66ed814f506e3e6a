//! # retrodec-fax
//!
//! CCITT fax decoding for the three TIFF fax compressions:
//!
//! | [`FaxCompression`] | TIFF | Coding | EOL codes |
//! |--------------------|------|--------|-----------|
//! | `Rle`    | 2 | 1-D Modified Huffman, rows byte-padded | no |
//! | `Group3` | 3 | 1-D T.4 | yes |
//! | `Group4` | 4 | 2-D T.6 | no |
//!
//! Two-dimensional Group 3 (`T4Options` bit 0) is not supported.
//!
//! The decoder writes packed bilevel rows (MSB-first, 1 = black). A damaged
//! strip that yields at least one row is salvaged with a warning.
//!
//! ## Example
//!
//! ```rust
//! use retrodec_fax::{FaxCompression, FaxConfig, decompress_fax};
//!
//! // one 8-pixel row: white 2 (0111), black 4 (011), white 2 (0111)
//! let data = [0b0111_0110, 0b1110_0000];
//! let config = FaxConfig::new(8, 1, FaxCompression::Rle);
//! assert_eq!(decompress_fax(&data, config, None).unwrap(), [0b0011_1100]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod config;
mod decoder;
mod row;
mod tables;

pub use config::{FaxCompression, FaxConfig, MAX_FAX_WIDTH};
pub use decoder::FaxDecoder;
pub use row::{Color, find_b1, find_b2};
pub use tables::{BLACK_CODES, EOL, FaxTrees, Mode, NUM_RUN_CODES, WHITE_CODES, fax_trees, run_length};

use retrodec_core::error::CodecError;
use retrodec_core::filter::run_decoder;
use retrodec_core::output::Output;

/// Decode a fax strip into packed rows.
pub fn decompress_fax(
    input: &[u8],
    config: FaxConfig,
    expected_len: Option<u64>,
) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    {
        let mut out = Output::new(&mut buf);
        out.set_expected_len(expected_len);
        run_decoder(&mut FaxDecoder::new(config), input, &mut out).into_result()?;
    }
    Ok(buf)
}
