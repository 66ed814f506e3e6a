//! # retrodec Core
//!
//! Core components shared by the retrodec codecs.
//!
//! - [`filter`]: the streaming ("pushable") codec protocol and its drivers
//! - [`output`]: output sinks with expected-length cap and write listener
//! - [`result`]: the decompression result record
//! - [`bitstream`]: bit reader with LSB- or MSB-first byte packing
//! - [`huffman`]: prefix-code decoder engine
//! - [`ringbuffer`]: LZ77 history window
//! - [`crc`]: CRC-16/ARC and CRC-32 digests
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Method selector, one-call helpers       (retrodec)      │
//! ├─────────────────────────────────────────────────────────┤
//! │ Codecs                                                  │
//! │     RLE90, PackBits, LZSS, Squeeze, StuffIt Huffman,    │
//! │     LZW, CCITT fax                                      │
//! ├─────────────────────────────────────────────────────────┤
//! │ Filter protocol, BitReader, HuffmanTree, Lz77Buffer,    │
//! │ Output, DecompressResult (this crate)                   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use retrodec_core::filter::{decompress_oneshot, StoredCodec};
//! use retrodec_core::output::Output;
//!
//! let mut buf = Vec::new();
//! let res = decompress_oneshot(
//!     Box::new(StoredCodec::new()),
//!     b"hello world",
//!     Output::new(&mut buf).with_expected_len(5),
//! );
//! assert!(!res.has_error());
//! assert_eq!(buf, b"hello");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod crc;
pub mod error;
pub mod filter;
pub mod huffman;
pub mod output;
pub mod result;
pub mod ringbuffer;

// Re-exports for convenience
pub use bitstream::{BitOrder, BitReader};
pub use crc::{Crc16, Crc32};
pub use error::{CodecError, DecodeError, Result};
pub use filter::{
    Codec, Command, DecompressStatus, Decoder, Filter, Layer, StoredCodec, TwoLayer,
    decompress_oneshot, decompress_two_layer, run_decoder,
};
pub use huffman::{HuffmanTree, MAX_CODE_LENGTH};
pub use output::{FnSink, Output, Sink};
pub use result::DecompressResult;
pub use ringbuffer::{Lz77Buffer, WindowSink};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitOrder, BitReader};
    pub use crate::error::{CodecError, DecodeError, Result};
    pub use crate::filter::{
        Codec, Command, DecompressStatus, Decoder, Filter, decompress_oneshot, run_decoder,
    };
    pub use crate::output::{Output, Sink};
    pub use crate::result::DecompressResult;
}
