//! RLE90 decoder.
//!
//! The run-length scheme used by BinHex, ARC ("packed"), StuffIt method 1
//! and others. Byte 0x90 is an escape: the byte after it is a count.
//!
//! - `x 90 n` (n > 0): `x` followed by `n - 1` more copies of `x`.
//! - `90 00`: a literal 0x90.
//!
//! The byte to repeat is whatever was emitted last, including a literal
//! 0x90 produced by `90 00`.

use log::trace;
use retrodec_core::error::Result;
use retrodec_core::filter::{Codec, Command, DecompressStatus};
use retrodec_core::output::Output;

/// The escape byte.
pub const RLE90_ESCAPE: u8 = 0x90;

/// Streaming RLE90 decoder.
#[derive(Debug, Clone, Default)]
pub struct Rle90Decoder {
    total_nbytes_processed: u64,
    last_output_byte: u8,
    countcode_pending: bool,
}

impl Rle90Decoder {
    /// Create a decoder in its initial state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Input bytes consumed so far.
    pub fn bytes_processed(&self) -> u64 {
        self.total_nbytes_processed
    }
}

impl Codec for Rle90Decoder {
    fn name(&self) -> &'static str {
        "rle90"
    }

    fn add_buf(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<DecompressStatus> {
        for &b in input {
            if out.is_full() {
                return Ok(DecompressStatus::Done);
            }
            self.total_nbytes_processed += 1;

            if self.countcode_pending {
                self.countcode_pending = false;
                if b == 0 {
                    out.write_byte(RLE90_ESCAPE);
                    self.last_output_byte = RLE90_ESCAPE;
                } else {
                    // The byte itself was already emitted.
                    out.write_run(self.last_output_byte, u64::from(b - 1));
                }
            } else if b == RLE90_ESCAPE {
                self.countcode_pending = true;
            } else {
                out.write_byte(b);
                self.last_output_byte = b;
            }
        }
        Ok(DecompressStatus::NeedsInput)
    }

    fn finish(&mut self, _out: &mut Output<'_>) -> Result<Option<u64>> {
        Ok(Some(self.total_nbytes_processed))
    }

    fn command(&mut self, cmd: Command) {
        trace!("rle90: {cmd:?}");
        self.countcode_pending = false;
        self.last_output_byte = 0;
        if cmd == Command::Reinitialize {
            self.total_nbytes_processed = 0;
        }
    }
}
