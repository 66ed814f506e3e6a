//! CCITT fax decoder.
//!
//! Output is one packed row per image row, `row_bytes()` wide, MSB-first
//! with 1 for black.

use crate::config::{FaxCompression, FaxConfig};
use crate::row::RowState;
use crate::tables::{EOL, FaxTrees, Mode, fax_trees};
use log::{debug, warn};
use retrodec_core::bitstream::{BitOrder, BitReader};
use retrodec_core::error::{DecodeError, Result};
use retrodec_core::filter::Decoder;
use retrodec_core::output::Output;

/// Bits searched for the first EOL of a Group 3 stream.
const SYNC_SEARCH_BITS: u64 = 1024;

/// Bits searched for the 1 bit that ends an EOL.
const EOL_SEARCH_BITS: u64 = 64;

/// Read up to and including the next 1 bit.
fn finish_sync(reader: &mut BitReader<'_>, max_bits: u64) -> bool {
    for _ in 0..max_bits {
        match reader.read_bit() {
            Ok(1) => return true,
            Ok(_) => {}
            Err(_) => return false,
        }
    }
    false
}

/// Read up to and including a run of at least 8 zero bits followed by a 1.
fn full_sync(reader: &mut BitReader<'_>, max_bits: u64) -> bool {
    let mut searched = 0u64;
    let mut zeros = 0u32;
    while zeros < 8 {
        if searched >= max_bits {
            return false;
        }
        match reader.read_bit() {
            Ok(0) => zeros += 1,
            Ok(_) => zeros = 0,
            Err(_) => return false,
        }
        searched += 1;
    }
    finish_sync(reader, max_bits - searched)
}

/// CCITT Group 3/4 and Modified Huffman decoder.
#[derive(Debug, Clone)]
pub struct FaxDecoder {
    config: FaxConfig,
}

impl FaxDecoder {
    /// Create a decoder. The configuration is checked when decoding.
    pub fn new(config: FaxConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &FaxConfig {
        &self.config
    }

    fn decode_rows<'a>(
        &self,
        trees: &FaxTrees,
        input: &'a [u8],
        reader: &mut BitReader<'a>,
        rows: &mut RowState,
        out: &mut Output<'_>,
    ) -> Result<()> {
        let is_2d = self.config.is_2d();
        let mut has_eol = self.config.compression == FaxCompression::Group3;
        let mut padded_rows = self.config.compression == FaxCompression::Rle;

        if has_eol && !full_sync(reader, SYNC_SEARCH_BITS) {
            // Some encoders leave out the EOL codes despite the TIFF tag.
            debug!("fax: no sync mark found, assuming no EOL codes");
            has_eol = false;
            padded_rows = false;
            *reader = BitReader::new(input, self.config.bit_order);
        }

        let mut pending_run = 0i64;
        let mut h_codes_remaining = 0u8;

        loop {
            if rows.is_complete() {
                return Ok(());
            }
            if out.is_full() {
                debug!("fax: stopping due to sufficient output");
                return Ok(());
            }
            if reader.is_eof() {
                return Err(DecodeError::UnexpectedEof);
            }

            // A horizontal pair whose first run reaches the edge still
            // carries its second (empty) run.
            if !has_eol && rows.at_row_end() && h_codes_remaining == 0 {
                if padded_rows {
                    reader.align_to_byte();
                }
                rows.end_row(out);
                pending_run = 0;
            }

            if is_2d && h_codes_remaining == 0 {
                let value = trees.modes.read_next_value(reader)?;
                match Mode::from_value(value) {
                    Some(Mode::Vertical(delta)) => {
                        let b1 = rows.b1() as i64;
                        rows.record_run_using_a0(b1 - rows.a0 + i64::from(delta));
                        rows.a0_color = rows.a0_color.flip();
                    }
                    Some(Mode::Pass) => {
                        let (_, b2) = rows.b1_b2();
                        rows.record_run_using_a0(b2 as i64 - rows.a0);
                    }
                    Some(Mode::Horizontal) => h_codes_remaining = 2,
                    Some(Mode::Eofb) => {
                        debug!("fax: EOFB at row {}", rows.ypos);
                        return Ok(());
                    }
                    Some(Mode::Extension) | None => {
                        debug!("fax: stopping at mode code {value}");
                        return Ok(());
                    }
                }
            } else {
                let value = trees.runs[rows.a0_color.index()].read_next_value(reader)?;
                if value == EOL {
                    if !has_eol {
                        return Err(DecodeError::HuffmanDecode);
                    }
                    if !finish_sync(reader, EOL_SEARCH_BITS) {
                        return Err(DecodeError::invalid_data("Failed to find EOL mark"));
                    }
                    rows.end_row(out);
                    pending_run = 0;
                } else if value < 64 {
                    pending_run += i64::from(value);
                    rows.record_run(rows.a0_color, pending_run);
                    pending_run = 0;
                    rows.a0_color = rows.a0_color.flip();
                    h_codes_remaining = h_codes_remaining.saturating_sub(1);
                } else {
                    // make-up code
                    pending_run += i64::from(value);
                }
            }
        }
    }
}

impl Decoder for FaxDecoder {
    fn name(&self) -> &'static str {
        "fax_decode"
    }

    fn decode(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<Option<u64>> {
        let config = self.config;
        if config.compression == FaxCompression::Group3 && config.is_2d() {
            return Err(DecodeError::unsupported("This type of fax compression"));
        }
        config.validate()?;
        let trees = fax_trees()?;

        debug!(
            "fax: {}x{}, TIFF compression {}, {:?} first",
            config.width,
            config.height,
            config.compression.tiff_value(),
            config.bit_order
        );

        let mut reader = BitReader::new(input, config.bit_order);
        let mut rows = RowState::new(config.width, config.height, config.is_2d());
        let outcome = self.decode_rows(trees, input, &mut reader, &mut rows, out);

        let completed_rows = rows.ypos;
        // the last row is written even if it is incomplete
        rows.end_row(out);

        match outcome {
            Ok(()) => {}
            Err(err) if completed_rows > 0 => {
                warn!(
                    "[{}] Failed to decode entire strip: {err} ({completed_rows} of {} rows)",
                    self.name(),
                    config.height
                );
            }
            Err(err) => return Err(err),
        }
        Ok(Some(reader.bytes_consumed() as u64))
    }
}
