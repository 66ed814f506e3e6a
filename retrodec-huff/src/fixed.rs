//! StuffIt method 6 ("fixed Huffman") decoder.
//!
//! The data is a sequence of blocks, each introduced by an i32be size code
//! that counts the size field itself:
//!
//! ```text
//! size >= 0:  u32be  intermediate length
//!             i16be  number of translation entries (0..=256)
//!             n × u8 translation table
//!             Huffman codes (MSB-first) up to the block end
//! size <  0:  (-size - 4) bytes of plain PackBits data
//! ```
//!
//! Every Huffman block uses the same fixed codebook of 257 codes. A decoded
//! value indexes the block's translation table (which persists across
//! blocks), and the translated byte goes through PackBits. Value 256 ends
//! the block early. Each block gets a fresh PackBits decoder.

use log::debug;
use retrodec_core::bitstream::{BitOrder, BitReader};
use retrodec_core::error::{DecodeError, Result};
use retrodec_core::filter::{Decoder, Filter};
use retrodec_core::huffman::HuffmanTree;
use retrodec_core::output::Output;
use retrodec_rle::PackBitsDecoder;

/// Number of codes in the fixed codebook.
pub const FIXED_NUM_CODES: usize = 257;

/// Code lengths in value order, run-length encoded as (count, length).
const CODE_LENGTH_RUNS: [(usize, u8); 13] = [
    (1, 3),
    (1, 4),
    (4, 5),
    (12, 6),
    (32, 7),
    (16, 8),
    (49, 9),
    (2, 10),
    (2, 9),
    (40, 10),
    (95, 11),
    (2, 13),
    (1, 12),
];

/// Expand [`CODE_LENGTH_RUNS`] into one length per value.
pub fn fixed_code_lengths() -> Vec<u8> {
    CODE_LENGTH_RUNS
        .iter()
        .flat_map(|&(count, len)| std::iter::repeat_n(len, count))
        .take(FIXED_NUM_CODES)
        .collect()
}

/// Build the fixed codebook.
pub fn fixed_tree() -> Result<HuffmanTree> {
    HuffmanTree::sequential(&fixed_code_lengths())
}

/// StuffIt fixed Huffman decoder.
#[derive(Debug, Clone)]
pub struct FixedHuffmanDecoder {
    translation: [u8; 256],
}

impl Default for FixedHuffmanDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedHuffmanDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self {
            translation: [0; 256],
        }
    }

    /// Decode the Huffman payload of one block into the PackBits filter.
    fn decode_huffman_block(
        &self,
        tree: &HuffmanTree,
        data: &[u8],
        intermediate_len: u64,
        packbits: &mut Filter<'_>,
    ) -> Result<()> {
        let mut reader = BitReader::new(data, BitOrder::Msb);
        let mut ndecoded = 0u64;

        while ndecoded < intermediate_len {
            let value = match tree.read_next_value(&mut reader) {
                Ok(value) => value,
                Err(_) if reader.is_eof() => break,
                Err(_) => return Err(DecodeError::invalid_data("Error reading Huffman codes")),
            };
            let Ok(index) = u8::try_from(value) else {
                // stop code
                break;
            };
            packbits.feed(&[self.translation[usize::from(index)]]);
            ndecoded += 1;
        }
        Ok(())
    }
}

fn read_be<const N: usize>(input: &[u8], pos: usize) -> Result<[u8; N]> {
    input
        .get(pos..pos + N)
        .and_then(|s| s.try_into().ok())
        .ok_or(DecodeError::Generic)
}

impl Decoder for FixedHuffmanDecoder {
    fn name(&self) -> &'static str {
        "fixedhuffman"
    }

    fn decode(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<Option<u64>> {
        let tree = fixed_tree()?;
        let end = input.len();
        let mut pos = 0usize;

        loop {
            if out.is_full() {
                debug!("fixedhuffman: stopping due to sufficient output");
                break;
            }
            if pos + 4 > end {
                break;
            }

            let block_start = pos;
            let blocksize_raw = i32::from_be_bytes(read_be::<4>(input, pos)?);
            pos += 4;

            let remaining = out.remaining();
            let mut pb_out = Output::new(&mut *out);
            pb_out.set_expected_len(remaining);
            let mut packbits = Filter::new(Box::new(PackBitsDecoder::default()), pb_out);

            let block_end = if blocksize_raw >= 0 {
                let blocksize = blocksize_raw as usize;
                if blocksize < 10 {
                    break;
                }
                let block_end = block_start + blocksize;
                if block_end > end {
                    return Err(DecodeError::Generic);
                }

                let intermediate_len = u32::from_be_bytes(read_be::<4>(input, pos)?);
                pos += 4;
                let ndefs = i16::from_be_bytes(read_be::<2>(input, pos)?);
                pos += 2;
                debug!(
                    "fixedhuffman: block at {block_start}, size {blocksize}, \
                     intermediate len {intermediate_len}, {ndefs} defs"
                );

                let ndefs = match usize::try_from(ndefs) {
                    Ok(n) if n <= 256 => n,
                    _ => {
                        return Err(DecodeError::invalid_data(format!(
                            "Can't handle num_defs={ndefs}"
                        )));
                    }
                };
                let Some(defs) = input.get(pos..pos + ndefs) else {
                    return Err(DecodeError::Generic);
                };
                self.translation[..ndefs].copy_from_slice(defs);
                pos += ndefs;

                let payload = input.get(pos..block_end).unwrap_or(&[]);
                self.decode_huffman_block(
                    &tree,
                    payload,
                    u64::from(intermediate_len),
                    &mut packbits,
                )?;
                block_end
            } else {
                let blocksize = blocksize_raw.unsigned_abs() as usize;
                if blocksize < 4 {
                    break;
                }
                let block_end = block_start + blocksize;
                if block_end > end {
                    return Err(DecodeError::Generic);
                }
                debug!("fixedhuffman: PackBits-only block at {block_start}, size {blocksize}");
                packbits.feed(&input[pos..block_end]);
                block_end
            };

            packbits.finish();
            let nwritten = packbits.output().len();
            if let Some(err) = packbits.result().error() {
                return Err(err.source.clone());
            }
            debug!("fixedhuffman: block decompressed to {nwritten} bytes");

            pos = block_end;
        }

        Ok(Some(pos as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_codebook() {
        let lengths = fixed_code_lengths();
        assert_eq!(lengths.len(), FIXED_NUM_CODES);
        assert_eq!(lengths[0], 3);
        assert_eq!(lengths[256], 12);

        let tree = fixed_tree().unwrap();
        assert_eq!(tree.len(), FIXED_NUM_CODES);
        assert_eq!(tree.max_code_length(), 13);
    }

    #[test]
    fn test_first_codes() {
        let tree = fixed_tree().unwrap();
        // value 0 = 000, value 1 = 0010, value 256 = 1111 1111 1111
        let data = [0b0000_0101, 0b1111_1111, 0b1111_1110];
        let mut reader = BitReader::new(&data, BitOrder::Msb);
        assert_eq!(tree.read_next_value(&mut reader), Ok(0));
        assert_eq!(tree.read_next_value(&mut reader), Ok(1));
        assert_eq!(tree.read_next_value(&mut reader), Ok(256));
    }
}
