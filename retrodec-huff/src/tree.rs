//! StuffIt method 3 ("Huffman") decoder.
//!
//! The stream is MSB-first. It opens with a recursive tree description
//! (`0` = two subtrees, `1` = leaf followed by an 8-bit byte value), followed
//! by codes until the input or the expected output length runs out. There
//! is no stop code.

use log::debug;
use retrodec_core::bitstream::{BitOrder, BitReader};
use retrodec_core::error::{DecodeError, Result};
use retrodec_core::filter::Decoder;
use retrodec_core::huffman::HuffmanTree;
use retrodec_core::output::Output;

/// StuffIt Huffman decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct StuffItHuffmanDecoder;

impl StuffItHuffmanDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for StuffItHuffmanDecoder {
    fn name(&self) -> &'static str {
        "huffman"
    }

    fn decode(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<Option<u64>> {
        let mut reader = BitReader::new(input, BitOrder::Msb);

        // Errors in this format are only ever reported generically.
        let tree =
            HuffmanTree::read_tree_description(&mut reader, 8).map_err(|_| DecodeError::Generic)?;
        debug!(
            "stuffit huffman: {} codes, data at bit {}",
            tree.len(),
            reader.bits_read()
        );

        if tree.max_code_length() < 1 {
            return Ok(Some(reader.bytes_consumed() as u64));
        }

        while !out.is_full() && !reader.is_eof() {
            match tree.read_next_value(&mut reader) {
                Ok(value) => {
                    out.write_byte(value as u8);
                }
                Err(err) if err.is_eof() => break,
                Err(_) => return Err(DecodeError::Generic),
            }
        }

        Ok(Some(reader.bytes_consumed() as u64))
    }
}
