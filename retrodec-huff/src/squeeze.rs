//! Squeeze ("SQ", ARC method 4) decoder.
//!
//! Layout:
//!
//! ```text
//! u16le   node count (at most 256)
//! node count × (i16le, i16le)   child pairs
//! Huffman codes, LSB-first, up to the stop code (256) or end of input
//! ```
//!
//! The RLE90 layer that usually follows is not part of this decoder; chain
//! it with [`decompress_two_layer`](retrodec_core::decompress_two_layer).

use log::debug;
use retrodec_core::bitstream::{BitOrder, BitReader};
use retrodec_core::error::{DecodeError, Result};
use retrodec_core::filter::Decoder;
use retrodec_core::huffman::{HuffmanTree, SQUEEZE_MAX_NODES};
use retrodec_core::output::Output;

/// Value of the stop code.
const STOP_CODE: i32 = 256;

/// Squeeze decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqueezeDecoder;

impl SqueezeDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self
    }
}

fn read_node_table(input: &[u8]) -> Result<(Vec<[i16; 2]>, usize)> {
    let Some(header) = input.get(..2) else {
        return Err(DecodeError::invalid_data("Squeeze decompression failed"));
    };
    let nodecount = usize::from(u16::from_le_bytes([header[0], header[1]]));
    debug!("squeeze: node count {nodecount}");
    if nodecount > SQUEEZE_MAX_NODES {
        return Err(DecodeError::invalid_data("Invalid node count"));
    }

    let table_end = 2 + 4 * nodecount;
    let Some(raw) = input.get(2..table_end) else {
        return Err(DecodeError::invalid_data("Squeeze decompression failed"));
    };
    let table = raw
        .chunks_exact(4)
        .map(|n| {
            [
                i16::from_le_bytes([n[0], n[1]]),
                i16::from_le_bytes([n[2], n[3]]),
            ]
        })
        .collect();
    Ok((table, table_end))
}

impl Decoder for SqueezeDecoder {
    fn name(&self) -> &'static str {
        "unsqueeze"
    }

    fn decode(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<Option<u64>> {
        let (table, table_end) = read_node_table(input)?;
        let tree = HuffmanTree::from_node_table(&table)?;

        let mut reader = BitReader::new(&input[table_end..], BitOrder::Lsb);

        // An empty tree means an empty file.
        if tree.max_code_length() >= 1 {
            loop {
                match tree.read_next_value(&mut reader) {
                    Ok(value @ 0..=255) => {
                        out.write_byte(value as u8);
                        if out.is_full() {
                            break;
                        }
                    }
                    Ok(STOP_CODE) => break,
                    Ok(_) => return Err(DecodeError::HuffmanDecode),
                    Err(err) if err.is_eof() => break,
                    Err(_) => return Err(DecodeError::HuffmanDecode),
                }
            }
        }

        let consumed = (table_end + reader.bytes_consumed()).min(input.len());
        Ok(Some(consumed as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_table_parsing() {
        let input = [0x01, 0x00, 0xFE, 0xFF, 0xFF, 0xFE];
        let (table, end) = read_node_table(&input).unwrap();
        assert_eq!(table, vec![[-2, -257]]);
        assert_eq!(end, 6);
    }

    #[test]
    fn test_rejects_big_node_count() {
        let input = [0x01, 0x01];
        assert_eq!(
            read_node_table(&input).unwrap_err().to_string(),
            "Invalid node count"
        );
    }

    #[test]
    fn test_truncated_table() {
        assert!(read_node_table(&[0x02, 0x00, 0, 0, 0, 0]).is_err());
        assert!(read_node_table(&[0x02]).is_err());
    }
}
