//! Code tables of ITU-T T.4/T.6 and the decoding trees built from them.
//!
//! Codes are matched one bit at a time, most significant bit of the code
//! first, whatever the bit order of the bytes holding them.

use retrodec_core::error::Result;
use retrodec_core::huffman::HuffmanTree;
use std::sync::OnceLock;

/// Tree value of an EOL (or fill) code: eight zero bits.
pub const EOL: i32 = -1;

/// Number of run-length codes per color.
pub const NUM_RUN_CODES: usize = 104;

/// White run-length codes as (code, length). Entries 0..64 are terminating
/// codes for runs 0..=63; entry `i >= 64` is the make-up code for
/// `(i - 63) * 64`.
pub const WHITE_CODES: [(u16, u8); NUM_RUN_CODES] = [
    (0x35, 8), (0x07, 6), (0x07, 4), (0x08, 4), (0x0b, 4), (0x0c, 4),
    (0x0e, 4), (0x0f, 4), (0x13, 5), (0x14, 5), (0x07, 5), (0x08, 5),
    (0x08, 6), (0x03, 6), (0x34, 6), (0x35, 6), (0x2a, 6), (0x2b, 6),
    (0x27, 7), (0x0c, 7), (0x08, 7), (0x17, 7), (0x03, 7), (0x04, 7),
    (0x28, 7), (0x2b, 7), (0x13, 7), (0x24, 7), (0x18, 7), (0x02, 8),
    (0x03, 8), (0x1a, 8), (0x1b, 8), (0x12, 8), (0x13, 8), (0x14, 8),
    (0x15, 8), (0x16, 8), (0x17, 8), (0x28, 8), (0x29, 8), (0x2a, 8),
    (0x2b, 8), (0x2c, 8), (0x2d, 8), (0x04, 8), (0x05, 8), (0x0a, 8),
    (0x0b, 8), (0x52, 8), (0x53, 8), (0x54, 8), (0x55, 8), (0x24, 8),
    (0x25, 8), (0x58, 8), (0x59, 8), (0x5a, 8), (0x5b, 8), (0x4a, 8),
    (0x4b, 8), (0x32, 8), (0x33, 8), (0x34, 8), (0x1b, 5), (0x12, 5),
    (0x17, 6), (0x37, 7), (0x36, 8), (0x37, 8), (0x64, 8), (0x65, 8),
    (0x68, 8), (0x67, 8), (0xcc, 9), (0xcd, 9), (0xd2, 9), (0xd3, 9),
    (0xd4, 9), (0xd5, 9), (0xd6, 9), (0xd7, 9), (0xd8, 9), (0xd9, 9),
    (0xda, 9), (0xdb, 9), (0x98, 9), (0x99, 9), (0x9a, 9), (0x18, 6),
    (0x9b, 9), (0x08, 11), (0x0c, 11), (0x0d, 11), (0x12, 12), (0x13, 12),
    (0x14, 12), (0x15, 12), (0x16, 12), (0x17, 12), (0x1c, 12), (0x1d, 12),
    (0x1e, 12), (0x1f, 12),
];

/// Black run-length codes, laid out like [`WHITE_CODES`].
pub const BLACK_CODES: [(u16, u8); NUM_RUN_CODES] = [
    (0x37, 10), (0x02, 3), (0x03, 2), (0x02, 2), (0x03, 3), (0x03, 4),
    (0x02, 4), (0x03, 5), (0x05, 6), (0x04, 6), (0x04, 7), (0x05, 7),
    (0x07, 7), (0x04, 8), (0x07, 8), (0x18, 9), (0x17, 10), (0x18, 10),
    (0x08, 10), (0x67, 11), (0x68, 11), (0x6c, 11), (0x37, 11), (0x28, 11),
    (0x17, 11), (0x18, 11), (0xca, 12), (0xcb, 12), (0xcc, 12), (0xcd, 12),
    (0x68, 12), (0x69, 12), (0x6a, 12), (0x6b, 12), (0xd2, 12), (0xd3, 12),
    (0xd4, 12), (0xd5, 12), (0xd6, 12), (0xd7, 12), (0x6c, 12), (0x6d, 12),
    (0xda, 12), (0xdb, 12), (0x54, 12), (0x55, 12), (0x56, 12), (0x57, 12),
    (0x64, 12), (0x65, 12), (0x52, 12), (0x53, 12), (0x24, 12), (0x37, 12),
    (0x38, 12), (0x27, 12), (0x28, 12), (0x58, 12), (0x59, 12), (0x2b, 12),
    (0x2c, 12), (0x5a, 12), (0x66, 12), (0x67, 12), (0x0f, 10), (0xc8, 12),
    (0xc9, 12), (0x5b, 12), (0x33, 12), (0x34, 12), (0x35, 12), (0x6c, 13),
    (0x6d, 13), (0x4a, 13), (0x4b, 13), (0x4c, 13), (0x4d, 13), (0x72, 13),
    (0x73, 13), (0x74, 13), (0x75, 13), (0x76, 13), (0x77, 13), (0x52, 13),
    (0x53, 13), (0x54, 13), (0x55, 13), (0x5a, 13), (0x5b, 13), (0x64, 13),
    (0x65, 13), (0x08, 11), (0x0c, 11), (0x0d, 11), (0x12, 12), (0x13, 12),
    (0x14, 12), (0x15, 12), (0x16, 12), (0x17, 12), (0x1c, 12), (0x1d, 12),
    (0x1e, 12), (0x1f, 12),
];

/// Run length represented by entry `index` of a code table.
pub fn run_length(index: usize) -> u32 {
    if index < 64 {
        index as u32
    } else {
        (index as u32 - 63) * 64
    }
}

/// Two-dimensional coding modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Pass mode.
    Pass,
    /// Horizontal mode: two run lengths follow.
    Horizontal,
    /// Vertical mode with offset -3..=3 from `b1`.
    Vertical(i8),
    /// Extension code.
    Extension,
    /// End of facsimile block.
    Eofb,
}

const MODE_PASS: i32 = 1;
const MODE_HORIZONTAL: i32 = 2;
const MODE_EXTENSION: i32 = 3;
const MODE_EOFB: i32 = 0;
const MODE_V_BIAS: i32 = 100;

/// 2-D mode codes as (code, length, tree value).
const MODE_CODES: [(u64, u8, i32); 11] = [
    (0x00, 7, MODE_EOFB),
    (0x01, 7, MODE_EXTENSION),
    (0x02, 7, MODE_V_BIAS - 3),
    (0x03, 7, MODE_V_BIAS + 3),
    (0x02, 6, MODE_V_BIAS - 2),
    (0x03, 6, MODE_V_BIAS + 2),
    (0x1, 4, MODE_PASS),
    (0x1, 3, MODE_HORIZONTAL),
    (0x2, 3, MODE_V_BIAS - 1),
    (0x3, 3, MODE_V_BIAS + 1),
    (0x1, 1, MODE_V_BIAS),
];

impl Mode {
    /// Map a mode tree value back to the mode.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            MODE_PASS => Some(Self::Pass),
            MODE_HORIZONTAL => Some(Self::Horizontal),
            MODE_EXTENSION => Some(Self::Extension),
            MODE_EOFB => Some(Self::Eofb),
            v if (MODE_V_BIAS - 3..=MODE_V_BIAS + 3).contains(&v) => {
                Some(Self::Vertical((v - MODE_V_BIAS) as i8))
            }
            _ => None,
        }
    }
}

/// The three decoding trees, shared by every fax decoder.
#[derive(Debug)]
pub struct FaxTrees {
    /// Run lengths, indexed by color (0 = white, 1 = black).
    pub runs: [HuffmanTree; 2],
    /// 2-D mode codes.
    pub modes: HuffmanTree,
}

fn run_tree(codes: &[(u16, u8); NUM_RUN_CODES]) -> Result<HuffmanTree> {
    let mut tree = HuffmanTree::new(NUM_RUN_CODES + 1, NUM_RUN_CODES + 16);
    for (index, &(code, len)) in codes.iter().enumerate() {
        tree.add_code(u64::from(code), len, run_length(index) as i32)?;
    }
    tree.add_code(0, 8, EOL)?;
    Ok(tree)
}

fn build_trees() -> Result<FaxTrees> {
    let mut modes = HuffmanTree::new(MODE_CODES.len(), 16);
    for &(code, len, value) in &MODE_CODES {
        modes.add_code(code, len, value)?;
    }
    Ok(FaxTrees {
        runs: [run_tree(&WHITE_CODES)?, run_tree(&BLACK_CODES)?],
        modes,
    })
}

/// Get the decoding trees, building them on first use.
pub fn fax_trees() -> Result<&'static FaxTrees> {
    static TREES: OnceLock<Result<FaxTrees>> = OnceLock::new();
    TREES.get_or_init(build_trees).as_ref().map_err(Clone::clone)
}
