//! Huffman decoder engine.
//!
//! A [`HuffmanTree`] is a binary prefix-code trie stored in an arena. Codes
//! are inserted as `(code, nbits, value)` triples and matched MSB-first of
//! their declared length: the first bit pulled from the [`BitReader`] selects
//! the child for the most significant bit of the code. This holds whatever
//! the reader's bit order within a byte is.
//!
//! No inserted code may be a prefix of another. An insertion that would
//! break this rule fails and leaves the tree untouched.
//!
//! # Construction styles
//!
//! - [`HuffmanTree::canonical`]: the usual canonical assignment from a list
//!   of code lengths.
//! - [`HuffmanTree::sequential`]: codes assigned in value order from a list
//!   of lengths (StuffIt "fixed Huffman").
//! - [`HuffmanTree::read_tree_description`]: a recursive, self-describing
//!   tree embedded in the bit stream (StuffIt Huffman).
//! - [`HuffmanTree::from_node_table`]: a table of signed 16-bit child pairs
//!   (Squeeze).

use crate::bitstream::BitReader;
use crate::error::{DecodeError, Result};

/// Maximum supported code length in bits.
pub const MAX_CODE_LENGTH: u8 = 48;

/// Child slot value meaning "no child". The root (index 0) is never a child.
const NO_CHILD: u32 = 0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Node {
    child: [u32; 2],
    value: Option<i32>,
}

impl Node {
    fn is_bare(&self) -> bool {
        self.value.is_none() && self.child == [NO_CHILD; 2]
    }
}

/// Prefix-code decoding table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    num_codes: usize,
    max_code_length: u8,
}

impl Default for HuffmanTree {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl HuffmanTree {
    /// Create an empty tree.
    ///
    /// The hints are the expected number of leaves and internal nodes, used
    /// only to size the arena.
    pub fn new(leaf_hint: usize, internal_hint: usize) -> Self {
        let mut nodes = Vec::with_capacity(1 + leaf_hint + internal_hint);
        nodes.push(Node::default());
        Self {
            nodes,
            num_codes: 0,
            max_code_length: 0,
        }
    }

    /// Number of codes inserted so far.
    pub fn len(&self) -> usize {
        self.num_codes
    }

    /// Whether no code has been inserted.
    pub fn is_empty(&self) -> bool {
        self.num_codes == 0
    }

    /// Length of the longest inserted code. Zero for an empty tree, and for
    /// a tree holding a single zero-length code.
    pub fn max_code_length(&self) -> u8 {
        self.max_code_length
    }

    /// Insert a code.
    ///
    /// The low `nbits` bits of `code` form the code, most significant first.
    pub fn add_code(&mut self, code: u64, nbits: u8, value: i32) -> Result<()> {
        if nbits > MAX_CODE_LENGTH {
            return Err(DecodeError::malformed_codebook(format!(
                "code length {nbits} exceeds {MAX_CODE_LENGTH}"
            )));
        }

        if nbits == 0 {
            if !self.nodes[0].is_bare() {
                return Err(DecodeError::malformed_codebook(
                    "zero-length code in a non-empty tree",
                ));
            }
            self.nodes[0].value = Some(value);
            self.num_codes = 1;
            return Ok(());
        }

        if self.nodes[0].value.is_some() {
            return Err(DecodeError::malformed_codebook(
                "tree already holds a zero-length code",
            ));
        }

        // Conflicts can only be detected on existing nodes. Once a new node
        // has been created, everything below it is new too, so a failure
        // never leaves a half-inserted path behind.
        let mut idx = 0usize;
        for i in (0..nbits).rev() {
            let bit = ((code >> i) & 1) as usize;
            let next = self.nodes[idx].child[bit];
            let last = i == 0;

            if next == NO_CHILD {
                let new_idx = self.push_node(if last { Some(value) } else { None })?;
                self.nodes[idx].child[bit] = new_idx;
                idx = new_idx as usize;
            } else if last {
                return Err(DecodeError::malformed_codebook(format!(
                    "code {code:#x}/{nbits} conflicts with an existing code"
                )));
            } else if self.nodes[next as usize].value.is_some() {
                return Err(DecodeError::malformed_codebook(format!(
                    "code {code:#x}/{nbits} has an existing code as prefix"
                )));
            } else {
                idx = next as usize;
            }
        }

        self.num_codes += 1;
        self.max_code_length = self.max_code_length.max(nbits);
        Ok(())
    }

    fn push_node(&mut self, value: Option<i32>) -> Result<u32> {
        let idx = u32::try_from(self.nodes.len())
            .map_err(|_| DecodeError::malformed_codebook("too many nodes"))?;
        self.nodes.push(Node {
            child: [NO_CHILD; 2],
            value,
        });
        Ok(idx)
    }

    /// Decode one value from `reader`.
    ///
    /// Returns [`DecodeError::UnexpectedEof`] if the reader ran out of bits
    /// mid-code, and [`DecodeError::HuffmanDecode`] if the bits match no code
    /// (including any lookup in an empty tree).
    pub fn read_next_value(&self, reader: &mut BitReader<'_>) -> Result<i32> {
        let mut node = &self.nodes[0];
        loop {
            if let Some(value) = node.value {
                return Ok(value);
            }
            if node.child == [NO_CHILD; 2] {
                return Err(DecodeError::HuffmanDecode);
            }

            let bit = reader.read_bit()?;
            let next = node.child[usize::from(bit)];
            if next == NO_CHILD {
                return Err(DecodeError::HuffmanDecode);
            }
            node = &self.nodes[next as usize];
        }
    }

    /// Build a canonical code from per-symbol lengths. Symbol `i` gets value
    /// `i`; a length of 0 means the symbol is unused.
    pub fn canonical(lengths: &[u8]) -> Result<Self> {
        let max_len = lengths.iter().copied().max().unwrap_or(0);
        if max_len > MAX_CODE_LENGTH {
            return Err(DecodeError::malformed_codebook(format!(
                "code length {max_len} exceeds {MAX_CODE_LENGTH}"
            )));
        }
        let max_len = usize::from(max_len);

        let mut bl_count = vec![0u64; max_len + 1];
        for &len in lengths.iter().filter(|&&len| len > 0) {
            bl_count[usize::from(len)] += 1;
        }

        let mut next_code = vec![0u64; max_len + 1];
        let mut code = 0u64;
        for bits in 1..=max_len {
            code = (code + bl_count[bits - 1]) << 1;
            next_code[bits] = code;
        }

        let used = lengths.iter().filter(|&&len| len > 0).count();
        let mut tree = Self::new(used, used);
        for (symbol, &len) in lengths.iter().enumerate() {
            if len == 0 {
                continue;
            }
            let code = next_code[usize::from(len)];
            next_code[usize::from(len)] += 1;
            if code >> len != 0 {
                return Err(DecodeError::malformed_codebook("oversubscribed code lengths"));
            }
            tree.add_code(code, len, symbol as i32)?;
        }
        Ok(tree)
    }

    /// Build a code by assigning codes in value order.
    ///
    /// The first code is all zeros. After that, a code shorter than its
    /// predecessor is `(prev >> (prev_len - len)) + 1`, and any other code is
    /// `(prev + 1) << (len - prev_len)`. Symbol `i` gets value `i`.
    pub fn sequential(lengths: &[u8]) -> Result<Self> {
        let mut tree = Self::new(lengths.len(), lengths.len());
        let mut prev: Option<(u64, u8)> = None;

        for (symbol, &len) in lengths.iter().enumerate() {
            if len == 0 || len > MAX_CODE_LENGTH {
                return Err(DecodeError::malformed_codebook(format!(
                    "invalid code length {len} for symbol {symbol}"
                )));
            }

            let code = match prev {
                None => 0,
                Some((prev_code, prev_len)) if len < prev_len => {
                    (prev_code >> (prev_len - len)) + 1
                }
                Some((prev_code, prev_len)) => (prev_code + 1) << (len - prev_len),
            };

            tree.add_code(code, len, symbol as i32)?;
            prev = Some((code, len));
        }
        Ok(tree)
    }

    /// Read a self-describing tree from the bit stream.
    ///
    /// Each node starts with one bit: `0` means two subtrees follow (the
    /// `0` branch first), `1` means a leaf whose value is the next
    /// `leaf_bits` bits. Running out of input ends the description early and
    /// keeps whatever was read.
    pub fn read_tree_description(reader: &mut BitReader<'_>, leaf_bits: u8) -> Result<Self> {
        let mut tree = Self::new(256, 512);
        match tree.read_subtree(reader, leaf_bits, 0, 0) {
            Err(err) if err.is_eof() => Ok(tree),
            Err(err) => Err(err),
            Ok(()) => Ok(tree),
        }
    }

    fn read_subtree(
        &mut self,
        reader: &mut BitReader<'_>,
        leaf_bits: u8,
        code: u64,
        nbits: u8,
    ) -> Result<()> {
        if nbits > MAX_CODE_LENGTH {
            return Err(DecodeError::malformed_codebook("tree description too deep"));
        }

        if reader.read_bit()? == 0 {
            self.read_subtree(reader, leaf_bits, code << 1, nbits + 1)?;
            self.read_subtree(reader, leaf_bits, (code << 1) | 1, nbits + 1)
        } else {
            let value = reader.read_bits(leaf_bits)?;
            self.add_code(code, nbits, value as i32)
        }
    }

    /// Build a tree from a Squeeze node table.
    ///
    /// Node 0 is the root. Each child is a node index if non-negative, or a
    /// leaf holding value `-(d + 1)` for `d` in `-257..=-1` (so `-257` is
    /// value 256). Cycles, trees deeper than [`MAX_CODE_LENGTH`], dangling
    /// node references and more than 256 nodes are rejected.
    pub fn from_node_table(table: &[[i16; 2]]) -> Result<Self> {
        if table.len() > SQUEEZE_MAX_NODES {
            return Err(DecodeError::malformed_codebook(format!(
                "{} nodes, at most {SQUEEZE_MAX_NODES} allowed",
                table.len()
            )));
        }

        let mut tree = Self::new(257, 257);
        if !table.is_empty() {
            let mut in_use = vec![false; table.len()];
            tree.interpret_node(table, &mut in_use, 0, 0, 0)?;
        }
        Ok(tree)
    }

    fn interpret_node(
        &mut self,
        table: &[[i16; 2]],
        in_use: &mut [bool],
        node: usize,
        code: u64,
        nbits: u8,
    ) -> Result<()> {
        if in_use[node] {
            return Err(DecodeError::malformed_codebook(format!(
                "node table has a cycle through node {node}"
            )));
        }
        if nbits >= MAX_CODE_LENGTH {
            return Err(DecodeError::malformed_codebook("node table too deep"));
        }

        in_use[node] = true;
        for (bit, &dval) in table[node].iter().enumerate() {
            let child_code = (code << 1) | bit as u64;
            match dval {
                0.. => {
                    let child = dval as usize;
                    if child >= table.len() {
                        return Err(DecodeError::malformed_codebook(format!(
                            "node {node} refers to missing node {child}"
                        )));
                    }
                    self.interpret_node(table, in_use, child, child_code, nbits + 1)?;
                }
                -257..=-1 => {
                    self.add_code(child_code, nbits + 1, -(i32::from(dval) + 1))?;
                }
                _ => {
                    return Err(DecodeError::malformed_codebook(format!(
                        "node {node} has invalid child {dval}"
                    )));
                }
            }
        }
        in_use[node] = false;
        Ok(())
    }
}

/// Most nodes a Squeeze node table may have (enough for 257 symbols).
pub const SQUEEZE_MAX_NODES: usize = 256;
