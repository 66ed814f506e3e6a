//! Test-side fax encoder built on the public code tables.

#![allow(dead_code)]

use retrodec_core::bitstream::BitOrder;
use retrodec_fax::{BLACK_CODES, Color, WHITE_CODES, find_b1, find_b2};

pub struct BitWriter {
    bytes: Vec<u8>,
    nbits: usize,
    order: BitOrder,
}

impl BitWriter {
    pub fn new(order: BitOrder) -> Self {
        Self {
            bytes: Vec::new(),
            nbits: 0,
            order,
        }
    }

    pub fn bit(&mut self, bit: bool) {
        if self.nbits % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            let shift = match self.order {
                BitOrder::Msb => 7 - self.nbits % 8,
                BitOrder::Lsb => self.nbits % 8,
            };
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1 << shift;
            }
        }
        self.nbits += 1;
    }

    /// Push the low `len` bits of `code`, most significant first.
    pub fn code(&mut self, code: u64, len: u8) {
        for i in (0..len).rev() {
            self.bit((code >> i) & 1 == 1);
        }
    }

    pub fn pad_to_byte(&mut self) {
        while self.nbits % 8 != 0 {
            self.bit(false);
        }
    }

    pub fn eol(&mut self) {
        self.code(1, 12);
    }

    /// Code one run, with as many make-up codes as it needs.
    pub fn run(&mut self, color: Color, len: usize) {
        let table = match color {
            Color::White => &WHITE_CODES,
            Color::Black => &BLACK_CODES,
        };
        let mut len = len;
        while len >= 64 {
            let makeup = (len / 64).min(40);
            let (code, bits) = table[63 + makeup];
            self.code(u64::from(code), bits);
            len -= makeup * 64;
        }
        let (code, bits) = table[len];
        self.code(u64::from(code), bits);
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Build a row from `(color, run)` pairs.
pub fn row(runs: &[(Color, usize)]) -> Vec<Color> {
    runs.iter()
        .flat_map(|&(color, len)| std::iter::repeat_n(color, len))
        .collect()
}

/// Pack rows the way the decoder writes them.
pub fn pack(rows: &[Vec<Color>]) -> Vec<u8> {
    let mut out = Vec::new();
    for row in rows {
        let mut packed = vec![0u8; row.len().div_ceil(8)];
        for (i, &pixel) in row.iter().enumerate() {
            if pixel == Color::Black {
                packed[i / 8] |= 0x80 >> (i % 8);
            }
        }
        out.extend(packed);
    }
    out
}

/// Lengths of the alternating runs of a row, starting with white.
fn runs_of(row: &[Color]) -> Vec<usize> {
    let mut runs = Vec::new();
    let mut color = Color::White;
    let mut len = 0;
    for &pixel in row {
        if pixel == color {
            len += 1;
        } else {
            runs.push(len);
            color = color.flip();
            len = 1;
        }
    }
    runs.push(len);
    runs
}

/// Code a row one-dimensionally.
pub fn encode_1d_row(w: &mut BitWriter, row: &[Color]) {
    let mut color = Color::White;
    for len in runs_of(row) {
        w.run(color, len);
        color = color.flip();
    }
}

/// Next changing element of `row` after `a0`, or the width.
fn next_change(row: &[Color], a0: i64) -> usize {
    let start = usize::try_from(a0 + 1).unwrap_or(0);
    (start..row.len())
        .find(|&i| {
            if i == 0 {
                row[0] == Color::Black
            } else {
                row[i - 1] != row[i]
            }
        })
        .unwrap_or(row.len())
}

/// Code a row two-dimensionally against `prev`.
pub fn encode_2d_row(w: &mut BitWriter, prev: &[Color], row: &[Color]) {
    let width = row.len() as i64;
    let mut a0: i64 = -1;
    let mut color = Color::White;

    while a0 < width {
        let a1 = next_change(row, a0) as i64;
        let b1 = find_b1(prev, a0, color) as i64;
        let b2 = find_b2(prev, b1 as usize) as i64;

        if b2 < a1 {
            w.code(0b0001, 4);
            a0 = b2;
        } else if (a1 - b1).abs() <= 3 {
            let (code, len) = match a1 - b1 {
                0 => (0b1, 1),
                1 => (0b011, 3),
                2 => (0b000011, 6),
                3 => (0b0000011, 7),
                -1 => (0b010, 3),
                -2 => (0b000010, 6),
                _ => (0b0000010, 7),
            };
            w.code(code, len);
            a0 = a1;
            color = color.flip();
        } else {
            let a2 = next_change(row, a1) as i64;
            w.code(0b001, 3);
            w.run(color, (a1 - a0.max(0)) as usize);
            w.run(color.flip(), (a2 - a1) as usize);
            a0 = a2;
        }
    }
}

/// A whole Group 4 image, ended with EOFB.
pub fn encode_g4(rows: &[Vec<Color>], order: BitOrder) -> Vec<u8> {
    let mut w = BitWriter::new(order);
    let mut prev = vec![Color::White; rows.first().map_or(0, Vec::len)];
    for row in rows {
        encode_2d_row(&mut w, &prev, row);
        prev.clone_from(row);
    }
    w.eol();
    w.eol();
    w.finish()
}

/// A whole Group 3 image: EOL before every row.
pub fn encode_g3(rows: &[Vec<Color>], order: BitOrder, with_eol: bool) -> Vec<u8> {
    let mut w = BitWriter::new(order);
    for row in rows {
        if with_eol {
            w.eol();
        }
        encode_1d_row(&mut w, row);
    }
    if with_eol {
        for _ in 0..6 {
            w.eol();
        }
    }
    w.finish()
}

/// A whole Modified Huffman (TIFF 2) image.
pub fn encode_mh(rows: &[Vec<Color>]) -> Vec<u8> {
    let mut w = BitWriter::new(BitOrder::Msb);
    for row in rows {
        encode_1d_row(&mut w, row);
        w.pad_to_byte();
    }
    w.finish()
}
