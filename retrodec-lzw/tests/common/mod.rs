//! A small compress-compatible LZW encoder used to produce test streams.

use std::collections::HashMap;

struct CodeWriter {
    out: Vec<u8>,
    acc: u64,
    nbits: u32,
    group_codes: u32,
}

impl CodeWriter {
    fn put(&mut self, code: u32, width: u8) {
        self.acc |= u64::from(code) << self.nbits;
        self.nbits += u32::from(width);
        while self.nbits >= 8 {
            self.out.push(self.acc as u8);
            self.acc >>= 8;
            self.nbits -= 8;
        }
        self.group_codes += 1;
    }

    /// Pad the current group of eight codes with zero codes.
    fn end_group(&mut self, width: u8) {
        while self.group_codes % 8 != 0 {
            self.put(0, width);
        }
        self.group_codes = 0;
    }

    fn finish(mut self) -> Vec<u8> {
        if self.nbits > 0 {
            self.out.push(self.acc as u8);
        }
        self.out
    }
}

/// Compress `data` the way `compress -b max_bits` does. With `clear_every`,
/// a clear code is emitted after that many codes (block mode only).
pub fn compress(
    data: &[u8],
    max_bits: u8,
    block_mode: bool,
    clear_every: Option<usize>,
) -> Vec<u8> {
    let first_free: u32 = if block_mode { 257 } else { 256 };
    let maxmaxcode: u32 = 1 << max_bits;
    let maxcode_for = |n: u8| -> u32 {
        if n == max_bits {
            maxmaxcode
        } else {
            (1 << n) - 1
        }
    };

    let mut writer = CodeWriter {
        out: Vec::new(),
        acc: 0,
        nbits: 0,
        group_codes: 0,
    };
    let Some((&first, rest)) = data.split_first() else {
        return Vec::new();
    };

    let mut table: HashMap<(u32, u8), u32> = HashMap::new();
    let mut free_ent = first_free;
    let mut n_bits = 9u8;
    let mut emitted = 0usize;
    let mut ent = u32::from(first);

    let emit = |code: u32, free_ent: u32, n_bits: &mut u8, writer: &mut CodeWriter| {
        writer.put(code, *n_bits);
        if free_ent > maxcode_for(*n_bits) {
            writer.end_group(*n_bits);
            *n_bits += 1;
        }
    };

    for &c in rest {
        if let Some(&code) = table.get(&(ent, c)) {
            ent = code;
            continue;
        }
        emit(ent, free_ent, &mut n_bits, &mut writer);
        emitted += 1;
        if free_ent < maxmaxcode {
            table.insert((ent, c), free_ent);
            free_ent += 1;
        }
        ent = u32::from(c);

        if block_mode && clear_every.is_some_and(|n| emitted % n == 0) {
            writer.put(256, n_bits);
            writer.end_group(n_bits);
            table.clear();
            free_ent = first_free;
            n_bits = 9;
        }
    }
    emit(ent, free_ent, &mut n_bits, &mut writer);
    writer.finish()
}
