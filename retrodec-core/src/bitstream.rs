//! Bit-level reading over a byte slice.
//!
//! Legacy formats disagree on how bits are packed within a byte, so the
//! reader is parameterized by [`BitOrder`]:
//!
//! - [`BitOrder::Lsb`]: the first bit of each byte is its least significant
//!   bit (Squeeze, LZW, fax with reversed fill order).
//! - [`BitOrder::Msb`]: the first bit is the most significant one (StuffIt,
//!   fax with normal fill order).
//!
//! # Example
//!
//! ```
//! use retrodec_core::bitstream::{BitOrder, BitReader};
//!
//! let data = [0b1010_0000];
//! let mut reader = BitReader::new(&data, BitOrder::Msb);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.bytes_consumed(), 1);
//! ```

use crate::error::{DecodeError, Result};

/// Bit order within a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitOrder {
    /// Least significant bit first.
    Lsb,
    /// Most significant bit first.
    #[default]
    Msb,
}

/// A bit-level reader over a borrowed byte slice.
///
/// Reading past the end sets a sticky EOF flag and returns
/// [`DecodeError::UnexpectedEof`].
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    order: BitOrder,
    /// Index of the byte currently being read.
    byte_pos: usize,
    /// Bits already consumed from `data[byte_pos]` (0..8).
    bit_pos: u8,
    eof: bool,
    total_bits_read: u64,
}

impl<'a> BitReader<'a> {
    /// Create a reader over `data`.
    pub fn new(data: &'a [u8], order: BitOrder) -> Self {
        Self {
            data,
            order,
            byte_pos: 0,
            bit_pos: 0,
            eof: false,
            total_bits_read: 0,
        }
    }

    /// Bit order of this reader.
    pub fn order(&self) -> BitOrder {
        self.order
    }

    /// Whether a read has run past the end of the data.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Total number of bits read so far.
    pub fn bits_read(&self) -> u64 {
        self.total_bits_read
    }

    /// Number of bits left in the data.
    pub fn remaining_bits(&self) -> u64 {
        let total = self.data.len() as u64 * 8;
        total.saturating_sub(self.byte_pos as u64 * 8 + u64::from(self.bit_pos))
    }

    /// Number of input bytes touched so far, counting a partially read byte
    /// as consumed.
    pub fn bytes_consumed(&self) -> usize {
        let n = self.byte_pos + usize::from(self.bit_pos > 0);
        n.min(self.data.len())
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<u8> {
        let Some(&byte) = self.data.get(self.byte_pos) else {
            self.eof = true;
            return Err(DecodeError::UnexpectedEof);
        };

        let bit = match self.order {
            BitOrder::Lsb => (byte >> self.bit_pos) & 1,
            BitOrder::Msb => (byte >> (7 - self.bit_pos)) & 1,
        };

        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
        self.total_bits_read += 1;
        Ok(bit)
    }

    /// Read up to 32 bits.
    ///
    /// With [`BitOrder::Msb`] the first bit read ends up in the most
    /// significant position of the result; with [`BitOrder::Lsb`] it ends up
    /// in the least significant position.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        let mut value = 0u32;
        for i in 0..count {
            let bit = u32::from(self.read_bit()?);
            match self.order {
                BitOrder::Msb => value = (value << 1) | bit,
                BitOrder::Lsb => value |= bit << i,
            }
        }
        Ok(value)
    }

    /// Skip to the start of the next byte, unless already aligned.
    pub fn align_to_byte(&mut self) {
        if self.bit_pos != 0 {
            self.total_bits_read += u64::from(8 - self.bit_pos);
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
    }

    /// Whether the reader sits on a byte boundary.
    pub fn is_byte_aligned(&self) -> bool {
        self.bit_pos == 0
    }

    /// Skip `count` bits. Skipping past the end leaves the reader at the end
    /// with the EOF flag set.
    pub fn skip_bits(&mut self, count: u64) -> Result<()> {
        let available = self.remaining_bits();
        if count > available {
            self.total_bits_read += available;
            self.byte_pos = self.data.len();
            self.bit_pos = 0;
            self.eof = true;
            return Err(DecodeError::UnexpectedEof);
        }

        let target = self.byte_pos as u64 * 8 + u64::from(self.bit_pos) + count;
        self.byte_pos = (target / 8) as usize;
        self.bit_pos = (target % 8) as u8;
        self.total_bits_read += count;
        Ok(())
    }
}
