//! LZSS decoders.
//!
//! Both dialects read a flag byte whose bits (LSB first) tell, one per
//! token, whether a literal byte or a back-reference follows. They differ in
//! the flag polarity and in how a back-reference is encoded:
//!
//! | Dialect | literal flag | match encoding                           |
//! |---------|--------------|------------------------------------------|
//! | classic | 1            | `x0 x1`: pos `((x1&0xF0)<<4)\|x0`, len `(x1&0x0F)+3` |
//! | Help    | 0            | u16le `x`: start `cur-((x&0xFFF)+1)`, len `(x>>12)+3` |
//!
//! Running out of input is the normal way a stream ends. The number of bytes
//! consumed is always exact.

use crate::config::{LzssConfig, WINDOW_SIZE};
use log::debug;
use retrodec_core::error::Result;
use retrodec_core::filter::Decoder;
use retrodec_core::output::Output;
use retrodec_core::ringbuffer::Lz77Buffer;

/// LZSS token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LzssToken {
    /// A literal byte.
    Literal(u8),
    /// A copy from the window.
    Match {
        /// Absolute window position of the first byte to copy.
        start: usize,
        /// Number of bytes to copy.
        length: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Classic,
    Help,
}

/// Splits the input into tokens. Never consumes a partial token.
struct TokenReader<'a> {
    data: &'a [u8],
    pos: usize,
    flags: u8,
    nflags: u8,
}

impl<'a> TokenReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            flags: 0,
            nflags: 0,
        }
    }

    fn next_flag(&mut self) -> Option<bool> {
        if self.nflags == 0 {
            self.flags = *self.data.get(self.pos)?;
            self.pos += 1;
            self.nflags = 8;
        }
        let bit = self.flags & 1;
        self.flags >>= 1;
        self.nflags -= 1;
        Some(bit == 1)
    }

    fn next_byte(&mut self) -> Option<u8> {
        let b = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    fn next_pair(&mut self) -> Option<(u8, u8)> {
        if self.pos + 2 > self.data.len() {
            return None;
        }
        let pair = (self.data[self.pos], self.data[self.pos + 1]);
        self.pos += 2;
        Some(pair)
    }

    fn next_token(&mut self, dialect: Dialect, curpos: usize) -> Option<LzssToken> {
        let flag = self.next_flag()?;
        let is_literal = match dialect {
            Dialect::Classic => flag,
            Dialect::Help => !flag,
        };

        if is_literal {
            return self.next_byte().map(LzssToken::Literal);
        }

        let (x0, x1) = self.next_pair()?;
        let token = match dialect {
            Dialect::Classic => LzssToken::Match {
                start: (usize::from(x1 & 0xF0) << 4) | usize::from(x0),
                length: usize::from(x1 & 0x0F) + 3,
            },
            Dialect::Help => {
                let x = u16::from_le_bytes([x0, x1]);
                LzssToken::Match {
                    start: curpos.wrapping_sub(usize::from(x & 0x0FFF) + 1),
                    length: usize::from(x >> 12) + 3,
                }
            }
        };
        Some(token)
    }
}

fn decode_stream(
    dialect: Dialect,
    window: &mut Lz77Buffer,
    input: &[u8],
    out: &mut Output<'_>,
) -> u64 {
    let mut reader = TokenReader::new(input);
    while let Some(token) = reader.next_token(dialect, window.curpos()) {
        match token {
            LzssToken::Literal(b) => window.add_literal_byte(out, b),
            LzssToken::Match { start, length } => window.copy_from_history(out, start, length),
        }
        if window.is_stopped() {
            break;
        }
    }

    debug!(
        "lzss: consumed {} of {} bytes, wrote {}",
        reader.pos,
        input.len(),
        out.len()
    );
    reader.pos as u64
}

/// Classic LZSS decoder (Okumura, SZDD, LArc lz5).
#[derive(Debug, Clone, Copy, Default)]
pub struct LzssDecoder {
    config: LzssConfig,
}

impl LzssDecoder {
    /// Create a decoder.
    pub fn new(config: LzssConfig) -> Self {
        Self { config }
    }

    /// The decoder's configuration.
    pub fn config(&self) -> LzssConfig {
        self.config
    }
}

impl Decoder for LzssDecoder {
    fn name(&self) -> &'static str {
        "lzss1"
    }

    fn decode(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<Option<u64>> {
        let mut window = Lz77Buffer::new(WINDOW_SIZE)?;
        if self.config.lz5_window {
            window.set_lz5_window();
        } else {
            window.clear(b' ');
        }
        window.set_curpos(self.config.start_pos());

        Ok(Some(decode_stream(Dialect::Classic, &mut window, input, out)))
    }
}

/// Windows Help (HLP) LZ77 decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct HlpLz77Decoder;

impl HlpLz77Decoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for HlpLz77Decoder {
    fn name(&self) -> &'static str {
        "hlp_lz77"
    }

    fn decode(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<Option<u64>> {
        let mut window = Lz77Buffer::new(WINDOW_SIZE)?;
        window.clear(b' ');

        Ok(Some(decode_stream(Dialect::Help, &mut window, input, out)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_tokens() {
        // flags 0b0000_0001: literal 'a', then a match
        let data = [0x01, b'a', 0x34, 0x52];
        let mut reader = TokenReader::new(&data);
        assert_eq!(
            reader.next_token(Dialect::Classic, 0),
            Some(LzssToken::Literal(b'a'))
        );
        assert_eq!(
            reader.next_token(Dialect::Classic, 0),
            Some(LzssToken::Match {
                start: 0x534,
                length: 5
            })
        );
        assert_eq!(reader.next_token(Dialect::Classic, 0), None);
        assert_eq!(reader.pos, 4);
    }

    #[test]
    fn test_help_tokens() {
        // flags 0b0000_0010: literal, then match x = 0x3002
        let data = [0x02, b'z', 0x02, 0x30];
        let mut reader = TokenReader::new(&data);
        assert_eq!(reader.next_token(Dialect::Help, 0), Some(LzssToken::Literal(b'z')));
        assert_eq!(
            reader.next_token(Dialect::Help, 10),
            Some(LzssToken::Match {
                start: 7,
                length: 6
            })
        );
    }

    #[test]
    fn test_partial_match_is_not_consumed() {
        let data = [0x00, 0x12];
        let mut reader = TokenReader::new(&data);
        assert_eq!(reader.next_token(Dialect::Classic, 0), None);
        assert_eq!(reader.pos, 1);
    }
}
