//! LZW decoder (Unix compress layout).
//!
//! Codes are packed LSB-first. The width starts at 9 bits and grows by one
//! whenever the next free code no longer fits, up to `max_bits`. Codes are
//! written in groups of eight, so a width change or a clear code abandons the
//! rest of the current group.

use crate::config::{CLEAR_CODE, INIT_BITS, LzwConfig};
use crate::dictionary::LzwDictionary;
use log::debug;
use retrodec_core::bitstream::{BitOrder, BitReader};
use retrodec_core::error::{DecodeError, Result};
use retrodec_core::filter::Decoder;
use retrodec_core::output::Output;

/// Tracks the code width and where the current group of eight codes began.
struct CodeReader<'a> {
    bits: BitReader<'a>,
    n_bits: u8,
    max_bits: u8,
    /// Codes read since the last width change or clear.
    group_codes: u64,
}

impl<'a> CodeReader<'a> {
    fn new(data: &'a [u8], max_bits: u8) -> Self {
        Self {
            bits: BitReader::new(data, BitOrder::Lsb),
            n_bits: INIT_BITS,
            max_bits,
            group_codes: 0,
        }
    }

    /// Largest code representable at the current width. At the top width
    /// this is one past the table, so the width never grows further.
    fn maxcode(&self) -> u32 {
        if self.n_bits == self.max_bits {
            1 << self.max_bits
        } else {
            (1 << self.n_bits) - 1
        }
    }

    /// Read one code. `None` at end of input.
    fn next_code(&mut self) -> Option<u16> {
        let code = self.bits.read_bits(self.n_bits).ok()?;
        self.group_codes += 1;
        Some(code as u16)
    }

    /// Skip the unread remainder of the current group. `false` if that ran
    /// into the end of input.
    fn skip_group(&mut self) -> bool {
        let partial = self.group_codes % 8;
        self.group_codes = 0;
        if partial == 0 {
            return true;
        }
        let skip = (8 - partial) * u64::from(self.n_bits);
        self.bits.skip_bits(skip).is_ok()
    }

    fn grow(&mut self) -> bool {
        let ok = self.skip_group();
        self.n_bits += 1;
        ok
    }

    fn restart(&mut self) -> bool {
        let ok = self.skip_group();
        self.n_bits = INIT_BITS;
        ok
    }
}

/// LZW decoder.
#[derive(Debug, Clone)]
pub struct LzwDecoder {
    config: LzwConfig,
    dict: LzwDictionary,
}

impl LzwDecoder {
    /// Create a decoder. Fails if the configuration is invalid.
    pub fn new(config: LzwConfig) -> Result<Self> {
        let dict = LzwDictionary::new(config)?;
        Ok(Self { config, dict })
    }

    /// Configuration in use.
    pub fn config(&self) -> LzwConfig {
        self.config
    }
}

impl Decoder for LzwDecoder {
    fn name(&self) -> &'static str {
        "lzw"
    }

    fn decode(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<Option<u64>> {
        self.dict.reset();
        let mut codes = CodeReader::new(input, self.config.max_bits);
        let mut string = Vec::with_capacity(256);
        let mut nclears = 0u32;

        let Some(first) = codes.next_code() else {
            return Ok(Some(0));
        };
        if first >= 256 {
            return Err(DecodeError::invalid_data(format!(
                "LZW stream starts with non-literal code {first}"
            )));
        }
        let mut oldcode = first;
        let mut finchar = first as u8;
        out.write_byte(finchar);

        while !out.is_full() {
            if self.dict.free_ent() > codes.maxcode() {
                if !codes.grow() {
                    break;
                }
                debug!(
                    "lzw: code width {} at free code {}",
                    codes.n_bits,
                    self.dict.free_ent()
                );
            }

            let Some(code) = codes.next_code() else {
                break;
            };

            if self.config.block_mode && code == CLEAR_CODE {
                nclears += 1;
                self.dict.clear();
                if !codes.restart() {
                    break;
                }
                continue;
            }

            let incode = code;
            if u32::from(code) >= self.dict.free_ent() {
                if u32::from(code) > self.dict.free_ent() {
                    return Err(DecodeError::invalid_data(format!(
                        "Invalid LZW code {code} (next free code is {})",
                        self.dict.free_ent()
                    )));
                }
                // KwKwK: the string for the code being defined right now
                self.dict.expand(oldcode, &mut string)?;
                string.push(finchar);
            } else {
                self.dict.expand(code, &mut string)?;
            }

            finchar = string[0];
            out.write(&string);

            self.dict.add(oldcode, finchar);
            oldcode = incode;
        }

        debug!(
            "lzw: {} bytes out, {} clears, ended at width {}",
            out.len(),
            nclears,
            codes.n_bits
        );
        Ok(Some(codes.bits.bytes_consumed() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pack 9-bit codes LSB-first.
    fn pack9(codes: &[u16]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut acc = 0u32;
        let mut nbits = 0;
        for &code in codes {
            acc |= u32::from(code) << nbits;
            nbits += 9;
            while nbits >= 8 {
                out.push(acc as u8);
                acc >>= 8;
                nbits -= 8;
            }
        }
        if nbits > 0 {
            out.push(acc as u8);
        }
        out
    }

    fn decode(config: LzwConfig, data: &[u8]) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let mut decoder = LzwDecoder::new(config)?;
        decoder.decode(data, &mut Output::new(&mut buf))?;
        Ok(buf)
    }

    #[test]
    fn test_literals_and_backref() {
        // a b <ab> <ba>
        let data = pack9(&[97, 98, 257, 258]);
        assert_eq!(decode(LzwConfig::COMPRESS, &data).unwrap(), b"ababba");
    }

    #[test]
    fn test_kwkwk() {
        // a <aa> <aaa>
        let data = pack9(&[97, 257, 258]);
        assert_eq!(decode(LzwConfig::COMPRESS, &data).unwrap(), b"aaaaaa");
    }

    #[test]
    fn test_non_block_mode_uses_256() {
        let data = pack9(&[120, 256]);
        assert_eq!(decode(LzwConfig::new(12, false), &data).unwrap(), b"xxx");
    }

    #[test]
    fn test_first_code_must_be_literal() {
        let data = pack9(&[300]);
        assert!(decode(LzwConfig::COMPRESS, &data).is_err());
    }

    #[test]
    fn test_code_beyond_free_is_error() {
        let data = pack9(&[97, 300]);
        let err = decode(LzwConfig::COMPRESS, &data).unwrap_err();
        assert!(err.to_string().contains("Invalid LZW code 300"));
    }

    #[test]
    fn test_empty_input() {
        assert!(decode(LzwConfig::COMPRESS, &[]).unwrap().is_empty());
    }
}
