//! LZW dictionary (code table).
//!
//! Entries are stored as (prefix code, suffix byte) pairs. Codes below 256
//! are implicit single-byte strings, so only the upper part of the table is
//! ever written.

use crate::config::LzwConfig;
use retrodec_core::error::{DecodeError, Result};

/// Prefix/suffix code table sized for `1 << max_bits` codes.
#[derive(Debug, Clone)]
pub struct LzwDictionary {
    prefix: Vec<u16>,
    suffix: Vec<u8>,
    /// Next code to be assigned.
    free_ent: u32,
    config: LzwConfig,
}

impl LzwDictionary {
    /// Create an empty dictionary.
    pub fn new(config: LzwConfig) -> Result<Self> {
        config.validate()?;
        let size = config.table_size();
        Ok(Self {
            prefix: vec![0; size],
            suffix: vec![0; size],
            free_ent: config.first_free(),
            config,
        })
    }

    /// Forget every learned string.
    pub fn reset(&mut self) {
        self.free_ent = self.config.first_free();
    }

    /// Forget every learned string after a clear code.
    ///
    /// The next entry lands on the clear code's own slot, which keeps the
    /// decoder one entry behind the encoder the way compress expects.
    pub fn clear(&mut self) {
        self.free_ent = u32::from(crate::config::CLEAR_CODE);
    }

    /// Next code to be assigned.
    pub fn free_ent(&self) -> u32 {
        self.free_ent
    }

    /// Whether every code has been assigned.
    pub fn is_full(&self) -> bool {
        self.free_ent as usize >= self.config.table_size()
    }

    /// Append `prefix + suffix` as the next code. Does nothing once full.
    pub fn add(&mut self, prefix: u16, suffix: u8) {
        if self.is_full() {
            return;
        }
        let slot = self.free_ent as usize;
        self.prefix[slot] = prefix;
        self.suffix[slot] = suffix;
        self.free_ent += 1;
    }

    /// Write the string for `code` into `buf`, replacing its contents.
    pub fn expand(&self, code: u16, buf: &mut Vec<u8>) -> Result<()> {
        buf.clear();
        let mut code = code;
        while code >= 256 {
            if buf.len() >= self.config.table_size() {
                return Err(DecodeError::invalid_data("LZW string chain too long"));
            }
            buf.push(self.suffix[usize::from(code)]);
            code = self.prefix[usize::from(code)];
        }
        buf.push(code as u8);
        buf.reverse();
        Ok(())
    }
}
