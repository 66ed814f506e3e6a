//! LZW configuration for the compress family of formats.

use retrodec_core::error::{DecodeError, Result};

/// Smallest code width; every stream starts here.
pub const INIT_BITS: u8 = 9;

/// Largest supported code width.
pub const MAX_BITS: u8 = 16;

/// Clear code in block mode.
pub const CLEAR_CODE: u16 = 256;

/// Magic bytes at the start of a `.Z` file.
pub const Z_MAGIC: [u8; 2] = [0x1F, 0x9D];

/// LZW configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzwConfig {
    /// Maximum code width in bits (9..=16).
    pub max_bits: u8,
    /// Whether code 256 resets the dictionary.
    pub block_mode: bool,
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self::COMPRESS
    }
}

impl LzwConfig {
    /// Default settings of Unix `compress`.
    pub const COMPRESS: Self = Self {
        max_bits: 16,
        block_mode: true,
    };

    /// StuffIt method 2.
    pub const STUFFIT: Self = Self {
        max_bits: 14,
        block_mode: true,
    };

    /// Create a configuration.
    pub fn new(max_bits: u8, block_mode: bool) -> Self {
        Self {
            max_bits,
            block_mode,
        }
    }

    /// Parse the flags byte that follows the `.Z` magic.
    ///
    /// The low five bits hold the maximum code width and bit 7 selects block
    /// mode.
    pub fn from_header_flags(flags: u8) -> Result<Self> {
        let config = Self::new(flags & 0x1F, flags & 0x80 != 0);
        config.validate()?;
        Ok(config)
    }

    /// Check that the parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if !(INIT_BITS..=MAX_BITS).contains(&self.max_bits) {
            return Err(DecodeError::invalid_parameter(format!(
                "max_bits must be in {INIT_BITS}..={MAX_BITS}, got {}",
                self.max_bits
            )));
        }
        Ok(())
    }

    /// Number of dictionary entries (`1 << max_bits`).
    pub fn table_size(&self) -> usize {
        1 << self.max_bits
    }

    /// First code the dictionary hands out.
    pub fn first_free(&self) -> u32 {
        if self.block_mode { 257 } else { 256 }
    }
}
