//! Fax image parameters, as a TIFF reader would supply them.

use retrodec_core::bitstream::BitOrder;
use retrodec_core::error::{DecodeError, Result};

/// Widest image accepted.
pub const MAX_FAX_WIDTH: usize = 1_000_000;

/// Fax compression flavor, named after the TIFF `Compression` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaxCompression {
    /// TIFF 2: Modified Huffman, no EOL codes, rows padded to a byte.
    Rle,
    /// TIFF 3: T.4 with EOL codes.
    Group3,
    /// TIFF 4: T.6, two-dimensional, no EOL codes.
    Group4,
}

impl FaxCompression {
    /// Map a TIFF `Compression` tag value.
    pub fn from_tiff(value: u16) -> Result<Self> {
        match value {
            2 => Ok(Self::Rle),
            3 => Ok(Self::Group3),
            4 => Ok(Self::Group4),
            _ => Err(DecodeError::invalid_parameter(format!(
                "TIFF compression {value} is not a fax method"
            ))),
        }
    }

    /// The TIFF `Compression` tag value.
    pub fn tiff_value(self) -> u16 {
        match self {
            Self::Rle => 2,
            Self::Group3 => 3,
            Self::Group4 => 4,
        }
    }
}

/// Decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaxConfig {
    /// Pixels per row.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Compression flavor.
    pub compression: FaxCompression,
    /// TIFF `T4Options`. Bit 0 selects 2-D Group 3 coding.
    pub t4_options: u32,
    /// Bit order within each byte (TIFF `FillOrder` 1 = MSB, 2 = LSB).
    pub bit_order: BitOrder,
}

impl FaxConfig {
    /// Configuration with no T.4 options and MSB-first fill order.
    pub fn new(width: usize, height: usize, compression: FaxCompression) -> Self {
        Self {
            width,
            height,
            compression,
            t4_options: 0,
            bit_order: BitOrder::Msb,
        }
    }

    /// Set the TIFF `T4Options` value.
    pub fn with_t4_options(mut self, t4_options: u32) -> Self {
        self.t4_options = t4_options;
        self
    }

    /// Set the bit order.
    pub fn with_bit_order(mut self, bit_order: BitOrder) -> Self {
        self.bit_order = bit_order;
        self
    }

    /// Bytes per packed output row.
    pub fn row_bytes(&self) -> usize {
        self.width.div_ceil(8)
    }

    /// Whether rows are coded relative to the previous row.
    pub fn is_2d(&self) -> bool {
        match self.compression {
            FaxCompression::Group4 => true,
            FaxCompression::Group3 => self.t4_options & 1 != 0,
            FaxCompression::Rle => false,
        }
    }

    /// Check the dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.width > MAX_FAX_WIDTH {
            return Err(DecodeError::invalid_parameter(format!(
                "fax width {} out of range 1..={MAX_FAX_WIDTH}",
                self.width
            )));
        }
        if self.height == 0 {
            return Err(DecodeError::invalid_parameter("fax height is 0"));
        }
        Ok(())
    }
}
