//! PackBits decoder.
//!
//! Each run starts with a control byte `b`:
//!
//! - `b < 128`: `b + 1` literal units follow.
//! - `b > 128`: the next unit is repeated `257 - b` times.
//! - `b == 128`: no-op.
//!
//! A unit is one byte for classic PackBits (MacPaint, TIFF, ILBM) and two
//! bytes for the 16-bit variant found in some PICT and PSD files.

use log::trace;
use retrodec_core::error::{DecodeError, Result};
use retrodec_core::filter::{Codec, Command, DecompressStatus};
use retrodec_core::output::Output;

/// Size of a PackBits unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSize {
    /// Classic PackBits.
    #[default]
    One,
    /// 16-bit PackBits.
    Two,
}

impl UnitSize {
    /// Unit size in bytes.
    pub fn bytes(self) -> usize {
        match self {
            UnitSize::One => 1,
            UnitSize::Two => 2,
        }
    }
}

/// PackBits configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackBitsConfig {
    /// Unit size.
    pub unit_size: UnitSize,
}

impl PackBitsConfig {
    /// Classic, byte-oriented PackBits.
    pub const STANDARD: Self = Self {
        unit_size: UnitSize::One,
    };

    /// PackBits over 16-bit units.
    pub const PACKBITS16: Self = Self {
        unit_size: UnitSize::Two,
    };

    /// Build a configuration from a unit size in bytes (1 or 2).
    pub fn with_unit_bytes(nbytes: usize) -> Result<Self> {
        let unit_size = match nbytes {
            1 => UnitSize::One,
            2 => UnitSize::Two,
            _ => {
                return Err(DecodeError::invalid_parameter(format!(
                    "PackBits unit size must be 1 or 2, got {nbytes}"
                )));
            }
        };
        Ok(Self { unit_size })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting a control byte.
    Neutral,
    /// Copying literal bytes.
    CopyingLiteral { remaining: usize },
    /// Collecting the unit to repeat.
    ReadingUnit { repeat: usize },
}

/// Streaming PackBits decoder.
#[derive(Debug, Clone)]
pub struct PackBitsDecoder {
    unit_bytes: usize,
    unit_buf: [u8; 2],
    unit_len: usize,
    state: State,
    total_nbytes_processed: u64,
}

impl Default for PackBitsDecoder {
    fn default() -> Self {
        Self::new(PackBitsConfig::default())
    }
}

impl PackBitsDecoder {
    /// Create a decoder.
    pub fn new(config: PackBitsConfig) -> Self {
        Self {
            unit_bytes: config.unit_size.bytes(),
            unit_buf: [0; 2],
            unit_len: 0,
            state: State::Neutral,
            total_nbytes_processed: 0,
        }
    }

    /// Input bytes consumed so far.
    pub fn bytes_processed(&self) -> u64 {
        self.total_nbytes_processed
    }

    fn soft_reset(&mut self) {
        self.state = State::Neutral;
        self.unit_len = 0;
    }
}

impl Codec for PackBitsDecoder {
    fn name(&self) -> &'static str {
        "packbits"
    }

    fn add_buf(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<DecompressStatus> {
        for &b in input {
            if out.is_full() {
                return Ok(DecompressStatus::Done);
            }
            self.total_nbytes_processed += 1;

            self.state = match self.state {
                State::Neutral if b > 128 => State::ReadingUnit {
                    repeat: 257 - usize::from(b),
                },
                State::Neutral if b < 128 => State::CopyingLiteral {
                    remaining: (1 + usize::from(b)) * self.unit_bytes,
                },
                State::Neutral => State::Neutral,
                State::CopyingLiteral { remaining } => {
                    out.write_byte(b);
                    if remaining <= 1 {
                        State::Neutral
                    } else {
                        State::CopyingLiteral {
                            remaining: remaining - 1,
                        }
                    }
                }
                State::ReadingUnit { repeat } => {
                    self.unit_buf[self.unit_len] = b;
                    self.unit_len += 1;
                    if self.unit_len < self.unit_bytes {
                        State::ReadingUnit { repeat }
                    } else {
                        if self.unit_bytes == 1 {
                            out.write_run(b, repeat as u64);
                        } else {
                            for _ in 0..repeat {
                                if out.write(&self.unit_buf[..self.unit_bytes]) < self.unit_bytes {
                                    break;
                                }
                            }
                        }
                        self.unit_len = 0;
                        State::Neutral
                    }
                }
            };
        }
        Ok(DecompressStatus::NeedsInput)
    }

    fn finish(&mut self, _out: &mut Output<'_>) -> Result<Option<u64>> {
        Ok(Some(self.total_nbytes_processed))
    }

    fn command(&mut self, cmd: Command) {
        trace!("packbits: {cmd:?}");
        self.soft_reset();
        if cmd == Command::Reinitialize {
            self.total_nbytes_processed = 0;
        }
    }
}
