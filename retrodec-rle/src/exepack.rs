//! EXEPACK relocation table expansion.
//!
//! EXEPACK stores the relocation table of the packed program as sixteen
//! groups, one per 64 KB segment (0x0000, 0x1000, ..., 0xF000). Each group
//! is a little-endian count followed by that many 16-bit offsets. The
//! expanded table is the ordinary MZ layout: one `offset, segment` pair of
//! little-endian words per relocation.

use log::{debug, trace};
use retrodec_core::error::{DecodeError, Result};
use retrodec_core::filter::Decoder;
use retrodec_core::output::Output;

/// Number of segment groups in a packed table.
pub const EXEPACK_SEGMENTS: u32 = 16;

/// Largest number of relocations an MZ header can describe.
pub const MAX_RELOCS: u32 = 0xFFFF;

/// Whole-input decoder for packed EXEPACK relocation tables.
#[derive(Debug, Clone, Default)]
pub struct ExepackRelocDecoder {
    reloc_count: u32,
}

impl ExepackRelocDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Relocations produced by the last call to `decode`.
    pub fn reloc_count(&self) -> u32 {
        self.reloc_count
    }
}

/// Little-endian word at `pos`. A missing high byte reads as zero.
fn read_u16le(input: &[u8], pos: &mut usize) -> u16 {
    let lo = input.get(*pos).copied().unwrap_or(0);
    let hi = input.get(*pos + 1).copied().unwrap_or(0);
    *pos += 2;
    u16::from_le_bytes([lo, hi])
}

impl Decoder for ExepackRelocDecoder {
    fn name(&self) -> &'static str {
        "exepack"
    }

    fn decode(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<Option<u64>> {
        self.reloc_count = 0;
        let mut pos = 0usize;

        for seg in 0..EXEPACK_SEGMENTS {
            let segment = (seg * 0x1000) as u16;
            if pos >= input.len() {
                debug!("exepack: table ends before segment {segment:#06x}");
                return Err(DecodeError::Generic);
            }
            let count = read_u16le(input, &mut pos);
            trace!("exepack: segment {segment:#06x}: {count} relocs");

            for _ in 0..count {
                if pos >= input.len() || self.reloc_count >= MAX_RELOCS {
                    debug!("exepack: bad relocation list in segment {segment:#06x}");
                    return Err(DecodeError::Generic);
                }
                let offset = read_u16le(input, &mut pos);
                out.write(&offset.to_le_bytes());
                out.write(&segment.to_le_bytes());
                self.reloc_count += 1;
                if out.is_full() {
                    return Ok(Some(pos.min(input.len()) as u64));
                }
            }
        }

        debug!("exepack: reloc count: {}", self.reloc_count);
        Ok(Some(pos.min(input.len()) as u64))
    }
}
