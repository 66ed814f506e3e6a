//! LZ77 history window shared by the LZSS family of codecs.
//!
//! [`Lz77Buffer`] is a power-of-two circular byte array plus a write cursor.
//! Every emitted byte is handed to a [`WindowSink`], stored at the cursor,
//! and the cursor advances (wrapping by mask). Because each byte is stored
//! before the next one is read, a copy may overlap the bytes it produces:
//! copying 5 bytes starting just behind the cursor repeats the last byte.
//!
//! Unlike a plain ring buffer, back-reference positions are absolute window
//! offsets, not distances, matching how LZSS streams address the window.

use crate::error::{DecodeError, Result};
use crate::output::Output;

/// Window sizes used by the supported codecs.
pub mod sizes {
    /// Classic LZSS / SZDD / Windows Help (4 KB).
    pub const LZSS: usize = 4096;
}

/// Destination for bytes produced from the window.
pub trait WindowSink {
    /// Accept one byte. Returning `false` asks the window to stop.
    fn put_byte(&mut self, byte: u8) -> bool;
}

impl WindowSink for Output<'_> {
    fn put_byte(&mut self, byte: u8) -> bool {
        self.write_byte(byte)
    }
}

impl WindowSink for Vec<u8> {
    fn put_byte(&mut self, byte: u8) -> bool {
        self.push(byte);
        true
    }
}

/// Circular LZ77 history.
#[derive(Debug, Clone)]
pub struct Lz77Buffer {
    buffer: Vec<u8>,
    mask: usize,
    curpos: usize,
    stopped: bool,
}

impl Lz77Buffer {
    /// Create a zero-filled window of `size` bytes.
    ///
    /// `size` must be a non-zero power of two.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || !size.is_power_of_two() {
            return Err(DecodeError::invalid_parameter(format!(
                "window size must be a power of 2, got {size}"
            )));
        }

        Ok(Self {
            buffer: vec![0; size],
            mask: size - 1,
            curpos: 0,
            stopped: false,
        })
    }

    /// Window size in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Current write position.
    pub fn curpos(&self) -> usize {
        self.curpos
    }

    /// Whether the sink has asked the window to stop.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Fill the window with `value` and move the cursor to 0.
    pub fn clear(&mut self, value: u8) {
        self.buffer.fill(value);
        self.curpos = 0;
    }

    /// Move the cursor (masked to the window).
    pub fn set_curpos(&mut self, pos: usize) {
        self.curpos = pos & self.mask;
    }

    /// Load the LArc "lz5" initial dictionary. Only meaningful for a 4 KB
    /// window.
    ///
    /// Layout: zeros; from offset 13, thirteen copies of each byte value
    /// 1..=255; an ascending ramp 0..=255; a descending ramp 255..=0; 128
    /// bytes left at zero; then 110 spaces.
    pub fn set_lz5_window(&mut self) {
        self.clear(0);

        let mut wpos = 13usize;
        for i in 1..=255u8 {
            for _ in 0..13 {
                self.buffer[wpos & self.mask] = i;
                wpos += 1;
            }
        }
        for i in 0..=255u8 {
            self.buffer[wpos & self.mask] = i;
            wpos += 1;
        }
        for i in (0..=255u8).rev() {
            self.buffer[wpos & self.mask] = i;
            wpos += 1;
        }
        wpos += 128;
        for _ in 0..110 {
            self.buffer[wpos & self.mask] = b' ';
            wpos += 1;
        }
    }

    /// Emit a literal byte: hand it to the sink, store it, advance.
    ///
    /// Does nothing once stopped. If the sink rejects the byte, the window
    /// enters the stopped state.
    #[inline]
    pub fn add_literal_byte<S: WindowSink + ?Sized>(&mut self, sink: &mut S, byte: u8) {
        if self.stopped {
            return;
        }
        if !sink.put_byte(byte) {
            self.stopped = true;
            return;
        }
        self.buffer[self.curpos] = byte;
        self.curpos = (self.curpos + 1) & self.mask;
    }

    /// Copy `count` bytes starting at window offset `start`.
    ///
    /// Bytes are copied one at a time, so the source may overlap the bytes
    /// being produced.
    pub fn copy_from_history<S: WindowSink + ?Sized>(
        &mut self,
        sink: &mut S,
        start: usize,
        count: usize,
    ) {
        for i in 0..count {
            if self.stopped {
                break;
            }
            let byte = self.buffer[start.wrapping_add(i) & self.mask];
            self.add_literal_byte(sink, byte);
        }
    }

    /// Byte at window offset `pos` (masked).
    pub fn byte_at(&self, pos: usize) -> u8 {
        self.buffer[pos & self.mask]
    }
}
