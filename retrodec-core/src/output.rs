//! Output side of a decompression request.
//!
//! A [`Sink`] is anything decoded bytes can be appended to. [`Output`] wraps a
//! sink with the bookkeeping every codec needs: a running byte count, an
//! optional expected length, and an optional write listener.
//!
//! # Expected length
//!
//! Many container formats declare the decompressed size, and many compressed
//! streams do not mark their own end. When an expected length is set, writes
//! are clipped to it and [`Output::is_full`] turns true once it is reached.
//! Codecs treat a full output as a normal stopping point, never as an error.

use std::fmt;

/// Append-only destination for decoded bytes.
pub trait Sink {
    /// Append `buf` to the sink.
    fn write(&mut self, buf: &[u8]);
}

impl Sink for Vec<u8> {
    fn write(&mut self, buf: &[u8]) {
        self.extend_from_slice(buf);
    }
}

/// A sink that hands every written range to a closure.
pub struct FnSink<F>(pub F);

impl<F: FnMut(&[u8])> Sink for FnSink<F> {
    fn write(&mut self, buf: &[u8]) {
        (self.0)(buf)
    }
}

impl<F> fmt::Debug for FnSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSink")
    }
}

const RUN_CHUNK: usize = 256;

/// A sink plus expected-length cap, byte counter and write listener.
pub struct Output<'o> {
    sink: &'o mut dyn Sink,
    expected_len: Option<u64>,
    nbytes_written: u64,
    listener: Option<Box<dyn FnMut(&[u8]) + 'o>>,
}

impl<'o> Output<'o> {
    /// Wrap `sink` with no expected length.
    pub fn new(sink: &'o mut dyn Sink) -> Self {
        Self {
            sink,
            expected_len: None,
            nbytes_written: 0,
            listener: None,
        }
    }

    /// Set the expected (maximum) output length.
    pub fn with_expected_len(mut self, len: u64) -> Self {
        self.expected_len = Some(len);
        self
    }

    /// Install a listener that sees every byte range actually written.
    ///
    /// Typically used to compute a running checksum.
    pub fn with_listener(mut self, listener: impl FnMut(&[u8]) + 'o) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Change the expected length.
    pub fn set_expected_len(&mut self, len: Option<u64>) {
        self.expected_len = len;
    }

    /// The expected length, if known.
    pub fn expected_len(&self) -> Option<u64> {
        self.expected_len
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> u64 {
        self.nbytes_written
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.nbytes_written == 0
    }

    /// Reset the byte counter (used when a codec is reinitialized).
    pub fn reset_count(&mut self) {
        self.nbytes_written = 0;
    }

    /// Bytes that may still be written, or `None` if unlimited.
    pub fn remaining(&self) -> Option<u64> {
        self.expected_len
            .map(|len| len.saturating_sub(self.nbytes_written))
    }

    /// Whether the expected length has been reached.
    pub fn is_full(&self) -> bool {
        self.remaining() == Some(0)
    }

    /// Write as much of `buf` as the expected length allows.
    ///
    /// Returns the number of bytes written.
    pub fn write(&mut self, buf: &[u8]) -> usize {
        let n = match self.remaining() {
            Some(rem) => buf.len().min(usize::try_from(rem).unwrap_or(usize::MAX)),
            None => buf.len(),
        };
        if n == 0 {
            return 0;
        }
        let data = &buf[..n];
        self.sink.write(data);
        if let Some(listener) = self.listener.as_mut() {
            listener(data);
        }
        self.nbytes_written += n as u64;
        n
    }

    /// Write one byte. Returns `false` if the output is already full.
    pub fn write_byte(&mut self, byte: u8) -> bool {
        self.write(&[byte]) == 1
    }

    /// Write `count` copies of `byte`, clipped to the expected length.
    ///
    /// Returns the number of bytes written.
    pub fn write_run(&mut self, byte: u8, count: u64) -> u64 {
        let chunk = [byte; RUN_CHUNK];
        let mut left = count;
        let mut written = 0;
        while left > 0 {
            let n = left.min(RUN_CHUNK as u64) as usize;
            let w = self.write(&chunk[..n]);
            written += w as u64;
            if w < n {
                break;
            }
            left -= n as u64;
        }
        written
    }
}

/// An output can feed a nested codec's output, so inner layers inherit the
/// outer expected length and listener.
impl Sink for Output<'_> {
    fn write(&mut self, buf: &[u8]) {
        Output::write(self, buf);
    }
}

impl fmt::Debug for Output<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("expected_len", &self.expected_len)
            .field("nbytes_written", &self.nbytes_written)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
