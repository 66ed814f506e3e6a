//! Streaming ("pushable") decompression filters.
//!
//! A decompression codec comes in one of two shapes:
//!
//! - [`Codec`]: a push-model state machine. The caller feeds input in any
//!   number of chunks, then calls finish. Pushable codecs can be chained:
//!   the output of one becomes the input of another without an intermediate
//!   buffer.
//! - [`Decoder`]: needs the whole compressed span at once (typical for
//!   bit-oriented codecs that would be awkward to suspend mid-code).
//!
//! [`Filter`] drives a [`Codec`], tracking the finished flag and the
//! [`DecompressResult`]. [`decompress_oneshot`], [`run_decoder`] and
//! [`decompress_two_layer`] are the usual entry points.
//!
//! ```text
//!   input ──► first layer ──► relay sink ──► Filter(second) ──► Output
//! ```

use crate::error::{DecodeError, Result};
use crate::output::{Output, Sink};
use crate::result::DecompressResult;
use log::{debug, trace};

/// Status reported by a pushable codec after consuming a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressStatus {
    /// The codec can accept more input.
    NeedsInput,
    /// The codec will not consume any more input (e.g. the expected output
    /// length has been reached).
    Done,
}

/// Commands understood by [`Filter::command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Reset the low-level decompression state, keeping counters.
    SoftReset,
    /// Reset everything so the codec can decode a new, independent stream.
    Reinitialize,
}

/// A push-model decompression codec.
pub trait Codec {
    /// Short name used to attribute errors, e.g. `"packbits"`.
    fn name(&self) -> &'static str;

    /// Consume a chunk of compressed input.
    fn add_buf(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<DecompressStatus>;

    /// No more input is coming. Flush pending output and return the exact
    /// number of input bytes consumed, if known.
    fn finish(&mut self, out: &mut Output<'_>) -> Result<Option<u64>>;

    /// Handle a command. Codecs that keep no state may ignore it.
    fn command(&mut self, _cmd: Command) {}
}

/// A codec that decodes a complete compressed span in one call.
pub trait Decoder {
    /// Short name used to attribute errors, e.g. `"lzss1"`.
    fn name(&self) -> &'static str;

    /// Decode `input` into `out`. Returns the exact number of input bytes
    /// consumed, if known.
    fn decode(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<Option<u64>>;
}

/// Push-model driver around a [`Codec`].
pub struct Filter<'o> {
    codec: Box<dyn Codec + 'o>,
    output: Output<'o>,
    result: DecompressResult,
    finished: bool,
}

impl<'o> Filter<'o> {
    /// Create a filter that decodes into `output`.
    pub fn new(codec: Box<dyn Codec + 'o>, output: Output<'o>) -> Self {
        trace!("creating filter for codec {}", codec.name());
        Self {
            codec,
            output,
            result: DecompressResult::new(),
            finished: false,
        }
    }

    /// Feed a chunk of compressed data.
    ///
    /// Ignored once the filter is finished (because of an error, or because
    /// the codec needs no more input).
    pub fn feed(&mut self, buf: &[u8]) {
        if self.finished || buf.is_empty() {
            return;
        }

        match self.codec.add_buf(buf, &mut self.output) {
            Ok(DecompressStatus::NeedsInput) => {}
            Ok(DecompressStatus::Done) => self.finished = true,
            Err(err) => {
                self.result.set_error(self.codec.name(), err);
                self.finished = true;
            }
        }
    }

    /// Send a command to the codec.
    ///
    /// [`Command::Reinitialize`] also clears the finished flag, forgets the
    /// previous consumption count and restarts the output byte counter, so
    /// the filter can be reused for the next member of an archive. Errors
    /// are not cleared; use [`Filter::result_mut`] for that.
    pub fn command(&mut self, cmd: Command) {
        if cmd == Command::Reinitialize {
            self.finished = false;
            self.result.invalidate_bytes_consumed();
            self.output.reset_count();
        }
        self.codec.command(cmd);
    }

    /// Tell the codec there is no more input.
    pub fn finish(&mut self) {
        match self.codec.finish(&mut self.output) {
            Ok(Some(n)) => self.result.set_bytes_consumed(n),
            Ok(None) => {}
            Err(err) => self.result.set_error(self.codec.name(), err),
        }
    }

    /// Whether the filter ignores further input.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The result accumulated so far.
    pub fn result(&self) -> &DecompressResult {
        &self.result
    }

    /// Mutable access to the result (e.g. to clear handled errors before
    /// reinitializing).
    pub fn result_mut(&mut self) -> &mut DecompressResult {
        &mut self.result
    }

    /// The output this filter writes to.
    pub fn output(&self) -> &Output<'o> {
        &self.output
    }

    /// Mutable access to the output (e.g. to change the expected length
    /// before reinitializing).
    pub fn output_mut(&mut self) -> &mut Output<'o> {
        &mut self.output
    }

    /// Drop the filter and keep its result.
    pub fn into_result(self) -> DecompressResult {
        self.result
    }
}

impl std::fmt::Debug for Filter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("codec", &self.codec.name())
            .field("output", &self.output)
            .field("result", &self.result)
            .field("finished", &self.finished)
            .finish()
    }
}

/// Use a pushable codec in a non-pushable way: feed all of `input`, finish.
pub fn decompress_oneshot<'o>(
    codec: Box<dyn Codec + 'o>,
    input: &[u8],
    output: Output<'o>,
) -> DecompressResult {
    let mut filter = Filter::new(codec, output);
    filter.feed(input);
    filter.finish();
    filter.into_result()
}

/// Run a whole-input decoder and collect its result.
pub fn run_decoder(
    decoder: &mut dyn Decoder,
    input: &[u8],
    output: &mut Output<'_>,
) -> DecompressResult {
    let mut result = DecompressResult::new();
    match decoder.decode(input, output) {
        Ok(Some(n)) => result.set_bytes_consumed(n),
        Ok(None) => {}
        Err(err) => result.set_error(decoder.name(), err),
    }
    result
}

/// The first codec of a two-layer chain.
pub enum Layer {
    /// A pushable codec, run through [`decompress_oneshot`].
    Pushable(Box<dyn Codec>),
    /// A whole-input decoder, run directly.
    Direct(Box<dyn Decoder>),
}

impl Layer {
    /// Name of the wrapped codec.
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Pushable(codec) => codec.name(),
            Layer::Direct(decoder) => decoder.name(),
        }
    }
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::Pushable(codec) => write!(f, "Pushable({})", codec.name()),
            Layer::Direct(decoder) => write!(f, "Direct({})", decoder.name()),
        }
    }
}

/// Parameters for [`decompress_two_layer`].
///
/// `first` is applied first during decompression (i.e. it undoes the *last*
/// compression step).
pub struct TwoLayer {
    /// First decompression layer.
    pub first: Layer,
    /// Second (final) decompression layer. Must be pushable.
    pub second: Box<dyn Codec>,
    /// Expected size of the intermediate data, if known.
    pub intermediate_len: Option<u64>,
}

impl std::fmt::Debug for TwoLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwoLayer")
            .field("first", &self.first)
            .field("second", &self.second.name())
            .field("intermediate_len", &self.intermediate_len)
            .finish()
    }
}

/// Sink that forwards everything into a second filter.
struct Relay<'a, 'o> {
    filter: &'a mut Filter<'o>,
    nbytes: u64,
}

impl Sink for Relay<'_, '_> {
    fn write(&mut self, buf: &[u8]) {
        self.filter.feed(buf);
        self.nbytes += buf.len() as u64;
    }
}

/// Decompress data that was compressed with two methods in sequence.
///
/// The returned result carries the first layer's consumption count. An error
/// in the first layer always wins; otherwise an error from the second layer
/// is reported.
pub fn decompress_two_layer(params: TwoLayer, input: &[u8], output: Output<'_>) -> DecompressResult {
    let TwoLayer {
        first,
        second,
        intermediate_len,
    } = params;

    let mut second = Filter::new(second, output);
    let mut relay = Relay {
        filter: &mut second,
        nbytes: 0,
    };

    let mut result = {
        let mut relay_out = Output::new(&mut relay);
        relay_out.set_expected_len(intermediate_len);
        match first {
            Layer::Pushable(codec) => decompress_oneshot(codec, input, relay_out),
            Layer::Direct(mut decoder) => run_decoder(decoder.as_mut(), input, &mut relay_out),
        }
    };
    let intermediate_nbytes = relay.nbytes;

    second.finish();

    if result.has_error() {
        return result;
    }
    debug!("size after intermediate decompression: {intermediate_nbytes}");

    result.transfer_error_from(second.result());
    result
}

/// Trivial codec that copies its input, used where a container stores data
/// uncompressed but the caller wants a uniform interface.
#[derive(Debug, Default, Clone)]
pub struct StoredCodec {
    total_in: u64,
}

impl StoredCodec {
    /// Create a pass-through codec.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Codec for StoredCodec {
    fn name(&self) -> &'static str {
        "stored"
    }

    fn add_buf(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<DecompressStatus> {
        let n = out.write(input);
        self.total_in += n as u64;
        if n < input.len() || out.is_full() {
            return Ok(DecompressStatus::Done);
        }
        Ok(DecompressStatus::NeedsInput)
    }

    fn finish(&mut self, _out: &mut Output<'_>) -> Result<Option<u64>> {
        Ok(Some(self.total_in))
    }

    fn command(&mut self, cmd: Command) {
        if cmd == Command::Reinitialize {
            self.total_in = 0;
        }
    }
}

/// Codec that fails on the first chunk. Handy for exercising error paths.
#[derive(Debug, Clone)]
pub struct FailingCodec {
    name: &'static str,
    error: DecodeError,
}

impl FailingCodec {
    /// Create a codec named `name` that reports `error`.
    pub fn new(name: &'static str, error: DecodeError) -> Self {
        Self { name, error }
    }
}

impl Codec for FailingCodec {
    fn name(&self) -> &'static str {
        self.name
    }

    fn add_buf(&mut self, _input: &[u8], _out: &mut Output<'_>) -> Result<DecompressStatus> {
        Err(self.error.clone())
    }

    fn finish(&mut self, _out: &mut Output<'_>) -> Result<Option<u64>> {
        Err(self.error.clone())
    }
}
