//! The decompression result record.
//!
//! Every decompression operation reports into a [`DecompressResult`]. Only the
//! first error is kept: later reports are symptoms of the first one and are
//! discarded.

use crate::error::{CodecError, DecodeError};

/// Outcome of one decompression operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecompressResult {
    error: Option<CodecError>,
    bytes_consumed: Option<u64>,
}

impl DecompressResult {
    /// Create an empty (successful) result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the initial state.
    pub fn clear(&mut self) {
        self.error = None;
        self.bytes_consumed = None;
    }

    /// Record an error for `codec`. Ignored if an error is already recorded.
    pub fn set_error(&mut self, codec: &'static str, source: DecodeError) {
        if self.error.is_none() {
            self.error = Some(CodecError::new(codec, source));
        }
    }

    /// Record an already attributed error. Ignored if an error is already
    /// recorded.
    pub fn set_codec_error(&mut self, err: CodecError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Record an unspecified failure for `codec`.
    pub fn set_generic_error(&mut self, codec: &'static str) {
        self.set_error(codec, DecodeError::Generic);
    }

    /// Copy the error of `src` into `self` if `src` has one and `self` does not.
    pub fn transfer_error_from(&mut self, src: &DecompressResult) {
        if let Some(err) = &src.error {
            self.set_codec_error(err.clone());
        }
    }

    /// Whether an error has been recorded.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The recorded error, if any.
    pub fn error(&self) -> Option<&CodecError> {
        self.error.as_ref()
    }

    /// Human-readable error message, or `"No error"`.
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(err) => err.to_string(),
            None => "No error".to_string(),
        }
    }

    /// Exact number of input bytes consumed, if the codec tracks it.
    pub fn bytes_consumed(&self) -> Option<u64> {
        self.bytes_consumed
    }

    /// Record the number of input bytes consumed.
    pub fn set_bytes_consumed(&mut self, n: u64) {
        self.bytes_consumed = Some(n);
    }

    /// Forget any previously recorded consumption count.
    pub fn invalidate_bytes_consumed(&mut self) {
        self.bytes_consumed = None;
    }

    /// Convert into a `Result`, yielding the consumption count on success.
    pub fn into_result(self) -> std::result::Result<Option<u64>, CodecError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.bytes_consumed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_wins() {
        let mut res = DecompressResult::new();
        assert_eq!(res.error_message(), "No error");

        res.set_error("first", DecodeError::UnexpectedEof);
        res.set_error("second", DecodeError::HuffmanDecode);

        let err = res.error().unwrap();
        assert_eq!(err.codec, "first");
        assert_eq!(err.source, DecodeError::UnexpectedEof);
        assert_eq!(
            res.error_message(),
            "[first] Unexpected end of compressed data"
        );
    }

    #[test]
    fn test_transfer_error() {
        let mut upstream = DecompressResult::new();
        let mut downstream = DecompressResult::new();
        downstream.set_generic_error("packbits");

        upstream.transfer_error_from(&downstream);
        assert_eq!(upstream.error().unwrap().codec, "packbits");

        let mut other = DecompressResult::new();
        other.set_error("other", DecodeError::HuffmanDecode);
        upstream.transfer_error_from(&other);
        assert_eq!(upstream.error().unwrap().codec, "packbits");
    }

    #[test]
    fn test_bytes_consumed() {
        let mut res = DecompressResult::new();
        assert_eq!(res.bytes_consumed(), None);
        res.set_bytes_consumed(42);
        assert_eq!(res.bytes_consumed(), Some(42));
        res.invalidate_bytes_consumed();
        assert_eq!(res.bytes_consumed(), None);

        res.set_bytes_consumed(7);
        assert_eq!(res.into_result(), Ok(Some(7)));
    }

    #[test]
    fn test_clear() {
        let mut res = DecompressResult::new();
        res.set_generic_error("x");
        res.set_bytes_consumed(1);
        res.clear();
        assert!(!res.has_error());
        assert_eq!(res.bytes_consumed(), None);
    }
}
