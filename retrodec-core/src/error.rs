//! Error types for retrodec operations.
//!
//! Two layers are used:
//!
//! - [`DecodeError`] describes *what* went wrong inside a codec. Codec
//!   internals return `Result<T, DecodeError>` and propagate with `?`.
//! - [`CodecError`] attaches the name of the codec that failed. This is what
//!   ends up in a [`DecompressResult`](crate::result::DecompressResult) and
//!   what callers show to users, rendered as `[codec] message`.

use thiserror::Error;

/// The main error type for codec internals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A Huffman codebook could not be built: prefix conflict, code too long,
    /// cyclic or too-deep tree description.
    #[error("Malformed Huffman codebook: {message}")]
    MalformedCodebook {
        /// Description of the problem.
        message: String,
    },

    /// The bit or byte reader ran out before a value, row or member was
    /// complete.
    #[error("Unexpected end of compressed data")]
    UnexpectedEof,

    /// A bit pattern matched no valid code.
    #[error("Huffman decode error")]
    HuffmanDecode,

    /// Corrupted or inconsistent compressed data.
    #[error("{message}")]
    InvalidData {
        /// Description of the corruption.
        message: String,
    },

    /// A parameter or configuration value is out of range.
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the bad parameter.
        message: String,
    },

    /// The input uses a feature this decoder does not implement.
    #[error("{feature} is not supported")]
    Unsupported {
        /// The unsupported feature.
        feature: String,
    },

    /// Failure without a more specific description.
    #[error("Unspecified error")]
    Generic,
}

/// Result type alias for codec internals.
pub type Result<T> = std::result::Result<T, DecodeError>;

impl DecodeError {
    /// Create a malformed codebook error.
    pub fn malformed_codebook(message: impl Into<String>) -> Self {
        Self::MalformedCodebook {
            message: message.into(),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create an unsupported feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
        }
    }

    /// Whether this error only means the input ran out.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::UnexpectedEof)
    }
}

/// A [`DecodeError`] attributed to the codec that reported it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{codec}] {source}")]
pub struct CodecError {
    /// Short codec name, e.g. `"unsqueeze"` or `"fax_decode"`.
    pub codec: &'static str,
    /// The underlying error.
    pub source: DecodeError,
}

impl CodecError {
    /// Attribute `source` to `codec`.
    pub fn new(codec: &'static str, source: DecodeError) -> Self {
        Self { codec, source }
    }
}
