//! Decompression method selector.

use retrodec_core::error::{CodecError, DecodeError};
use retrodec_core::filter::{Codec, Decoder, Layer, StoredCodec};
use retrodec_fax::{FaxConfig, FaxDecoder};
use retrodec_huff::{FixedHuffmanDecoder, SqueezeDecoder, StuffItHuffmanDecoder};
use retrodec_lzss::{HlpLz77Decoder, LzssConfig, LzssDecoder};
use retrodec_lzw::{DskLzwConfig, DskLzwDecoder, LzwConfig, LzwDecoder};
use retrodec_rle::{ExepackRelocDecoder, PackBitsConfig, PackBitsDecoder, Rle90Decoder};

/// A decompression method together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// No compression.
    #[default]
    Stored,
    /// RLE90 (0x90 escape).
    Rle90,
    /// PackBits with 1- or 2-byte units.
    PackBits(PackBitsConfig),
    /// LZSS with a 4 KB window (Okumura, SZDD, LArc lz5).
    Lzss(LzssConfig),
    /// Windows Help LZ77.
    HlpLz77,
    /// Squeeze Huffman coding, without the RLE90 layer.
    Squeeze,
    /// StuffIt method 3, a self-describing Huffman tree.
    StuffItHuffman,
    /// StuffIt method 6, the fixed Huffman codebook with PackBits relay.
    FixedHuffman,
    /// Unix `compress` LZW.
    Lzw(LzwConfig),
    /// IBM DSK diskette image LZW.
    DskLzw(DskLzwConfig),
    /// EXEPACK packed relocation table.
    ExepackRelocs,
    /// CCITT fax.
    Fax(FaxConfig),
}

impl Method {
    /// Get the method name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Rle90 => "rle90",
            Self::PackBits(_) => "packbits",
            Self::Lzss(_) => "lzss1",
            Self::HlpLz77 => "hlp_lz77",
            Self::Squeeze => "unsqueeze",
            Self::StuffItHuffman => "huffman",
            Self::FixedHuffman => "fixedhuffman",
            Self::Lzw(_) => "lzw",
            Self::DskLzw(_) => "dskdcmprs",
            Self::ExepackRelocs => "exepack",
            Self::Fax(_) => "fax_decode",
        }
    }

    /// Whether the method can decode input fed in arbitrary chunks.
    pub fn is_pushable(&self) -> bool {
        matches!(self, Self::Stored | Self::Rle90 | Self::PackBits(_))
    }

    /// Instantiate a pushable codec, or `None` for whole-input methods.
    pub fn pushable(&self) -> Option<Box<dyn Codec>> {
        match *self {
            Self::Stored => Some(Box::new(StoredCodec::new())),
            Self::Rle90 => Some(Box::new(Rle90Decoder::new())),
            Self::PackBits(config) => Some(Box::new(PackBitsDecoder::new(config))),
            _ => None,
        }
    }

    /// Instantiate a whole-input decoder, or `None` for pushable methods.
    pub fn direct(&self) -> Result<Option<Box<dyn Decoder>>, CodecError> {
        let decoder: Box<dyn Decoder> = match *self {
            Self::Stored | Self::Rle90 | Self::PackBits(_) => return Ok(None),
            Self::Lzss(config) => Box::new(LzssDecoder::new(config)),
            Self::HlpLz77 => Box::new(HlpLz77Decoder::new()),
            Self::Squeeze => Box::new(SqueezeDecoder::new()),
            Self::StuffItHuffman => Box::new(StuffItHuffmanDecoder::new()),
            Self::FixedHuffman => Box::new(FixedHuffmanDecoder::new()),
            Self::Lzw(config) => {
                Box::new(LzwDecoder::new(config).map_err(|e| CodecError::new(self.name(), e))?)
            }
            Self::DskLzw(config) => Box::new(
                DskLzwDecoder::new(config).map_err(|e| CodecError::new(self.name(), e))?,
            ),
            Self::ExepackRelocs => Box::new(ExepackRelocDecoder::new()),
            Self::Fax(config) => Box::new(FaxDecoder::new(config)),
        };
        Ok(Some(decoder))
    }

    /// Instantiate the codec as the first layer of a chain.
    pub fn layer(&self) -> Result<Layer, CodecError> {
        if let Some(codec) = self.pushable() {
            return Ok(Layer::Pushable(codec));
        }
        match self.direct()? {
            Some(decoder) => Ok(Layer::Direct(decoder)),
            None => Err(CodecError::new(self.name(), DecodeError::Generic)),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lzw(config) => write!(f, "lzw({} bits)", config.max_bits),
            Self::Fax(config) => write!(f, "fax(TIFF {})", config.compression.tiff_value()),
            _ => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrodec_fax::FaxCompression;

    fn all_methods() -> Vec<Method> {
        vec![
            Method::Stored,
            Method::Rle90,
            Method::PackBits(PackBitsConfig::PACKBITS16),
            Method::Lzss(LzssConfig::SZDD),
            Method::HlpLz77,
            Method::Squeeze,
            Method::StuffItHuffman,
            Method::FixedHuffman,
            Method::Lzw(LzwConfig::STUFFIT),
            Method::DskLzw(DskLzwConfig::DSK),
            Method::ExepackRelocs,
            Method::Fax(FaxConfig::new(8, 8, FaxCompression::Group4)),
        ]
    }

    #[test]
    fn test_names_match_codecs() {
        for method in all_methods() {
            let layer = method.layer().unwrap();
            assert_eq!(layer.name(), method.name(), "{method:?}");
        }
    }

    #[test]
    fn test_pushable_split() {
        for method in all_methods() {
            assert_eq!(method.pushable().is_some(), method.is_pushable());
            assert_eq!(method.direct().unwrap().is_some(), !method.is_pushable());
        }
    }

    #[test]
    fn test_bad_lzw_config() {
        let err = Method::Lzw(LzwConfig::new(8, true)).direct().err().unwrap();
        assert_eq!(err.codec, "lzw");
        assert!(matches!(err.source, DecodeError::InvalidParameter { .. }));

        let err = Method::DskLzw(DskLzwConfig::new(257)).direct().err().unwrap();
        assert_eq!(err.codec, "dskdcmprs");
    }

    #[test]
    fn test_display() {
        assert_eq!(Method::default().to_string(), "stored");
        assert_eq!(Method::Lzw(LzwConfig::COMPRESS).to_string(), "lzw(16 bits)");
        let fax = Method::Fax(FaxConfig::new(1728, 1, FaxCompression::Group3));
        assert_eq!(fax.to_string(), "fax(TIFF 3)");
        assert_eq!(Method::ExepackRelocs.to_string(), "exepack");
    }
}
