use crate::error::CodecError;

/// Core trait for nucleotide codecs.
///
/// Every output format implements the same contract:
/// 1.  `encode`: take ASCII nucleotide text and produce the compressed bytes.
/// 2.  `decode`: take compressed bytes and reproduce the uppercase ASCII text.
pub trait Codec {
    fn encode(&self, seq: &[u8]) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;
}
