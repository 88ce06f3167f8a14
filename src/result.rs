//! The public decode result type.

use crate::qr::charset::CharacterSet;
use crate::qr::version::EcLevel;

/// Out-of-band signals that don't fit the primary text/bytes payload.
#[derive(Debug, Clone, Default)]
pub struct MirrorMetadata {
    pub mirrored: bool,
}

/// Everything a successful decode recovers from a symbol.
#[derive(Debug, Clone)]
pub struct DecoderResult {
    pub raw_bytes: Vec<u8>,
    pub text: String,
    pub byte_segments: Vec<Vec<u8>>,
    pub character_set: CharacterSet,
    pub ec_level: EcLevel,
    pub errors_corrected: usize,
    pub erasures: usize,
    pub structured_append_sequence_number: Option<u8>,
    pub structured_append_parity: Option<u8>,
    pub other: Option<MirrorMetadata>,
}
