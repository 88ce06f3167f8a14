//! Decoding orchestrator (`C8`): wires C5-C7 together for a single parse
//! attempt, then retries mirrored on failure, always surfacing the
//! straight-pass error if both attempts fail.

use crate::bits::matrix::BitMatrix;
use crate::error::Result;
use crate::gf::field::well_known::qr_256;
use crate::hints::Hints;
use crate::qr::data_block::get_data_blocks;
use crate::qr::matrix_parser::QrMatrixParser;
use crate::qr::{bitstream_decoder, version::EcLevel};
use crate::result::{DecoderResult, MirrorMetadata};
use crate::rs::ReedSolomonDecoder;

/// Decodes a single (already upright, not-yet-known-mirrored) QR module
/// matrix into a [`DecoderResult`].
///
/// This is the one-shot inner decode the orchestrator below calls twice
/// (straight, then on a transposed copy): it performs the full C5-C7
/// pipeline and does not itself retry anything.
fn decode_one_pass(matrix: &BitMatrix, hints: &Hints) -> Result<DecoderResult> {
    let parser = QrMatrixParser::new(matrix.clone())?;
    let format_info = parser.read_format_information()?;
    let raw_codewords = parser.read_codewords(format_info.data_mask)?;

    let version = parser.version();
    let blocks = get_data_blocks(&raw_codewords, version, format_info.ec_level)?;

    let rs_decoder = ReedSolomonDecoder::new(qr_256());
    let mut total_errors_corrected = 0usize;
    let mut data_bytes = Vec::new();

    for block in &blocks {
        let mut codewords: Vec<u32> = block.codewords.iter().map(|&b| b as u32).collect();
        let ec_count = codewords.len() - block.num_data_codewords;
        let before = codewords.clone();
        rs_decoder.decode(&mut codewords, ec_count)?;
        total_errors_corrected += before.iter().zip(codewords.iter()).filter(|(a, b)| a != b).count();
        data_bytes.extend(codewords[..block.num_data_codewords].iter().map(|&w| w as u8));
    }

    let content = bitstream_decoder::decode(&data_bytes, version.version_number, hints)?;

    Ok(DecoderResult {
        raw_bytes: content.raw_bytes,
        text: content.text,
        byte_segments: content.byte_segments,
        character_set: content.character_set,
        ec_level: format_info.ec_level,
        errors_corrected: total_errors_corrected,
        erasures: 0,
        structured_append_sequence_number: content.structured_append_sequence_number,
        structured_append_parity: content.structured_append_parity,
        other: None,
    })
}

/// Decodes `matrix`, trying a straight read first and a mirrored
/// (transposed) read if the straight read fails.
///
/// Per the mirror-retry contract: the error surfaced when both passes fail
/// is always the straight pass's error, never the mirrored probe's.
pub fn decode(matrix: &BitMatrix, hints: &Hints) -> Result<DecoderResult> {
    let straight_error = match decode_one_pass(matrix, hints) {
        Ok(result) => {
            log::debug!("decoded {}x{} QR matrix on the straight pass", matrix.width(), matrix.height());
            return Ok(result);
        }
        Err(e) => e,
    };
    log::debug!("straight pass failed ({straight_error}), considering mirrored retry");

    if hints.skip_mirror_retry {
        return Err(straight_error);
    }

    let transposed = match matrix.transpose() {
        Ok(t) => t,
        Err(_) => return Err(straight_error),
    };

    match decode_one_pass(&transposed, hints) {
        Ok(mut result) => {
            log::debug!("decoded {}x{} QR matrix on the mirrored retry", matrix.width(), matrix.height());
            result.other = Some(MirrorMetadata { mirrored: true });
            Ok(result)
        }
        Err(mirrored_error) => {
            log::debug!("mirrored retry also failed ({mirrored_error}), surfacing the straight-pass error");
            Err(straight_error)
        }
    }
}
