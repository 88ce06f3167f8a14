//! Shared algorithmic decoding core for 2D symbologies: bit containers,
//! `GF(2^m)`/prime-field arithmetic, Reed-Solomon decoding, and the
//! matrix-to-text decoding pipeline illustrated end-to-end via QR Code.
//!
//! Image acquisition, adaptive thresholding, and finder-pattern location are
//! out of scope: callers hand in an already-binarized [`bits::BitMatrix`]
//! and get back a [`result::DecoderResult`].

pub mod bits;
pub mod error;
pub mod gf;
pub mod hints;
pub mod pattern;
pub mod qr;
pub mod result;
pub mod rs;

pub use bits::BitMatrix;
pub use error::{DecodeError, Result};
pub use hints::Hints;
pub use qr::{EcLevel, FormatInfo};
pub use result::DecoderResult;

/// Decodes a single QR module matrix. A thin convenience wrapper over
/// [`qr::decode`] for callers who only care about the one symbology this
/// crate wires end-to-end.
pub fn decode(matrix: &BitMatrix, hints: &Hints) -> Result<DecoderResult> {
    qr::decode(matrix, hints)
}
