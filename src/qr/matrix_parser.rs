//! QR symbol matrix parsing (`C5`): version + format information read,
//! mask undo, and codeword extraction.
//!
//! State machine per parse, matching the orchestrator's expectations:
//! `INIT -> read_version -> read_format_information -> read_codewords ->
//! DONE`, with each step able to fail independently.

use crate::bits::matrix::BitMatrix;
use crate::error::{format_error, Result};
use crate::qr::format::{decode_format_info, mask_bit, FormatInfo};
use crate::qr::version::{version_for, Version};

/// Parses a single QR module matrix. Holds no mutable retry state of its
/// own — mirrored reads are handled by constructing a second parser over
/// `matrix.transpose()` (see `src/qr/decoder.rs`).
pub struct QrMatrixParser {
    matrix: BitMatrix,
    version: Version,
    function_pattern: BitMatrix,
}

impl QrMatrixParser {
    /// Builds a parser over `matrix`, determining the QR version either
    /// from the matrix dimension (versions 1-6) or from the two version
    /// information blocks (versions 7-40).
    pub fn new(matrix: BitMatrix) -> Result<Self> {
        if matrix.width() != matrix.height() {
            return format_error("QR matrix: must be square");
        }
        let dimension = matrix.width();
        let version_number = Self::read_version_number(&matrix, dimension)?;
        let version = version_for(version_number)?;
        let function_pattern = build_function_pattern(&version);

        Ok(QrMatrixParser { matrix, version, function_pattern })
    }

    /// The version determined at construction time.
    pub fn version(&self) -> &Version {
        &self.version
    }

    fn read_version_number(matrix: &BitMatrix, dimension: u32) -> Result<u32> {
        if dimension < 45 {
            return Version::from_dimension(dimension);
        }

        let top_right = read_version_block(matrix, dimension, true)?;
        let bottom_left = read_version_block(matrix, dimension, false)?;

        match (
            crate::qr::format::decode_version_info(top_right),
            crate::qr::format::decode_version_info(bottom_left),
        ) {
            (Ok(v), _) => Ok(v),
            (_, Ok(v)) => Ok(v),
            (Err(e), _) => Err(e),
        }
    }

    /// Reads and BCH-decodes the format information, trying the top-left
    /// copy first and falling back to the split top-right/bottom-left
    /// copy.
    pub fn read_format_information(&self) -> Result<FormatInfo> {
        let dimension = self.matrix.width();
        let copy1 = read_format_copy1(&self.matrix);
        if let Ok(info) = decode_format_info(copy1) {
            return Ok(info);
        }
        let copy2 = read_format_copy2(&self.matrix, dimension);
        decode_format_info(copy2)
    }

    /// Undoes the data mask and walks the matrix in the canonical
    /// right-to-left, two-column zigzag order, skipping function modules,
    /// to recover the raw codeword stream.
    pub fn read_codewords(&self, data_mask: u8) -> Result<Vec<u8>> {
        let dimension = self.matrix.width() as i64;
        let mut result = Vec::new();
        let mut current_byte = 0u8;
        let mut bits_read = 0u32;
        let mut reading_up = true;

        let mut x = dimension - 1;
        while x > 0 {
            if x == 6 {
                x -= 1; // the vertical timing column carries no data
            }
            for count in 0..dimension {
                let y = if reading_up { dimension - 1 - count } else { count } as u32;
                for col in 0..2i64 {
                    let xx = (x - col) as u32;
                    if self.function_pattern.get(xx, y) {
                        continue;
                    }
                    let mut bit = self.matrix.get(xx, y);
                    if mask_bit(data_mask, xx, y)? {
                        bit = !bit;
                    }
                    current_byte = (current_byte << 1) | (bit as u8);
                    bits_read += 1;
                    if bits_read == 8 {
                        result.push(current_byte);
                        bits_read = 0;
                        current_byte = 0;
                    }
                }
            }
            reading_up = !reading_up;
            x -= 2;
        }

        Ok(result)
    }
}

fn read_version_block(matrix: &BitMatrix, dimension: u32, top_right: bool) -> Result<u32> {
    let mut bits = 0u32;
    if top_right {
        for j in 0..6 {
            for i in (0..3).rev() {
                bits = (bits << 1) | matrix.get(dimension - 11 + i, j) as u32;
            }
        }
    } else {
        for i in 0..6 {
            for j in (0..3).rev() {
                bits = (bits << 1) | matrix.get(i, dimension - 11 + j) as u32;
            }
        }
    }
    Ok(bits)
}

fn read_format_copy1(matrix: &BitMatrix) -> u32 {
    let mut bits = 0u32;
    for x in 0..6 {
        bits = (bits << 1) | matrix.get(x, 8) as u32;
    }
    bits = (bits << 1) | matrix.get(7, 8) as u32;
    bits = (bits << 1) | matrix.get(8, 8) as u32;
    bits = (bits << 1) | matrix.get(8, 7) as u32;
    for j in (0..6).rev() {
        bits = (bits << 1) | matrix.get(8, j) as u32;
    }
    bits
}

fn read_format_copy2(matrix: &BitMatrix, dimension: u32) -> u32 {
    let mut bits = 0u32;
    for i in (dimension - 7..=dimension - 1).rev() {
        bits = (bits << 1) | matrix.get(8, i) as u32;
    }
    for j in dimension - 8..dimension {
        bits = (bits << 1) | matrix.get(j, 8) as u32;
    }
    bits
}

/// Builds a mask of function modules (finders, separators, timing,
/// alignment patterns, format/version strips, the permanent dark module)
/// for `version`'s dimension. True means "not part of the data region".
fn build_function_pattern(version: &Version) -> BitMatrix {
    let dim = version.dimension();
    let mut m = BitMatrix::square(dim);

    // Finder patterns + separators + format info strips around them.
    let _ = m.set_region(0, 0, 9, 9);
    let _ = m.set_region(dim - 8, 0, 8, 9);
    let _ = m.set_region(0, dim - 8, 9, 8);

    // Timing patterns.
    let _ = m.set_region(6, 9, 1, dim - 17);
    let _ = m.set_region(9, 6, dim - 17, 1);

    // Version info blocks (versions 7+).
    if version.version_number >= 7 {
        let _ = m.set_region(dim - 11, 0, 3, 6);
        let _ = m.set_region(0, dim - 11, 6, 3);
    }

    // Alignment patterns, skipping the three that would overlap a finder.
    let centers = version.alignment_pattern_centers;
    let max = centers.len();
    for (xi, &cx) in centers.iter().enumerate() {
        for (yi, &cy) in centers.iter().enumerate() {
            if (xi == 0 && (yi == 0 || yi == max - 1)) || (xi == max - 1 && yi == 0) {
                continue;
            }
            if cx >= 2 && cy >= 2 {
                let _ = m.set_region(cx - 2, cy - 2, 5, 5);
            }
        }
    }

    m
}

/// Exposes [`build_function_pattern`] to the test-only symbol builder,
/// which needs the same function-module mask the decoder uses in order to
/// know where data placement must skip.
#[cfg(test)]
pub(crate) fn build_function_pattern_for_test(version: &Version) -> BitMatrix {
    build_function_pattern(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_pattern_marks_finders() {
        let version = version_for(1).unwrap();
        let fp = build_function_pattern(&version);
        assert!(fp.get(0, 0));
        assert!(fp.get(8, 8));
        assert!(fp.get(dim_minus(1, 1), 0));
    }

    fn dim_minus(version_number: u32, n: u32) -> u32 {
        Version::dimension_for_version(version_number) - n
    }

    #[test]
    fn version_1_dimension_skips_version_blocks() {
        let version = version_for(1).unwrap();
        let fp = build_function_pattern(&version);
        // No version info block at this size; corner near (dim-11,0) should
        // not be universally set outside the finder's own 9x9 footprint.
        let dim = version.dimension();
        assert!(!fp.get(dim - 11, 5));
    }
}
