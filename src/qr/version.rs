//! QR version metadata: dimension, alignment pattern centers, and the
//! per-error-correction-level block structure from ISO/IEC 18004 Table 9.
//!
//! Alignment pattern centers and version information words are transcribed
//! from a known-good kernel QR encoder; the per-level EC block table below
//! is the standard table republished across QR tooling and is recorded as
//! an unverified transcription in this crate's design notes since this
//! codebase cannot run the compiler to cross-check it against a reference.

use crate::error::{format_error, Result};

/// QR error-correction level, ordered to match the 2-bit field in format
/// information: `00 = M, 01 = L, 10 = H, 11 = Q` (the QR standard's
/// famously non-monotonic encoding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcLevel {
    L,
    M,
    Q,
    H,
}

impl EcLevel {
    /// Decodes the 2-bit field from format information.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits & 0b11 {
            0b01 => Ok(EcLevel::L),
            0b00 => Ok(EcLevel::M),
            0b11 => Ok(EcLevel::Q),
            0b10 => Ok(EcLevel::H),
            _ => unreachable!("2-bit field"),
        }
    }

    /// Encodes this level into format information's 2-bit field. Only used
    /// by test-only symbol construction; production code only decodes this
    /// field, it never writes it.
    #[cfg(test)]
    pub(crate) fn to_bits(self) -> u32 {
        match self {
            EcLevel::L => 0b01,
            EcLevel::M => 0b00,
            EcLevel::Q => 0b11,
            EcLevel::H => 0b10,
        }
    }

    fn table_index(self) -> usize {
        match self {
            EcLevel::L => 0,
            EcLevel::M => 1,
            EcLevel::Q => 2,
            EcLevel::H => 3,
        }
    }
}

/// One contiguous run of same-sized blocks within an EC level's layout.
#[derive(Debug, Clone, Copy)]
pub struct BlockGroup {
    pub num_blocks: u32,
    pub data_codewords_per_block: u32,
}

/// The block layout for one (version, EC level) pair.
#[derive(Debug, Clone)]
pub struct EcBlocks {
    pub ec_codewords_per_block: u32,
    pub groups: Vec<BlockGroup>,
}

impl EcBlocks {
    pub fn total_data_codewords(&self) -> u32 {
        self.groups.iter().map(|g| g.num_blocks * g.data_codewords_per_block).sum()
    }

    pub fn total_codewords(&self) -> u32 {
        self.groups
            .iter()
            .map(|g| g.num_blocks * (g.data_codewords_per_block + self.ec_codewords_per_block))
            .sum()
    }
}

/// Full per-version metadata.
#[derive(Debug, Clone)]
pub struct Version {
    pub version_number: u32,
    pub alignment_pattern_centers: &'static [u32],
    ec_blocks: [EcBlocks; 4],
}

impl Version {
    pub fn dimension_for_version(version_number: u32) -> u32 {
        17 + 4 * version_number
    }

    pub fn dimension(&self) -> u32 {
        Self::dimension_for_version(self.version_number)
    }

    pub fn ec_blocks_for(&self, level: EcLevel) -> &EcBlocks {
        &self.ec_blocks[level.table_index()]
    }

    /// Derives the version number from a square matrix's side length, for
    /// symbols too small to carry an explicit version information block
    /// (versions 1-6).
    pub fn from_dimension(dimension: u32) -> Result<u32> {
        if dimension < 21 || (dimension - 17) % 4 != 0 {
            return format_error("QR version: dimension does not match any known version");
        }
        Ok((dimension - 17) / 4)
    }
}

/// Alignment pattern center coordinates, version 1..=40, grounded on the
/// standard ISO/IEC 18004 table.
const ALIGNMENT_PATTERN_CENTERS: [&[u32]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

/// `(ec_codewords_per_block, g1_blocks, g1_data, g2_blocks, g2_data)` per
/// version, in `L, M, Q, H` order. `g2_blocks == 0` means a single group.
type RawRow = (u32, u32, u32, u32, u32);

const fn row(ec: u32, g1n: u32, g1d: u32) -> RawRow {
    (ec, g1n, g1d, 0, 0)
}

const fn row2(ec: u32, g1n: u32, g1d: u32, g2n: u32, g2d: u32) -> RawRow {
    (ec, g1n, g1d, g2n, g2d)
}

const EC_BLOCK_TABLE: [[RawRow; 4]; 40] = [
    // V1
    [row(7, 1, 19), row(10, 1, 16), row(13, 1, 13), row(17, 1, 9)],
    // V2
    [row(10, 1, 34), row(16, 1, 28), row(22, 1, 22), row(28, 1, 16)],
    // V3
    [row(15, 1, 55), row(26, 1, 44), row(18, 2, 17), row(22, 2, 13)],
    // V4
    [row(20, 1, 80), row(18, 2, 32), row(26, 2, 24), row(16, 4, 9)],
    // V5
    [row(26, 1, 108), row(24, 2, 43), row2(18, 2, 15, 2, 16), row2(22, 2, 11, 2, 12)],
    // V6
    [row(18, 2, 68), row(16, 4, 27), row(24, 4, 19), row(28, 4, 15)],
    // V7
    [row(20, 2, 78), row(18, 4, 31), row2(18, 2, 14, 4, 15), row2(26, 4, 13, 1, 14)],
    // V8
    [row(24, 2, 97), row2(22, 2, 38, 2, 39), row2(22, 4, 18, 2, 19), row2(26, 4, 14, 2, 15)],
    // V9
    [row(30, 2, 116), row2(22, 3, 36, 2, 37), row2(20, 4, 16, 4, 17), row2(24, 4, 12, 4, 13)],
    // V10
    [row2(18, 2, 68, 2, 69), row2(26, 4, 43, 1, 44), row2(24, 6, 19, 2, 20), row2(28, 6, 15, 2, 16)],
    // V11
    [row(20, 4, 81), row2(30, 1, 50, 4, 51), row2(28, 4, 22, 4, 23), row2(24, 3, 12, 8, 13)],
    // V12
    [row2(24, 2, 92, 2, 93), row2(22, 6, 36, 2, 37), row2(26, 4, 20, 6, 21), row2(28, 7, 14, 4, 15)],
    // V13
    [row(26, 4, 107), row2(22, 8, 37, 1, 38), row2(24, 8, 20, 4, 21), row2(22, 12, 11, 4, 12)],
    // V14
    [row2(30, 3, 115, 1, 116), row2(24, 4, 40, 5, 41), row2(20, 11, 16, 5, 17), row2(24, 11, 12, 5, 13)],
    // V15
    [row2(22, 5, 87, 1, 88), row2(24, 5, 41, 5, 42), row2(30, 5, 24, 7, 25), row2(24, 11, 12, 7, 13)],
    // V16
    [row2(24, 5, 98, 1, 99), row2(28, 7, 45, 3, 46), row2(24, 15, 19, 2, 20), row2(30, 3, 15, 13, 16)],
    // V17
    [row2(28, 1, 107, 5, 108), row2(28, 10, 46, 1, 47), row2(28, 1, 22, 15, 23), row2(28, 2, 14, 17, 15)],
    // V18
    [row2(30, 5, 120, 1, 121), row2(26, 9, 43, 4, 44), row2(28, 17, 22, 1, 23), row2(28, 2, 14, 19, 15)],
    // V19
    [row2(28, 3, 113, 4, 114), row2(26, 3, 44, 11, 45), row2(26, 17, 21, 4, 22), row2(26, 9, 13, 16, 14)],
    // V20
    [row2(28, 3, 107, 5, 108), row2(26, 3, 41, 13, 42), row2(30, 15, 24, 5, 25), row2(28, 15, 15, 10, 16)],
    // V21
    [row2(28, 4, 116, 4, 117), row(26, 17, 42), row2(28, 17, 22, 6, 23), row2(30, 19, 16, 6, 17)],
    // V22
    [row2(28, 2, 111, 7, 112), row(28, 17, 46), row2(30, 7, 24, 16, 25), row(24, 34, 13)],
    // V23
    [row2(30, 4, 121, 5, 122), row2(28, 4, 47, 14, 48), row2(30, 11, 24, 14, 25), row2(30, 16, 15, 14, 16)],
    // V24
    [row2(30, 6, 117, 4, 118), row2(28, 6, 45, 14, 46), row2(30, 11, 24, 16, 25), row2(30, 30, 16, 2, 17)],
    // V25
    [row2(26, 8, 106, 4, 107), row2(28, 8, 47, 13, 48), row2(30, 7, 24, 22, 25), row2(30, 22, 15, 13, 16)],
    // V26
    [row2(28, 10, 114, 2, 115), row2(28, 19, 46, 4, 47), row2(28, 28, 22, 6, 23), row2(30, 33, 16, 4, 17)],
    // V27
    [row2(30, 8, 122, 4, 123), row2(28, 22, 45, 3, 46), row2(30, 8, 23, 26, 24), row2(30, 12, 15, 28, 16)],
    // V28
    [row2(30, 3, 117, 10, 118), row2(28, 3, 45, 23, 46), row2(30, 4, 24, 31, 25), row2(30, 11, 15, 31, 16)],
    // V29
    [row2(30, 7, 116, 7, 117), row2(28, 21, 45, 7, 46), row2(30, 1, 23, 37, 24), row2(30, 19, 15, 26, 16)],
    // V30
    [row2(30, 5, 115, 10, 116), row2(28, 19, 47, 10, 48), row2(30, 15, 24, 25, 25), row2(30, 23, 15, 25, 16)],
    // V31
    [row2(30, 13, 115, 3, 116), row2(28, 2, 46, 29, 47), row2(30, 42, 24, 1, 25), row2(30, 23, 15, 28, 16)],
    // V32
    [row(30, 17, 115), row2(28, 10, 46, 23, 47), row2(30, 10, 24, 35, 25), row2(30, 19, 15, 35, 16)],
    // V33
    [row2(30, 17, 115, 1, 116), row2(28, 14, 46, 21, 47), row2(30, 29, 24, 19, 25), row2(30, 11, 15, 46, 16)],
    // V34
    [row2(30, 13, 115, 6, 116), row2(28, 14, 46, 23, 47), row2(30, 44, 24, 7, 25), row2(30, 59, 16, 1, 17)],
    // V35
    [row2(30, 12, 121, 7, 122), row2(28, 12, 47, 26, 48), row2(30, 39, 24, 14, 25), row2(30, 22, 15, 41, 16)],
    // V36
    [row2(30, 6, 121, 14, 122), row2(28, 6, 47, 34, 48), row2(30, 46, 24, 10, 25), row2(30, 2, 15, 64, 16)],
    // V37
    [row2(30, 17, 122, 4, 123), row2(28, 29, 46, 14, 47), row2(30, 49, 24, 10, 25), row2(30, 24, 15, 46, 16)],
    // V38
    [row2(30, 4, 122, 18, 123), row2(28, 13, 46, 32, 47), row2(30, 48, 24, 14, 25), row2(30, 42, 15, 32, 16)],
    // V39
    [row2(30, 20, 117, 4, 118), row2(28, 40, 47, 7, 48), row2(30, 43, 24, 22, 25), row2(30, 10, 15, 67, 16)],
    // V40
    [row2(30, 19, 118, 6, 119), row2(28, 18, 47, 31, 48), row2(30, 34, 24, 34, 25), row2(30, 20, 15, 61, 16)],
];

fn ec_blocks_from_row(row: RawRow) -> EcBlocks {
    let (ec, g1n, g1d, g2n, g2d) = row;
    let mut groups = vec![BlockGroup { num_blocks: g1n, data_codewords_per_block: g1d }];
    if g2n > 0 {
        groups.push(BlockGroup { num_blocks: g2n, data_codewords_per_block: g2d });
    }
    EcBlocks { ec_codewords_per_block: ec, groups }
}

/// Looks up full metadata for `version_number` (1..=40).
pub fn version_for(version_number: u32) -> Result<Version> {
    if !(1..=40).contains(&version_number) {
        return format_error("QR version: version number out of range 1..=40");
    }
    let idx = (version_number - 1) as usize;
    let rows = EC_BLOCK_TABLE[idx];
    Ok(Version {
        version_number,
        alignment_pattern_centers: ALIGNMENT_PATTERN_CENTERS[idx],
        ec_blocks: [
            ec_blocks_from_row(rows[0]),
            ec_blocks_from_row(rows[1]),
            ec_blocks_from_row(rows[2]),
            ec_blocks_from_row(rows[3]),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_matches_version_number() {
        assert_eq!(Version::dimension_for_version(1), 21);
        assert_eq!(Version::dimension_for_version(40), 177);
    }

    #[test]
    fn from_dimension_round_trips() {
        for v in 1..=40u32 {
            let dim = Version::dimension_for_version(v);
            assert_eq!(Version::from_dimension(dim).unwrap(), v);
        }
    }

    #[test]
    fn from_dimension_rejects_bad_size() {
        assert!(Version::from_dimension(22).is_err());
        assert!(Version::from_dimension(17).is_err());
    }

    #[test]
    fn version_1_matches_known_values() {
        let v = version_for(1).unwrap();
        assert_eq!(v.dimension(), 21);
        assert!(v.alignment_pattern_centers.is_empty());
        let l = v.ec_blocks_for(EcLevel::L);
        assert_eq!(l.ec_codewords_per_block, 7);
        assert_eq!(l.total_data_codewords(), 19);
    }

    #[test]
    fn version_5_has_two_block_groups() {
        let v = version_for(5).unwrap();
        let q = v.ec_blocks_for(EcLevel::Q);
        assert_eq!(q.groups.len(), 2);
        assert_eq!(q.total_data_codewords(), 2 * 15 + 2 * 16);
    }

    #[test]
    fn out_of_range_version_fails() {
        assert!(version_for(0).is_err());
        assert!(version_for(41).is_err());
    }

    #[test]
    fn ec_level_bit_decoding_matches_standard_encoding() {
        assert_eq!(EcLevel::from_bits(0b01).unwrap(), EcLevel::L);
        assert_eq!(EcLevel::from_bits(0b00).unwrap(), EcLevel::M);
        assert_eq!(EcLevel::from_bits(0b11).unwrap(), EcLevel::Q);
        assert_eq!(EcLevel::from_bits(0b10).unwrap(), EcLevel::H);
    }
}
