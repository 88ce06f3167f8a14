//! Data-block de-interleaver (`C6`): regroups the raw, interleaved
//! codeword stream read off the matrix into per-block `(data, EC)`
//! codeword arrays, in canonical block order (short blocks first).

use crate::error::{format_error, Result};
use crate::qr::version::{EcLevel, Version};

/// One Reed-Solomon block: `codewords[..num_data_codewords]` is payload,
/// the remainder is error-correction.
#[derive(Debug, Clone)]
pub struct DataBlock {
    pub num_data_codewords: usize,
    pub codewords: Vec<u8>,
}

/// De-interleaves `raw_codewords` (as read straight off the matrix) into
/// per-block arrays for `version` at `ec_level`.
///
/// Fails with `Format` if `raw_codewords` is shorter than the version's
/// declared total codeword count — a truncated or mis-sized codeword
/// stream is a structural inconsistency, not a correctable error.
pub fn get_data_blocks(raw_codewords: &[u8], version: &Version, ec_level: EcLevel) -> Result<Vec<DataBlock>> {
    let ec_blocks = version.ec_blocks_for(ec_level);
    let ec_per_block = ec_blocks.ec_codewords_per_block as usize;

    let mut blocks: Vec<DataBlock> = Vec::new();
    for group in &ec_blocks.groups {
        for _ in 0..group.num_blocks {
            let num_data = group.data_codewords_per_block as usize;
            blocks.push(DataBlock { num_data_codewords: num_data, codewords: vec![0u8; num_data + ec_per_block] });
        }
    }

    let total_codewords: usize = blocks.iter().map(|b| b.codewords.len()).sum();
    if raw_codewords.len() < total_codewords {
        return format_error("QR data blocks: raw codeword stream shorter than declared total");
    }

    let short_block_length = blocks.iter().map(|b| b.codewords.len()).min().unwrap_or(0);
    let num_data_codewords_short = short_block_length - ec_per_block;

    let mut offset = 0usize;

    // Phase 1: every block's shared-length data prefix, column-major.
    for i in 0..num_data_codewords_short {
        for block in blocks.iter_mut() {
            block.codewords[i] = raw_codewords[offset];
            offset += 1;
        }
    }

    // Phase 2: the one extra data codeword long blocks carry.
    for block in blocks.iter_mut() {
        if block.codewords.len() > short_block_length {
            block.codewords[num_data_codewords_short] = raw_codewords[offset];
            offset += 1;
        }
    }

    // Phase 3: error-correction codewords, column-major; short blocks read
    // one column "ahead" since they skipped the phase-2 slot.
    let max_len = blocks.iter().map(|b| b.codewords.len()).max().unwrap_or(0);
    for i in num_data_codewords_short..max_len {
        for block in blocks.iter_mut() {
            let index = if block.codewords.len() == max_len { i } else { i + 1 };
            if index < block.codewords.len() {
                block.codewords[index] = raw_codewords[offset];
                offset += 1;
            }
        }
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::version::version_for;

    #[test]
    fn single_group_equal_blocks_round_trip() {
        // Version 5, level M: 2 blocks of equal size (no long/short split).
        let version = version_for(5).unwrap();
        let ec_blocks = version.ec_blocks_for(EcLevel::M);
        let total: usize = ec_blocks.groups.iter().map(|g| (g.num_blocks * (g.data_codewords_per_block + ec_blocks.ec_codewords_per_block)) as usize).sum();
        let raw: Vec<u8> = (0..total as u32).map(|v| (v % 256) as u8).collect();

        let blocks = get_data_blocks(&raw, &version, EcLevel::M).unwrap();
        assert_eq!(blocks.len(), 2);
        let recombined_len: usize = blocks.iter().map(|b| b.codewords.len()).sum();
        assert_eq!(recombined_len, total);
    }

    #[test]
    fn short_blocks_precede_long_blocks_in_output_order() {
        // Version 5, level Q: group1 (2 blocks, 15 data) then group2 (2 blocks, 16 data).
        let version = version_for(5).unwrap();
        let ec_blocks = version.ec_blocks_for(EcLevel::Q);
        let total = ec_blocks.total_codewords() as usize;
        let raw = vec![0u8; total];

        let blocks = get_data_blocks(&raw, &version, EcLevel::Q).unwrap();
        assert_eq!(blocks[0].num_data_codewords, 15);
        assert_eq!(blocks[1].num_data_codewords, 15);
        assert_eq!(blocks[2].num_data_codewords, 16);
        assert_eq!(blocks[3].num_data_codewords, 16);
    }

    #[test]
    fn truncated_stream_fails() {
        let version = version_for(1).unwrap();
        let raw = vec![0u8; 3];
        assert!(get_data_blocks(&raw, &version, EcLevel::L).is_err());
    }

    #[test]
    fn block_sizes_sum_to_raw_stream_length() {
        for v in [1, 5, 7, 15, 27, 40] {
            let version = version_for(v).unwrap();
            for level in [EcLevel::L, EcLevel::M, EcLevel::Q, EcLevel::H] {
                let ec_blocks = version.ec_blocks_for(level);
                let total = ec_blocks.total_codewords() as usize;
                let raw = vec![0u8; total];
                let blocks = get_data_blocks(&raw, &version, level).unwrap();
                let sum: usize = blocks.iter().map(|b| b.codewords.len()).sum();
                assert_eq!(sum, total, "version {} level {:?}", v, level);
            }
        }
    }
}
