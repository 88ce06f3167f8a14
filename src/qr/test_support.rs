//! Test-only QR symbol construction.
//!
//! This is fixture-building machinery for round-trip tests (encode a known
//! string, render its module matrix, feed it back through the real decode
//! path), not a public encoder: it is confined to `#[cfg(test)]` and reuses
//! the decoder's own Galois-field/Reed-Solomon/function-pattern code
//! rather than duplicating it.

use crate::bits::matrix::BitMatrix;
use crate::error::Result;
use crate::gf::field::well_known::qr_256;
use crate::gf::poly::GenericGfPoly;
use crate::qr::data_block::get_data_blocks;
use crate::qr::format::{encode_format_info, mask_bit};
use crate::qr::matrix_parser::build_function_pattern_for_test;
use crate::qr::version::{version_for, EcLevel};

const ALPHANUMERIC_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";
const MASK_PATTERN: u8 = 0;

fn alphanumeric_index(c: u8) -> usize {
    ALPHANUMERIC_ALPHABET.iter().position(|&a| a == c).expect("test input must be alphanumeric")
}

/// Encodes `text` (must be representable in the QR alphanumeric alphabet)
/// as a version-1 symbol at `ec_level`, applying mask pattern 0.
pub(crate) fn build_qr_symbol(text: &str, ec_level: EcLevel) -> Result<BitMatrix> {
    let version = version_for(1)?;
    let ec_blocks = version.ec_blocks_for(ec_level);
    assert_eq!(ec_blocks.groups.len(), 1, "test fixture only supports single-group versions");
    let data_codewords = ec_blocks.total_data_codewords() as usize;

    let mut bits: Vec<bool> = Vec::new();
    push_bits(&mut bits, 0b0010, 4); // alphanumeric mode
    push_bits(&mut bits, text.len() as u32, 9); // version 1-9 count width

    let chars: Vec<u8> = text.bytes().collect();
    let mut i = 0;
    while i + 1 < chars.len() {
        let pair = alphanumeric_index(chars[i]) * 45 + alphanumeric_index(chars[i + 1]);
        push_bits(&mut bits, pair as u32, 11);
        i += 2;
    }
    if i < chars.len() {
        push_bits(&mut bits, alphanumeric_index(chars[i]) as u32, 6);
    }

    let capacity_bits = data_codewords * 8;
    for _ in 0..4.min(capacity_bits.saturating_sub(bits.len())) {
        bits.push(false);
    }
    while bits.len() % 8 != 0 {
        bits.push(false);
    }

    let mut data_bytes: Vec<u8> = bits
        .chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8))
        .collect();

    let pad_bytes = [0xECu8, 0x11u8];
    let mut pad_index = 0;
    while data_bytes.len() < data_codewords {
        data_bytes.push(pad_bytes[pad_index % 2]);
        pad_index += 1;
    }
    data_bytes.truncate(data_codewords);

    let ec_per_block = ec_blocks.ec_codewords_per_block as usize;
    let ec_codewords = compute_rs_ec_codewords(&data_bytes, ec_per_block);

    let mut all_codewords = data_bytes.clone();
    all_codewords.extend(ec_codewords);

    // Single block (version 1): no interleaving needed, but still exercise
    // the real de-interleaver's inverse by round-tripping through it.
    let blocks = get_data_blocks(&all_codewords, &version, ec_level)?;
    debug_assert_eq!(blocks.len(), 1);

    let dimension = version.dimension();
    let mut matrix = BitMatrix::square(dimension);
    draw_finder_pattern(&mut matrix, 0, 0);
    draw_finder_pattern(&mut matrix, dimension - 7, 0);
    draw_finder_pattern(&mut matrix, 0, dimension - 7);
    draw_timing_patterns(&mut matrix, dimension);
    matrix.set(8, dimension - 8);

    let function_pattern = build_function_pattern_for_test(&version);
    write_codewords(&mut matrix, &function_pattern, &all_codewords, MASK_PATTERN);
    write_format_info(&mut matrix, dimension, ec_level, MASK_PATTERN);

    Ok(matrix)
}

fn push_bits(bits: &mut Vec<bool>, value: u32, width: u32) {
    for i in (0..width).rev() {
        bits.push((value >> i) & 1 != 0);
    }
}

fn compute_rs_ec_codewords(data: &[u8], ec_count: usize) -> Vec<u8> {
    let field = qr_256();
    let mut generator = GenericGfPoly::new(field, vec![1]).unwrap();
    for i in 0..ec_count {
        let term =
            GenericGfPoly::new(field, vec![1, field.exp((i + field.generator_base() as usize) as i64)]).unwrap();
        generator = generator.multiply(&term).unwrap();
    }

    let mut info_coefficients: Vec<u32> = data.iter().map(|&b| b as u32).collect();
    info_coefficients.resize(data.len() + ec_count, 0);
    let info = GenericGfPoly::new(field, info_coefficients).unwrap();
    let (_, remainder) = info.divide(&generator).unwrap();

    let mut ec_bytes = vec![0u8; ec_count];
    for i in 0..ec_count {
        ec_bytes[i] = remainder.coefficient(ec_count - 1 - i) as u8;
    }
    ec_bytes
}

fn draw_finder_pattern(matrix: &mut BitMatrix, x0: u32, y0: u32) {
    const PATTERN: [[bool; 7]; 7] = [
        [true, true, true, true, true, true, true],
        [true, false, false, false, false, false, true],
        [true, false, true, true, true, false, true],
        [true, false, true, true, true, false, true],
        [true, false, true, true, true, false, true],
        [true, false, false, false, false, false, true],
        [true, true, true, true, true, true, true],
    ];
    for (dy, row) in PATTERN.iter().enumerate() {
        for (dx, &set) in row.iter().enumerate() {
            if set {
                matrix.set(x0 + dx as u32, y0 + dy as u32);
            }
        }
    }
}

fn draw_timing_patterns(matrix: &mut BitMatrix, dimension: u32) {
    for i in 8..dimension - 8 {
        if i % 2 == 0 {
            matrix.set(i, 6);
            matrix.set(6, i);
        }
    }
}

fn write_codewords(matrix: &mut BitMatrix, function_pattern: &BitMatrix, codewords: &[u8], mask_pattern: u8) {
    let mut bit_iter = codewords.iter().flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 != 0));

    let dimension = matrix.width() as i64;
    let mut reading_up = true;
    let mut x = dimension - 1;
    while x > 0 {
        if x == 6 {
            x -= 1;
        }
        for count in 0..dimension {
            let y = if reading_up { dimension - 1 - count } else { count } as u32;
            for col in 0..2i64 {
                let xx = (x - col) as u32;
                if function_pattern.get(xx, y) {
                    continue;
                }
                let Some(bit) = bit_iter.next() else { continue };
                let masked = bit ^ mask_bit(mask_pattern, xx, y).unwrap();
                if masked {
                    matrix.set(xx, y);
                }
            }
        }
        reading_up = !reading_up;
        x -= 2;
    }
}

fn write_format_info(matrix: &mut BitMatrix, dimension: u32, ec_level: EcLevel, mask_pattern: u8) {
    let word = encode_format_info(ec_level, mask_pattern);

    // Mirrors read_format_copy1's bit order, most significant bit first.
    let bit_at = |i: u32| (word >> i) & 1 != 0;

    for (n, x) in (0..6).enumerate() {
        matrix_set_if(matrix, x, 8, bit_at(14 - n as u32));
    }
    matrix_set_if(matrix, 7, 8, bit_at(8));
    matrix_set_if(matrix, 8, 8, bit_at(7));
    matrix_set_if(matrix, 8, 7, bit_at(6));
    for (n, j) in (0..6).rev().enumerate() {
        matrix_set_if(matrix, 8, j, bit_at(5 - n as u32));
    }

    // Copy 2: 7 bits vertical (excluding the permanent dark module at
    // (8, dimension-8)), then 8 bits horizontal.
    for (n, i) in ((dimension - 7..=dimension - 1).rev()).enumerate() {
        matrix_set_if(matrix, 8, i, bit_at(14 - n as u32));
    }
    for (n, j) in (dimension - 8..dimension).enumerate() {
        matrix_set_if(matrix, j, 8, bit_at(7 - n as u32));
    }
}

fn matrix_set_if(matrix: &mut BitMatrix, x: u32, y: u32, bit: bool) {
    if bit {
        matrix.set(x, y);
    }
}
