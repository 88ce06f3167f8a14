//! Bit-stream interpreter (`C7`): decodes the corrected data byte stream
//! as a sequence of mode-tagged segments into text, raw bytes, and
//! structured-append metadata.

use crate::error::{format_error, Result};
use crate::hints::Hints;
use crate::qr::charset::CharacterSet;

const MODE_TERMINATOR: u32 = 0b0000;
const MODE_NUMERIC: u32 = 0b0001;
const MODE_ALPHANUMERIC: u32 = 0b0010;
const MODE_STRUCTURED_APPEND: u32 = 0b0011;
const MODE_BYTE: u32 = 0b0100;
const MODE_FNC1_FIRST: u32 = 0b0101;
const MODE_ECI: u32 = 0b0111;
const MODE_KANJI: u32 = 0b1000;
const MODE_FNC1_SECOND: u32 = 0b1001;
const MODE_HANZI: u32 = 0b1101;

const ALPHANUMERIC_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// The decoded contents of a data codeword stream, before the orchestrator
/// wraps it with EC-level/error-count bookkeeping into a `DecoderResult`.
#[derive(Debug, Clone, Default)]
pub struct DecodedContent {
    pub text: String,
    pub raw_bytes: Vec<u8>,
    pub byte_segments: Vec<Vec<u8>>,
    pub character_set: CharacterSet,
    pub structured_append_sequence_number: Option<u8>,
    pub structured_append_parity: Option<u8>,
}

/// MSB-first bit reader over a byte slice.
struct BitSource<'a> {
    bytes: &'a [u8],
    bit_offset: usize,
}

impl<'a> BitSource<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        BitSource { bytes, bit_offset: 0 }
    }

    fn available(&self) -> usize {
        self.bytes.len() * 8 - self.bit_offset
    }

    fn read_bits(&mut self, num_bits: u32) -> Result<u32> {
        if num_bits == 0 || num_bits as usize > self.available() {
            return format_error("QR bitstream: truncated, not enough bits remaining");
        }
        let mut result = 0u32;
        let mut bits_left = num_bits;
        while bits_left > 0 {
            let byte_index = self.bit_offset / 8;
            let bit_in_byte = self.bit_offset % 8;
            let bits_available_in_byte = 8 - bit_in_byte;
            let take = bits_left.min(bits_available_in_byte as u32);
            let shift = bits_available_in_byte as u32 - take;
            let mask = ((1u32 << take) - 1) as u8;
            let bits = (self.bytes[byte_index] >> shift) & mask;
            result = (result << take) | bits as u32;
            self.bit_offset += take as usize;
            bits_left -= take;
        }
        Ok(result)
    }
}

fn count_bits_for_mode(mode: u32, version_number: u32) -> u32 {
    let range = if version_number <= 9 {
        0
    } else if version_number <= 26 {
        1
    } else {
        2
    };
    match mode {
        MODE_NUMERIC => [10, 12, 14][range],
        MODE_ALPHANUMERIC => [9, 11, 13][range],
        MODE_BYTE => [8, 16, 16][range],
        MODE_KANJI => [8, 10, 12][range],
        _ => 0,
    }
}

/// Decodes `data` (the corrected payload bytes from all data blocks,
/// concatenated in block order) into text and raw bytes per the QR
/// mode-segmented bit-stream format.
pub fn decode(data: &[u8], version_number: u32, hints: &Hints) -> Result<DecodedContent> {
    let mut source = BitSource::new(data);
    let mut text = String::new();
    let mut raw_bytes = Vec::new();
    let mut byte_segments = Vec::new();
    let mut character_set = hints.character_set.unwrap_or_default();
    let mut structured_append_sequence_number = None;
    let mut structured_append_parity = None;

    loop {
        if source.available() < 4 {
            break;
        }
        let mode = source.read_bits(4)?;
        match mode {
            MODE_TERMINATOR => break,
            MODE_NUMERIC => decode_numeric(&mut source, version_number, &mut text, &mut raw_bytes)?,
            MODE_ALPHANUMERIC => decode_alphanumeric(&mut source, version_number, &mut text, &mut raw_bytes)?,
            MODE_BYTE => {
                let segment = decode_byte(&mut source, version_number)?;
                let decoded = character_set.decode(&segment);
                text.push_str(&decoded);
                raw_bytes.extend_from_slice(&segment);
                byte_segments.push(segment);
            }
            MODE_KANJI => {
                let segment = decode_kanji_bytes(&mut source, version_number)?;
                raw_bytes.extend_from_slice(&segment);
                byte_segments.push(segment);
            }
            MODE_ECI => {
                if hints.character_set.is_none() {
                    character_set = CharacterSet::from_eci_value(read_eci_value(&mut source)?);
                } else {
                    let _ = read_eci_value(&mut source)?;
                }
            }
            MODE_STRUCTURED_APPEND => {
                let seq_byte = source.read_bits(8)?;
                let parity = source.read_bits(8)?;
                structured_append_sequence_number = Some(seq_byte as u8);
                structured_append_parity = Some(parity as u8);
            }
            MODE_FNC1_FIRST | MODE_FNC1_SECOND => {
                // Marker only; QR's FNC1 modes carry no payload bits of
                // their own.
            }
            MODE_HANZI => decode_hanzi(&mut source, version_number, &mut raw_bytes)?,
            _ => return format_error("QR bitstream: unknown mode indicator"),
        }
    }

    Ok(DecodedContent {
        text,
        raw_bytes,
        byte_segments,
        character_set,
        structured_append_sequence_number,
        structured_append_parity,
    })
}

fn read_eci_value(source: &mut BitSource) -> Result<u32> {
    let first_byte = source.read_bits(8)?;
    if first_byte & 0x80 == 0 {
        Ok(first_byte & 0x7F)
    } else if first_byte & 0xC0 == 0x80 {
        let second_byte = source.read_bits(8)?;
        Ok(((first_byte & 0x3F) << 8) | second_byte)
    } else if first_byte & 0xE0 == 0xC0 {
        let rest = source.read_bits(16)?;
        Ok(((first_byte & 0x1F) << 16) | rest)
    } else {
        format_error("QR bitstream: invalid ECI designator prefix")
    }
}

fn decode_numeric(
    source: &mut BitSource,
    version_number: u32,
    text: &mut String,
    raw_bytes: &mut Vec<u8>,
) -> Result<()> {
    let count_bits = count_bits_for_mode(MODE_NUMERIC, version_number);
    let mut remaining = source.read_bits(count_bits)? as usize;

    while remaining >= 3 {
        let triple = source.read_bits(10)?;
        if triple >= 1000 {
            return format_error("QR bitstream: numeric triple out of range");
        }
        push_digits(triple, 3, text, raw_bytes);
        remaining -= 3;
    }
    if remaining == 2 {
        let pair = source.read_bits(7)?;
        if pair >= 100 {
            return format_error("QR bitstream: numeric pair out of range");
        }
        push_digits(pair, 2, text, raw_bytes);
    } else if remaining == 1 {
        let digit = source.read_bits(4)?;
        if digit >= 10 {
            return format_error("QR bitstream: numeric digit out of range");
        }
        push_digits(digit, 1, text, raw_bytes);
    }
    Ok(())
}

fn push_digits(value: u32, digit_count: usize, text: &mut String, raw_bytes: &mut Vec<u8>) {
    let s = format!("{:0width$}", value, width = digit_count);
    raw_bytes.extend_from_slice(s.as_bytes());
    text.push_str(&s);
}

fn decode_alphanumeric(
    source: &mut BitSource,
    version_number: u32,
    text: &mut String,
    raw_bytes: &mut Vec<u8>,
) -> Result<()> {
    let count_bits = count_bits_for_mode(MODE_ALPHANUMERIC, version_number);
    let mut remaining = source.read_bits(count_bits)? as usize;

    while remaining >= 2 {
        let pair = source.read_bits(11)?;
        let a = (pair / 45) as usize;
        let b = (pair % 45) as usize;
        if a >= ALPHANUMERIC_ALPHABET.len() || b >= ALPHANUMERIC_ALPHABET.len() {
            return format_error("QR bitstream: alphanumeric pair out of range");
        }
        text.push(ALPHANUMERIC_ALPHABET[a] as char);
        text.push(ALPHANUMERIC_ALPHABET[b] as char);
        raw_bytes.push(ALPHANUMERIC_ALPHABET[a]);
        raw_bytes.push(ALPHANUMERIC_ALPHABET[b]);
        remaining -= 2;
    }
    if remaining == 1 {
        let single = source.read_bits(6)? as usize;
        if single >= ALPHANUMERIC_ALPHABET.len() {
            return format_error("QR bitstream: alphanumeric single out of range");
        }
        text.push(ALPHANUMERIC_ALPHABET[single] as char);
        raw_bytes.push(ALPHANUMERIC_ALPHABET[single]);
    }
    Ok(())
}

fn decode_byte(source: &mut BitSource, version_number: u32) -> Result<Vec<u8>> {
    let count_bits = count_bits_for_mode(MODE_BYTE, version_number);
    let count = source.read_bits(count_bits)? as usize;
    let mut bytes = Vec::with_capacity(count);
    for _ in 0..count {
        bytes.push(source.read_bits(8)? as u8);
    }
    Ok(bytes)
}

/// Decodes a Kanji segment into its raw Shift-JIS byte pairs.
///
/// This core does not ship a Shift-JIS-to-Unicode table (that belongs to a
/// client-side text renderer), so Kanji segments contribute to
/// `raw_bytes`/`byte_segments` but are not folded into `text`.
fn decode_kanji_bytes(source: &mut BitSource, version_number: u32) -> Result<Vec<u8>> {
    let count_bits = count_bits_for_mode(MODE_KANJI, version_number);
    let count = source.read_bits(count_bits)? as usize;
    let mut bytes = Vec::with_capacity(count * 2);
    for _ in 0..count {
        let packed = source.read_bits(13)?;
        let assembled = ((packed / 0xC0) << 8) | (packed % 0xC0);
        let shifted = if assembled < 0x1F00 { assembled + 0x8140 } else { assembled + 0xC140 };
        bytes.push((shifted >> 8) as u8);
        bytes.push((shifted & 0xFF) as u8);
    }
    Ok(bytes)
}

fn decode_hanzi(source: &mut BitSource, version_number: u32, raw_bytes: &mut Vec<u8>) -> Result<()> {
    // GB2312 subset marker (1 or 2) then the same 13-bit packed scheme as Kanji.
    let subset = source.read_bits(4)?;
    if subset != 1 && subset != 2 {
        return format_error("QR bitstream: unknown Hanzi subset");
    }
    let count_bits = count_bits_for_mode(MODE_KANJI, version_number);
    let count = source.read_bits(count_bits)? as usize;
    for _ in 0..count {
        let packed = source.read_bits(13)?;
        let assembled = ((packed / 0x60) << 8) | (packed % 0x60);
        let shifted = if subset == 1 { assembled + 0xA1A1 } else { assembled + 0xA6A1 };
        raw_bytes.push((shifted >> 8) as u8);
        raw_bytes.push((shifted & 0xFF) as u8);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_to_bytes(bits: &str) -> Vec<u8> {
        let mut bytes = Vec::new();
        let padded = format!("{:0<width$}", bits, width = (bits.len() + 7) / 8 * 8);
        for chunk in padded.as_bytes().chunks(8) {
            let mut byte = 0u8;
            for &b in chunk {
                byte = (byte << 1) | if b == b'1' { 1 } else { 0 };
            }
            bytes.push(byte);
        }
        bytes
    }

    #[test]
    fn decodes_numeric_segment() {
        // Mode 0001, count(10 bits)=3 -> 0000000011, digits "123" -> 10 bits of 0001111011 (123)
        let mode = "0001";
        let count = format!("{:010b}", 3);
        let digits = format!("{:010b}", 123);
        let terminator = "0000";
        let bits = format!("{}{}{}{}", mode, count, digits, terminator);
        let bytes = bits_to_bytes(&bits);
        let content = decode(&bytes, 1, &Hints::default()).unwrap();
        assert_eq!(content.text, "123");
    }

    #[test]
    fn decodes_alphanumeric_segment() {
        // "AC" -> alphabet indices 10 and 12 -> pair = 10*45+12 = 462
        let mode = "0010";
        let count = format!("{:09b}", 2);
        let pair = format!("{:011b}", 462);
        let terminator = "0000";
        let bits = format!("{}{}{}{}", mode, count, pair, terminator);
        let bytes = bits_to_bytes(&bits);
        let content = decode(&bytes, 1, &Hints::default()).unwrap();
        assert_eq!(content.text, "AC");
    }

    #[test]
    fn decodes_byte_segment_as_latin1_by_default() {
        let mode = "0100";
        let count = format!("{:08b}", 2);
        let byte1 = format!("{:08b}", b'h');
        let byte2 = format!("{:08b}", b'i');
        let terminator = "0000";
        let bits = format!("{}{}{}{}{}", mode, count, byte1, byte2, terminator);
        let bytes = bits_to_bytes(&bits);
        let content = decode(&bytes, 1, &Hints::default()).unwrap();
        assert_eq!(content.text, "hi");
        assert_eq!(content.raw_bytes, b"hi");
    }

    #[test]
    fn truncated_stream_is_format_error() {
        let bytes = bits_to_bytes("0001");
        assert!(decode(&bytes, 1, &Hints::default()).is_err());
    }

    #[test]
    fn unknown_mode_indicator_fails() {
        let bytes = bits_to_bytes("1111");
        assert!(decode(&bytes, 1, &Hints::default()).is_err());
    }

    #[test]
    fn structured_append_fields_are_captured() {
        let mode = "0011";
        let seq = format!("{:08b}", 0x21u8); // position 2 of 2 (seq=2<<4|1)
        let parity = format!("{:08b}", 0xAAu8);
        let terminator = "0000";
        let bits = format!("{}{}{}{}", mode, seq, parity, terminator);
        let bytes = bits_to_bytes(&bits);
        let content = decode(&bytes, 1, &Hints::default()).unwrap();
        assert_eq!(content.structured_append_sequence_number, Some(0x21));
        assert_eq!(content.structured_append_parity, Some(0xAA));
    }
}
