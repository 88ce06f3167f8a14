//! Character set selection for the byte-mode segment: the default and the
//! small set of ECI designators this core recognizes.

/// A text encoding a byte-mode segment may be interpreted under.
///
/// This is intentionally small: full ECI designator coverage (hundreds of
/// values across every national/vendor code page) is a client-side
/// concern, not part of this core's job of getting bytes off the matrix
/// correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSet {
    Iso8859_1,
    Ascii,
    Utf8,
    ShiftJis,
}

impl CharacterSet {
    /// Maps an ECI designator value to a known character set, defaulting to
    /// `Iso8859_1` (the QR standard's own default) for values this core
    /// doesn't special-case.
    pub fn from_eci_value(value: u32) -> CharacterSet {
        match value {
            3 => CharacterSet::Iso8859_1,
            20 => CharacterSet::ShiftJis,
            26 => CharacterSet::Utf8,
            27 => CharacterSet::Ascii,
            _ => CharacterSet::Iso8859_1,
        }
    }

    /// Decodes `bytes` as text under this character set.
    ///
    /// `ShiftJis` bytes are returned lossily (`Iso8859_1`-style one byte
    /// per `char`): a faithful Shift-JIS-to-Unicode table is a client-side
    /// text-rendering concern this core does not carry.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            CharacterSet::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            CharacterSet::Ascii | CharacterSet::Iso8859_1 | CharacterSet::ShiftJis => {
                bytes.iter().map(|&b| b as char).collect()
            }
        }
    }

    /// A stable debug/display name, independent of `Debug`'s derived form.
    pub fn name(self) -> &'static str {
        match self {
            CharacterSet::Iso8859_1 => "ISO-8859-1",
            CharacterSet::Ascii => "US-ASCII",
            CharacterSet::Utf8 => "UTF-8",
            CharacterSet::ShiftJis => "Shift_JIS",
        }
    }
}

impl Default for CharacterSet {
    fn default() -> Self {
        CharacterSet::Iso8859_1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eci_26_is_utf8() {
        assert_eq!(CharacterSet::from_eci_value(26), CharacterSet::Utf8);
    }

    #[test]
    fn unknown_eci_defaults_to_latin1() {
        assert_eq!(CharacterSet::from_eci_value(9999), CharacterSet::Iso8859_1);
    }

    #[test]
    fn utf8_decode_round_trips_ascii() {
        assert_eq!(CharacterSet::Utf8.decode(b"hello"), "hello");
    }
}
