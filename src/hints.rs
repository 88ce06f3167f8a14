//! Decode-time hints (addition over the teacher's shape): caller-supplied
//! overrides that steer but never gate decoding.

use crate::qr::charset::CharacterSet;

/// Optional caller-supplied overrides for a single decode call.
///
/// Every field defaults to "let the symbol's own ECI/format data decide" —
/// a `Hints::default()` decode behaves identically to passing no hints at
/// all.
#[derive(Debug, Clone, Default)]
pub struct Hints {
    /// Forces byte-mode segments to this character set regardless of any
    /// ECI designator present in the symbol.
    pub character_set: Option<CharacterSet>,
    /// Skip the mirrored-retry pass entirely, even on straight-decode
    /// failure. Useful for callers who already know their input orientation
    /// and want to fail fast instead of paying for a second parse.
    pub skip_mirror_retry: bool,
}

impl Hints {
    pub fn new() -> Self {
        Hints::default()
    }

    pub fn with_character_set(mut self, charset: CharacterSet) -> Self {
        self.character_set = Some(charset);
        self
    }

    pub fn with_skip_mirror_retry(mut self, skip: bool) -> Self {
        self.skip_mirror_retry = skip;
        self
    }
}
