//! The unified error taxonomy shared by every component in the decode core.
//!
//! Internal call stacks propagate `DecodeError` with `?`, the same way the
//! rest of this crate's lineage threads a closed result type through a deep
//! pipeline instead of reaching for exceptions. Reed-Solomon failures are
//! raised as [`DecodeError::Checksum`] directly; there is no separate
//! internal error type to translate at a boundary.

use std::fmt;

/// Reasons a seek-like structural prerequisite can be missing; kept narrow
/// since the core never seeks, it only classifies "nothing to decode here".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    /// No finder/locator pattern information was available to the parser.
    NoLocator,
    /// The codeword stream was empty or the matrix had no data region.
    NoCodewords,
}

impl NotFoundKind {
    fn as_str(&self) -> &'static str {
        match self {
            NotFoundKind::NoLocator => "no locator pattern available",
            NotFoundKind::NoCodewords => "no codewords in symbol",
        }
    }
}

/// `DecodeError` enumerates every way a decode can fail, per the taxonomy in
/// the specification's error-handling design: structural prerequisites
/// (`NotFound`), internally-inconsistent structure (`Format`),
/// uncorrectable-by-capacity payloads (`Checksum`), caller misuse
/// (`IllegalArgument`), and field-arithmetic bugs (`Arithmetic`).
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A structural prerequisite (finder, codewords) was missing.
    #[error("not found: {0}")]
    NotFound(NotFoundKind),

    /// The structure parsed but was internally inconsistent: bad mode
    /// indicator, truncated bit stream, BCH/Golay could not agree, mask
    /// or version could not be determined.
    #[error("malformed symbol: {0}")]
    Format(&'static str),

    /// Reed-Solomon could not correct the codeword stream within its
    /// declared error-correction capacity.
    #[error("checksum failed: {0}")]
    Checksum(&'static str),

    /// The caller passed arguments outside their documented domain (e.g.
    /// out-of-range matrix coordinates, a ragged `parse` input).
    #[error("illegal argument: {0}")]
    IllegalArgument(&'static str),

    /// A Galois-field operation violated its own invariants (division by
    /// zero, an out-of-range exponent). Indicates a bug in this crate, not
    /// bad input data, and should never be reachable from public APIs
    /// given well-formed field construction.
    #[error("arithmetic error: {0}")]
    Arithmetic(&'static str),
}

impl NotFoundKind {
    pub(crate) fn err<T>(self) -> Result<T> {
        Err(DecodeError::NotFound(self))
    }
}

impl fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The result type threaded through the whole decode core.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Convenience constructor for a [`DecodeError::Format`].
pub fn format_error<T>(msg: &'static str) -> Result<T> {
    Err(DecodeError::Format(msg))
}

/// Convenience constructor for a [`DecodeError::Checksum`].
pub fn checksum_error<T>(msg: &'static str) -> Result<T> {
    Err(DecodeError::Checksum(msg))
}

/// Convenience constructor for a [`DecodeError::IllegalArgument`].
pub fn illegal_argument<T>(msg: &'static str) -> Result<T> {
    Err(DecodeError::IllegalArgument(msg))
}

/// Convenience constructor for a [`DecodeError::Arithmetic`].
pub fn arithmetic_error<T>(msg: &'static str) -> Result<T> {
    Err(DecodeError::Arithmetic(msg))
}

/// Convenience constructor for a [`DecodeError::NotFound`].
pub fn not_found_error<T>(kind: NotFoundKind) -> Result<T> {
    Err(DecodeError::NotFound(kind))
}
