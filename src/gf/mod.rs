//! Galois-field arithmetic and polynomials over those fields (`C2`/`C3` in
//! the design overview) — the algebraic substrate Reed-Solomon decoding is
//! built on.

pub mod field;
pub mod poly;

pub use field::GenericGf;
pub use poly::GenericGfPoly;
