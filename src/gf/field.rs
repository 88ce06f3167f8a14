//! Galois field arithmetic: log/antilog tables over `GF(2^m)`, plus the
//! prime-field variant PDF417 needs.
//!
//! Each [`GenericGf`] is built once from `(primitive polynomial, size,
//! generator base)` and is immutable afterwards, so it can be shared freely
//! across concurrent decodes — the only shared mutable-looking state in the
//! whole crate, and it isn't actually mutable once constructed (see the
//! concurrency section of the specification this crate implements).

use std::sync::OnceLock;

use crate::error::{arithmetic_error, Result};

/// A Galois field, either a binary extension field `GF(2^m)` or (for
/// PDF417) a prime field `GF(p)`.
///
/// `exp`/`log` are precomputed so that `multiply`/`inverse` are O(1).
pub struct GenericGf {
    exp_table: Vec<u32>,
    log_table: Vec<u32>,
    size: u32,
    generator_base: u32,
    is_prime: bool,
}

impl GenericGf {
    /// Builds a binary extension field `GF(2^m)` from primitive polynomial
    /// `primitive` (degree `m`, `size == 2^m`) and `generator_base` (the
    /// exponent at which syndrome evaluation starts; `0` for QR, `1` for
    /// codes like Data Matrix/MaxiCode that evaluate from `alpha^1`).
    ///
    /// `exp[i]` is built by repeated doubling: shift left, and if the
    /// result's `m`-th bit is set, XOR with `primitive`. `log` is the
    /// inverse permutation on the nonzero elements.
    pub fn new_binary(primitive: u32, size: u32, generator_base: u32) -> Self {
        let size_usize = size as usize;
        let mut exp_table = vec![0u32; size_usize];
        let mut log_table = vec![0u32; size_usize];

        let mut x = 1u32;
        for i in 0..size_usize {
            exp_table[i] = x;
            x <<= 1;
            if x >= size {
                x ^= primitive;
                x &= size - 1;
            }
        }
        for i in 0..(size_usize - 1) {
            log_table[exp_table[i] as usize] = i as u32;
        }

        GenericGf { exp_table, log_table, size, generator_base, is_prime: false }
    }

    /// Builds a prime field `GF(p)` (PDF417's variant: `size` is prime, not
    /// a power of two, and `add`/`subtract` are ordinary mod-`p` arithmetic
    /// rather than XOR).
    pub fn new_prime(primitive_root: u32, size: u32, generator_base: u32) -> Self {
        let size_usize = size as usize;
        let mut exp_table = vec![0u32; size_usize];
        let mut log_table = vec![0u32; size_usize];

        let mut x = 1u32;
        for i in 0..(size_usize - 1) {
            exp_table[i] = x;
            log_table[x as usize] = i as u32;
            x = (x * primitive_root) % size;
        }
        exp_table[size_usize - 1] = exp_table[0];

        GenericGf { exp_table, log_table, size, generator_base, is_prime: true }
    }

    /// The number of elements in the field.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The exponent at which Reed-Solomon syndrome evaluation should start
    /// for this field (see `GenericGf::new_binary` docs and the rationale
    /// in the specification: non-zero bases require a corrective final
    /// multiplication in Forney's formula).
    pub fn generator_base(&self) -> u32 {
        self.generator_base
    }

    /// Whether this is the PDF417 prime-field variant rather than a binary
    /// extension field.
    pub fn is_prime_field(&self) -> bool {
        self.is_prime
    }

    /// `a + b`. In a binary extension field this is XOR (same operation as
    /// subtraction); in the prime-field variant it is ordinary modular
    /// addition.
    #[inline]
    pub fn add_or_subtract(&self, a: u32, b: u32) -> u32 {
        if self.is_prime {
            (a + self.size - b % self.size) % self.size
        } else {
            a ^ b
        }
    }

    /// `alpha^i`, cyclically: `exp(i) == exp(i mod (size - 1))` for `i >=
    /// 0`.
    #[inline]
    pub fn exp(&self, i: i64) -> u32 {
        let modulus = (self.size - 1) as i64;
        let idx = i.rem_euclid(modulus.max(1));
        self.exp_table[idx as usize]
    }

    /// `log_alpha(a)` for `a != 0`.
    ///
    /// # Panics
    /// Panics if `a == 0` (callers must check first; this mirrors the
    /// field's own internal invariant rather than surfacing as a
    /// caller-facing `DecodeError`, since `log(0)` is undefined math, not
    /// bad input data).
    #[inline]
    pub fn log(&self, a: u32) -> u32 {
        assert!(a != 0, "GenericGf::log(0) is undefined");
        self.log_table[a as usize]
    }

    /// `a * b`, using log/antilog tables: `0` if either operand is `0`,
    /// else `exp(log(a) + log(b))`.
    #[inline]
    pub fn multiply(&self, a: u32, b: u32) -> u32 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.exp(self.log(a) as i64 + self.log(b) as i64)
    }

    /// The multiplicative inverse of `a`.
    ///
    /// Fails with [`crate::error::DecodeError::Arithmetic`] for `a == 0`,
    /// which has no inverse.
    pub fn inverse(&self, a: u32) -> Result<u32> {
        if a == 0 {
            return arithmetic_error("division by zero in GF");
        }
        Ok(self.exp((self.size - 1 - self.log(a)) as i64))
    }
}

fn qr_gf() -> &'static GenericGf {
    static FIELD: OnceLock<GenericGf> = OnceLock::new();
    FIELD.get_or_init(|| GenericGf::new_binary(0x011D, 256, 0))
}

fn data_matrix_gf() -> &'static GenericGf {
    static FIELD: OnceLock<GenericGf> = OnceLock::new();
    FIELD.get_or_init(|| GenericGf::new_binary(0x012D, 256, 1))
}

fn aztec_data_12_gf() -> &'static GenericGf {
    static FIELD: OnceLock<GenericGf> = OnceLock::new();
    FIELD.get_or_init(|| GenericGf::new_binary(0x1069, 4096, 1))
}

fn aztec_data_10_gf() -> &'static GenericGf {
    static FIELD: OnceLock<GenericGf> = OnceLock::new();
    FIELD.get_or_init(|| GenericGf::new_binary(0x409, 1024, 1))
}

fn aztec_data_8_gf() -> &'static GenericGf {
    // Same field as Data Matrix: GF(256) with primitive 0x012D.
    data_matrix_gf()
}

fn aztec_data_6_gf() -> &'static GenericGf {
    static FIELD: OnceLock<GenericGf> = OnceLock::new();
    FIELD.get_or_init(|| GenericGf::new_binary(0x43, 64, 1))
}

fn aztec_param_gf() -> &'static GenericGf {
    static FIELD: OnceLock<GenericGf> = OnceLock::new();
    FIELD.get_or_init(|| GenericGf::new_binary(0x13, 16, 1))
}

fn maxicode_gf() -> &'static GenericGf {
    static FIELD: OnceLock<GenericGf> = OnceLock::new();
    FIELD.get_or_init(|| GenericGf::new_binary(0x43, 64, 1))
}

fn pdf417_gf() -> &'static GenericGf {
    static FIELD: OnceLock<GenericGf> = OnceLock::new();
    FIELD.get_or_init(|| GenericGf::new_prime(3, 929, 1))
}

/// The concrete field instances required by the specification (§4.2),
/// realized as lazily-initialized process-wide singletons. Each symbology
/// names its own: only `qr_256` is exercised end-to-end by the decode
/// pipeline in this crate, the rest exist as a ready substrate for
/// per-symbology decoders built on top of this core.
pub mod well_known {
    use super::GenericGf;

    /// QR Code: `GF(256)`, primitive `0x011D`, generator base `0`.
    pub fn qr_256() -> &'static GenericGf {
        super::qr_gf()
    }

    /// Data Matrix: `GF(256)`, primitive `0x012D`, generator base `1`.
    pub fn data_matrix_256() -> &'static GenericGf {
        super::data_matrix_gf()
    }

    /// Aztec parameter field: `GF(16)`, primitive `0x13`.
    pub fn aztec_param() -> &'static GenericGf {
        super::aztec_param_gf()
    }

    /// Aztec data field (6-bit words): `GF(64)`, primitive `0x43`.
    pub fn aztec_data_6() -> &'static GenericGf {
        super::aztec_data_6_gf()
    }

    /// Aztec data field (8-bit words): `GF(256)`, primitive `0x012D`.
    pub fn aztec_data_8() -> &'static GenericGf {
        super::aztec_data_8_gf()
    }

    /// Aztec data field (10-bit words): `GF(1024)`, primitive `0x409`.
    pub fn aztec_data_10() -> &'static GenericGf {
        super::aztec_data_10_gf()
    }

    /// Aztec data field (12-bit words): `GF(4096)`, primitive `0x1069`.
    pub fn aztec_data_12() -> &'static GenericGf {
        super::aztec_data_12_gf()
    }

    /// MaxiCode: `GF(64)`, primitive `0x43`, generator base `1`.
    pub fn maxicode() -> &'static GenericGf {
        super::maxicode_gf()
    }

    /// PDF417: prime field `GF(929)`, generator base `1` — exercises the
    /// `add_or_subtract` mod-arithmetic path instead of XOR.
    pub fn pdf417_929() -> &'static GenericGf {
        super::pdf417_gf()
    }
}

#[cfg(test)]
mod tests {
    use super::well_known::*;
    use super::*;

    fn binary_fields() -> Vec<&'static GenericGf> {
        vec![
            qr_256(),
            data_matrix_256(),
            aztec_param(),
            aztec_data_6(),
            aztec_data_8(),
            aztec_data_10(),
            aztec_data_12(),
            maxicode(),
        ]
    }

    #[test]
    fn exp_log_are_inverses() {
        for field in binary_fields() {
            for x in 1..field.size() {
                assert_eq!(field.exp(field.log(x) as i64), x, "field size {}", field.size());
                assert_eq!(field.log(field.exp(0) * 0 + field.exp(0)), 0);
            }
            for i in 0..(field.size() - 1) {
                assert_eq!(field.log(field.exp(i as i64)), i);
            }
        }
    }

    #[test]
    fn exp_is_cyclic() {
        let field = qr_256();
        let period = (field.size() - 1) as i64;
        for i in 0..10 {
            assert_eq!(field.exp(i), field.exp(i + period));
        }
    }

    #[test]
    fn multiply_is_commutative_and_has_inverse() {
        for field in binary_fields() {
            for a in 1..field.size() {
                let inv = field.inverse(a).unwrap();
                assert_eq!(field.multiply(a, inv), 1, "field size {}", field.size());
                for b in 1..field.size().min(40) {
                    assert_eq!(field.multiply(a, b), field.multiply(b, a));
                }
            }
        }
    }

    #[test]
    fn multiply_by_zero_is_zero() {
        let field = qr_256();
        for a in 0..field.size() {
            assert_eq!(field.multiply(a, 0), 0);
            assert_eq!(field.multiply(0, a), 0);
        }
    }

    #[test]
    fn inverse_of_zero_fails() {
        assert!(qr_256().inverse(0).is_err());
    }

    #[test]
    fn binary_add_is_xor_and_self_inverse() {
        let field = qr_256();
        assert_eq!(field.add_or_subtract(5, 5), 0);
        assert_eq!(field.add_or_subtract(200, 37), 200 ^ 37);
    }

    #[test]
    fn prime_field_multiply_and_inverse() {
        let field = pdf417_929();
        assert!(field.is_prime_field());
        for a in 1..20u32 {
            let inv = field.inverse(a).unwrap();
            assert_eq!(field.multiply(a, inv), 1);
        }
        // Prime-field add/subtract is modular, not XOR.
        assert_eq!(field.add_or_subtract(5, 5), 0);
        assert_eq!(field.add_or_subtract(3, 10), (3 + 929 - 10) % 929);
    }

    #[test]
    fn well_known_singletons_are_stable() {
        let a = qr_256() as *const GenericGf;
        let b = qr_256() as *const GenericGf;
        assert_eq!(a, b);
    }
}
