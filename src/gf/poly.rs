//! Polynomials over a [`GenericGf`], coefficients stored high-order first
//! (index `0` is the highest-degree term) to match the way the Euclidean
//! algorithm and Chien search consume them in `src/rs`.

use std::fmt;

use crate::error::{illegal_argument, Result};
use crate::gf::field::GenericGf;

/// A polynomial over a [`GenericGf`]. Immutable once constructed; every
/// operation returns a new polynomial.
///
/// Holds a `'static` reference to its field rather than an owned or
/// reference-counted copy: every field this crate uses is one of the
/// lazily-initialized singletons in `src/gf/field.rs`, so `'static` is
/// always available and cheaper than `Rc`.
#[derive(Clone)]
pub struct GenericGfPoly {
    field: &'static GenericGf,
    /// High-order first: `coefficients[0]` is the leading term.
    coefficients: Vec<u32>,
}

impl GenericGfPoly {
    /// Builds a polynomial over `field` from `coefficients` (high-order
    /// first). Leading zero coefficients are trimmed, except the zero
    /// polynomial itself is normalized to `[0]`.
    ///
    /// Fails with `IllegalArgument` if `coefficients` is empty.
    pub fn new(field: &'static GenericGf, coefficients: Vec<u32>) -> Result<Self> {
        if coefficients.is_empty() {
            return illegal_argument("GenericGfPoly: coefficients must not be empty");
        }

        let mut first_nonzero = 0;
        while first_nonzero < coefficients.len() - 1 && coefficients[first_nonzero] == 0 {
            first_nonzero += 1;
        }

        let trimmed = if first_nonzero == 0 {
            coefficients
        } else {
            coefficients[first_nonzero..].to_vec()
        };

        Ok(GenericGfPoly { field, coefficients: trimmed })
    }

    /// The field this polynomial is defined over.
    pub fn field(&self) -> &'static GenericGf {
        self.field
    }

    /// The polynomial's degree (0 for both the zero polynomial and any
    /// nonzero constant).
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Whether this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    /// The coefficient of `x^degree`, or `0` if `degree` exceeds this
    /// polynomial's degree.
    pub fn coefficient(&self, degree: usize) -> u32 {
        if degree > self.degree() {
            return 0;
        }
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    /// All coefficients, high-order first.
    pub fn coefficients(&self) -> &[u32] {
        &self.coefficients
    }

    /// Evaluates the polynomial at `a` via Horner's method.
    pub fn evaluate_at(&self, a: u32) -> u32 {
        if a == 0 {
            return self.coefficient(0);
        }
        let mut result = self.coefficients[0];
        for &c in &self.coefficients[1..] {
            result = self.field.multiply(result, a) ^ c;
        }
        result
    }

    /// `self + other` (same as subtraction in a binary extension field).
    pub fn add_or_subtract(&self, other: &GenericGfPoly) -> Result<GenericGfPoly> {
        if self.is_zero() {
            return Ok(other.clone());
        }
        if other.is_zero() {
            return Ok(self.clone());
        }

        let (smaller, larger) = if self.coefficients.len() <= other.coefficients.len() {
            (&self.coefficients, &other.coefficients)
        } else {
            (&other.coefficients, &self.coefficients)
        };

        let mut sum = vec![0u32; larger.len()];
        let len_diff = larger.len() - smaller.len();
        sum[..len_diff].copy_from_slice(&larger[..len_diff]);
        for i in len_diff..larger.len() {
            sum[i] = self.field.add_or_subtract(smaller[i - len_diff], larger[i]);
        }

        GenericGfPoly::new(self.field, sum)
    }

    /// Polynomial multiplication.
    pub fn multiply(&self, other: &GenericGfPoly) -> Result<GenericGfPoly> {
        if self.is_zero() || other.is_zero() {
            return GenericGfPoly::new(self.field, vec![0]);
        }

        let a = &self.coefficients;
        let b = &other.coefficients;
        let mut product = vec![0u32; a.len() + b.len() - 1];
        for (i, &ac) in a.iter().enumerate() {
            if ac == 0 {
                continue;
            }
            for (j, &bc) in b.iter().enumerate() {
                if bc == 0 {
                    continue;
                }
                product[i + j] ^= self.field.multiply(ac, bc);
            }
        }

        GenericGfPoly::new(self.field, product)
    }

    /// Multiplies every coefficient by `scalar`.
    pub fn multiply_by_scalar(&self, scalar: u32) -> Result<GenericGfPoly> {
        if scalar == 0 {
            return GenericGfPoly::new(self.field, vec![0]);
        }
        if scalar == 1 {
            return Ok(self.clone());
        }
        let product: Vec<u32> =
            self.coefficients.iter().map(|&c| self.field.multiply(c, scalar)).collect();
        GenericGfPoly::new(self.field, product)
    }

    /// Multiplies by the monomial `coefficient * x^degree`.
    pub fn multiply_by_monomial(&self, degree: usize, coefficient: u32) -> Result<GenericGfPoly> {
        if coefficient == 0 {
            return GenericGfPoly::new(self.field, vec![0]);
        }
        let mut product = vec![0u32; self.coefficients.len() + degree];
        for (i, &c) in self.coefficients.iter().enumerate() {
            product[i] = self.field.multiply(c, coefficient);
        }
        GenericGfPoly::new(self.field, product)
    }

    /// Polynomial long division: returns `(quotient, remainder)` such that
    /// `self == quotient * other + remainder`.
    ///
    /// Fails with `IllegalArgument` if `other` is the zero polynomial.
    pub fn divide(&self, other: &GenericGfPoly) -> Result<(GenericGfPoly, GenericGfPoly)> {
        if other.is_zero() {
            return illegal_argument("GenericGfPoly::divide: division by zero polynomial");
        }

        let mut quotient = GenericGfPoly::new(self.field, vec![0])?;
        let mut remainder = self.clone();

        let denominator_leading_term = other.coefficient(other.degree());
        let inverse_denominator_leading_term = self.field.inverse(denominator_leading_term)?;

        while !remainder.is_zero() && remainder.degree() >= other.degree() {
            let degree_diff = remainder.degree() - other.degree();
            let scale = self.field.multiply(
                remainder.coefficient(remainder.degree()),
                inverse_denominator_leading_term,
            );
            let term = other.multiply_by_monomial(degree_diff, scale)?;
            let iteration_quotient = GenericGfPoly::new(self.field, {
                let mut c = vec![0u32; degree_diff + 1];
                c[0] = scale;
                c
            })?;
            quotient = quotient.add_or_subtract(&iteration_quotient)?;
            remainder = remainder.add_or_subtract(&term)?;
        }

        Ok((quotient, remainder))
    }
}

impl fmt::Debug for GenericGfPoly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GenericGfPoly{:?}", self.coefficients)
    }
}

impl PartialEq for GenericGfPoly {
    fn eq(&self, other: &Self) -> bool {
        self.coefficients == other.coefficients
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf::field::well_known::qr_256;

    fn field() -> &'static GenericGf {
        qr_256()
    }

    #[test]
    fn leading_zero_coefficients_are_trimmed() {
        let p = GenericGfPoly::new(field(), vec![0, 0, 5, 3]).unwrap();
        assert_eq!(p.degree(), 1);
        assert_eq!(p.coefficient(1), 5);
        assert_eq!(p.coefficient(0), 3);
    }

    #[test]
    fn zero_polynomial_is_zero() {
        let p = GenericGfPoly::new(field(), vec![0, 0, 0]).unwrap();
        assert!(p.is_zero());
        assert_eq!(p.degree(), 0);
    }

    #[test]
    fn evaluate_at_zero_is_constant_term() {
        let p = GenericGfPoly::new(field(), vec![5, 3, 7]).unwrap();
        assert_eq!(p.evaluate_at(0), 7);
    }

    #[test]
    fn evaluate_matches_direct_sum_of_terms() {
        let f = field();
        let p = GenericGfPoly::new(f, vec![1, 1, 1]).unwrap(); // x^2 + x + 1
        let a = f.exp(5);
        let expected = f.multiply(a, a) ^ a ^ 1;
        assert_eq!(p.evaluate_at(a), expected);
    }

    #[test]
    fn add_or_subtract_with_zero_is_identity() {
        let f = field();
        let p = GenericGfPoly::new(f, vec![1, 2, 3]).unwrap();
        let zero = GenericGfPoly::new(f, vec![0]).unwrap();
        assert_eq!(p.add_or_subtract(&zero).unwrap(), p);
    }

    #[test]
    fn multiply_by_monomial_shifts_degree() {
        let f = field();
        let p = GenericGfPoly::new(f, vec![1, 2]).unwrap(); // x + 2
        let shifted = p.multiply_by_monomial(2, 1).unwrap();
        assert_eq!(shifted.degree(), 3);
        assert_eq!(shifted.coefficient(0), 0);
        assert_eq!(shifted.coefficient(1), 0);
    }

    #[test]
    fn divide_reconstructs_dividend() {
        let f = field();
        let dividend = GenericGfPoly::new(f, vec![1, 0, 1, 1]).unwrap();
        let divisor = GenericGfPoly::new(f, vec![1, f.exp(3)]).unwrap();
        let (quotient, remainder) = dividend.divide(&divisor).unwrap();
        let reconstructed =
            quotient.multiply(&divisor).unwrap().add_or_subtract(&remainder).unwrap();
        assert_eq!(reconstructed, dividend);
    }

    #[test]
    fn divide_by_zero_fails() {
        let f = field();
        let dividend = GenericGfPoly::new(f, vec![1, 2]).unwrap();
        let zero = GenericGfPoly::new(f, vec![0]).unwrap();
        assert!(dividend.divide(&zero).is_err());
    }

    proptest::proptest! {
        #[test]
        fn divide_satisfies_dividend_equals_quotient_times_divisor_plus_remainder(
            dividend_coeffs in proptest::collection::vec(0u32..256, 1..12),
            divisor_lead in 1u32..256,
            divisor_rest in proptest::collection::vec(0u32..256, 0..6),
        ) {
            let f = field();
            let mut divisor_coeffs = vec![divisor_lead];
            divisor_coeffs.extend(divisor_rest);
            let dividend = GenericGfPoly::new(f, dividend_coeffs).unwrap();
            let divisor = GenericGfPoly::new(f, divisor_coeffs).unwrap();
            let (quotient, remainder) = dividend.divide(&divisor).unwrap();
            let reconstructed = quotient.multiply(&divisor).unwrap().add_or_subtract(&remainder).unwrap();
            proptest::prop_assert_eq!(reconstructed, dividend);
            proptest::prop_assert!(remainder.is_zero() || remainder.degree() < divisor.degree());
        }
    }
}
