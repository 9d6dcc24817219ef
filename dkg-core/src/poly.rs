//! Polynomials, commitments, and the handful of per-coefficient products built on top of them.
//!
//! A [`Polynomial`] holds the `t+1` secret coefficients of one peer's degree-`t` polynomial over
//! `ℤ_q`. Everything else in this module is a free function: committing a polynomial's
//! coefficients under a generator, combining two commitment vectors, and evaluating the
//! commitment-side analogue of Horner's method (`phi`) that the stage verifiers need without ever
//! seeing the coefficients themselves.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bigint::{mod_inverse, mod_mul, mod_neg, mod_pow, sample_below};

/// A degree-`t` polynomial over `ℤ_q`, i.e. its `t+1` coefficients `a_0, …, a_t`.
///
/// Coefficients are secret key material for as long as the polynomial lives; the type zeroizes
/// its backing buffer on drop and deliberately does not implement `Debug` or `Display`.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Polynomial {
    coefficients: Vec<BigUint>,
}

impl Polynomial {
    /// Samples a fresh degree-`t` polynomial with coefficients uniform in `[0, q)`.
    pub fn sample_random<R: rand::CryptoRng + rand::RngCore>(
        rng: &mut R,
        degree: usize,
        q: &BigUint,
    ) -> Self {
        let coefficients = (0..=degree).map(|_| sample_below(rng, q)).collect();
        Self { coefficients }
    }

    /// Constructs a polynomial from explicit coefficients, lowest degree first. Exposed for
    /// tests that need to fix coefficients to reproduce a scenario exactly.
    pub fn from_coefficients(coefficients: Vec<BigUint>) -> Self {
        Self { coefficients }
    }

    /// Degree of the polynomial, i.e. `t`.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Evaluates `Σ_{k=0..=t} a_k · z^k mod q` using Horner's method.
    pub fn eval(&self, z: &BigUint, q: &BigUint) -> BigUint {
        let mut acc = BigUint::zero();
        for a_k in self.coefficients.iter().rev() {
            acc = (mod_mul(&acc, z, q) + a_k) % q;
        }
        acc
    }

    /// Computes `[base^{a_0}, …, base^{a_t}] mod p`, the public commitment to this polynomial's
    /// coefficients under `base`.
    pub fn commit(&self, base: &BigUint, p: &BigUint) -> Vec<BigUint> {
        self.coefficients
            .iter()
            .map(|a_k| mod_pow(base, a_k, p))
            .collect()
    }

    /// Coefficients, exposed read-only for callers (e.g. the VSS producer) that need to evaluate
    /// or commit this polynomial alongside a second one sharing the same randomness source.
    pub fn coefficients(&self) -> &[BigUint] {
        &self.coefficients
    }
}

/// Computes `[A_0 · B_0, …, A_t · B_t] mod p`, the Pedersen combination of two commitment vectors
/// of coefficients `a_k`, `b_k` into commitments to the pairs `(a_k, b_k)` under `(g, h)`.
///
/// # Errors
/// Returns [`crate::error::DkgError::MalformedPayload`] if `a` and `b` have different lengths.
pub fn combine_commitments(
    a: &[BigUint],
    b: &[BigUint],
    p: &BigUint,
) -> Result<Vec<BigUint>, crate::error::DkgError> {
    if a.len() != b.len() {
        return Err(crate::error::DkgError::MalformedPayload {
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(a_k, b_k)| mod_mul(a_k, b_k, p)).collect())
}

/// Computes `Φ(C, j) = Π_{k=0..=t} C_k^{j^k} mod p`.
///
/// `j^0 = 1` even when `j = 0` (the convention this crate follows for `0^0`), but in practice `j`
/// is always a peer id in `[1, n]`, so the degenerate base never arises here.
pub fn phi(c: &[BigUint], j: &BigUint, p: &BigUint) -> BigUint {
    let mut acc = BigUint::one();
    let mut j_pow_k = BigUint::one();
    for c_k in c {
        acc = mod_mul(&acc, &mod_pow(c_k, &j_pow_k, p), p);
        j_pow_k = &j_pow_k * j;
    }
    acc
}

/// Computes the Lagrange coefficient `λ_{i,S} = Π_{j ∈ S, j≠i} (−j)·(i−j)^{−1} mod q`.
///
/// # Panics
/// Panics if `i` does not appear in `subset`, or if `subset` contains a duplicate id — both are
/// caller preconditions (the combiner is responsible for deduplicating its chosen subset).
pub fn lagrange_coefficient(i: &BigUint, subset: &[BigUint], q: &BigUint) -> BigUint {
    assert!(subset.contains(i), "i must be a member of its own subset");
    let mut numerator = BigUint::one();
    let mut denominator = BigUint::one();
    for j in subset {
        if j == i {
            continue;
        }
        numerator = mod_mul(&numerator, &mod_neg(j, q), q);
        let diff = mod_add_signed(i, j, q);
        denominator = mod_mul(&denominator, &diff, q);
    }
    let denom_inv = mod_inverse(&denominator, q);
    mod_mul(&numerator, &denom_inv, q)
}

/// Computes `(i − j) mod q` for `i, j ∈ [0, q)`, without relying on unsigned subtraction
/// underflowing.
fn mod_add_signed(i: &BigUint, j: &BigUint, q: &BigUint) -> BigUint {
    if i >= j {
        (i - j) % q
    } else {
        mod_neg(&(j - i), q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::toy;

    fn biguint(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn eval_matches_direct_sum() {
        // f(z) = 3 + 5z + 2z^2 over q = 11
        let poly = Polynomial::from_coefficients(vec![biguint(3), biguint(5), biguint(2)]);
        let q = biguint(11);
        for z in 0..5u64 {
            let direct = (3 + 5 * z + 2 * z * z) % 11;
            assert_eq!(poly.eval(&biguint(z), &q), biguint(direct));
        }
    }

    #[test]
    fn commit_then_phi_matches_eval_in_exponent() {
        let params = toy::params();
        let poly = Polynomial::from_coefficients(vec![biguint(3), biguint(5), biguint(2)]);
        let commitments = poly.commit(&params.g, &params.p);
        for j in 1..=4u64 {
            let j_big = biguint(j);
            let expected = mod_pow(&params.g, &poly.eval(&j_big, &params.q), &params.p);
            assert_eq!(phi(&commitments, &j_big, &params.p), expected);
        }
    }

    #[test]
    fn combine_commitments_is_elementwise() {
        let p = biguint(23);
        let a = vec![biguint(4), biguint(9)];
        let b = vec![biguint(6), biguint(2)];
        let combined = combine_commitments(&a, &b, &p).unwrap();
        assert_eq!(combined, vec![mod_mul(&biguint(4), &biguint(6), &p), mod_mul(&biguint(9), &biguint(2), &p)]);
    }

    #[test]
    fn combine_commitments_rejects_length_mismatch() {
        let p = biguint(23);
        let a = vec![biguint(4)];
        let b = vec![biguint(6), biguint(2)];
        assert!(combine_commitments(&a, &b, &p).is_err());
    }

    #[test]
    fn lagrange_coefficients_reconstruct_constant_term() {
        // f(z) = 7 + 3z over q = 11, evaluated at ids 1..=4, reconstructed from any 2 points.
        let q = biguint(11);
        let poly = Polynomial::from_coefficients(vec![biguint(7), biguint(3)]);
        let subset: Vec<BigUint> = vec![biguint(1), biguint(2)];
        let mut reconstructed = BigUint::zero();
        for i in &subset {
            let share = poly.eval(i, &q);
            let lambda = lagrange_coefficient(i, &subset, &q);
            reconstructed = (reconstructed + mod_mul(&share, &lambda, &q)) % &q;
        }
        assert_eq!(reconstructed, poly.eval(&BigUint::zero(), &q));
    }
}
