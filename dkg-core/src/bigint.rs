//! Modular arithmetic primitives over arbitrary-precision integers.
//!
//! Every secret exponent in this crate lives in `ℤ_q`; every group element lives in `ℤ_p^*`. This
//! module collects the handful of operations both layers are built from, so the rest of the crate
//! never reaches for `num_bigint` directly.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;

/// Computes `base^exp mod modulus`.
pub fn mod_pow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    base.modpow(exp, modulus)
}

/// Computes `(a * b) mod modulus`.
pub fn mod_mul(a: &BigUint, b: &BigUint, modulus: &BigUint) -> BigUint {
    (a * b) % modulus
}

/// Computes `(a + b) mod modulus`.
pub fn mod_add(a: &BigUint, b: &BigUint, modulus: &BigUint) -> BigUint {
    (a + b) % modulus
}

/// Computes the modular inverse of `a` mod `modulus` using the extended Euclidean algorithm.
///
/// # Panics
/// Panics if `a` and `modulus` are not coprime. Every call site in this crate calls this with a
/// nonzero element of `ℤ_q` for prime `q`, so a missing inverse can only indicate a broken
/// precondition upstream (e.g. a duplicate or zero id reaching Lagrange combination).
pub fn mod_inverse(a: &BigUint, modulus: &BigUint) -> BigUint {
    let a = a % modulus;
    let ext = a.to_bigint().extended_gcd(&modulus.to_bigint());
    assert!(
        ext.gcd.is_one(),
        "no modular inverse exists: gcd(a, modulus) != 1"
    );
    let modulus_i = modulus.to_bigint();
    let inv = ((ext.x % &modulus_i) + &modulus_i) % &modulus_i;
    inv.to_biguint().expect("reduced mod a positive modulus is non-negative")
}

/// Computes `-a mod modulus`, i.e. `modulus - (a mod modulus)`, normalized to `[0, modulus)`.
pub fn mod_neg(a: &BigUint, modulus: &BigUint) -> BigUint {
    let a = a % modulus;
    if a.is_zero() { a } else { modulus - a }
}

/// Samples a uniformly random integer in `[1, bound)`.
///
/// Used to sample exponents and polynomial coefficients; a uniform `[0, bound)` sample is obtained
/// by resampling [`sample_below`] without the rejection of zero, exposed separately because most
/// call sites in the protocol explicitly require a nonzero value (e.g. NIZK nonces).
pub fn sample_nonzero_below<R: rand::CryptoRng + Rng>(rng: &mut R, bound: &BigUint) -> BigUint {
    loop {
        let candidate = sample_below(rng, bound);
        if !candidate.is_zero() {
            return candidate;
        }
    }
}

/// Samples a uniformly random integer in `[0, bound)`.
pub fn sample_below<R: rand::CryptoRng + Rng>(rng: &mut R, bound: &BigUint) -> BigUint {
    assert!(!bound.is_zero(), "sampling bound must be positive");
    let bits = bound.bits();
    let bytes = bits.div_ceil(8);
    loop {
        let mut buf = vec![0u8; bytes as usize];
        rng.fill_bytes(&mut buf);
        // Mask off the high bits beyond `bits` in the top byte so the rejection rate stays small.
        let excess_bits = bytes * 8 - bits;
        if excess_bits > 0 {
            buf[0] &= 0xffu8 >> excess_bits;
        }
        let candidate = BigUint::from_bytes_be(&buf);
        if candidate < *bound {
            return candidate;
        }
    }
}

/// Helper trait bridging `BigUint` and `num_bigint::BigInt`, used only for the extended GCD in
/// [`mod_inverse`].
trait ToBigInt {
    fn to_bigint(&self) -> num_bigint::BigInt;
}

impl ToBigInt for BigUint {
    fn to_bigint(&self) -> num_bigint::BigInt {
        num_bigint::BigInt::from_biguint(num_bigint::Sign::Plus, self.clone())
    }
}
