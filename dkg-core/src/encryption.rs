//! CCA-secure encryption under the group's combined public key, with a Chaum–Pedersen NIZK of
//! `log_g u = log_{g'} u'` binding the ciphertext together.

use std::ops::BitXor;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::bigint::{mod_neg, mod_pow, sample_nonzero_below};
use crate::error::DkgError;
use crate::hash::{h1, h2};
use crate::params::GroupParams;

/// `(c, u, u', e, f)`: a message masked under the group public key, plus a Chaum–Pedersen proof
/// that `u` and `u'` share the same discrete log relative to `g` and `g'` respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    /// `H1(y^r) ⊕ m`, the masked message.
    pub c: BigUint,
    /// `g^r`.
    pub u: BigUint,
    /// `g'^r`.
    pub u_prime: BigUint,
    /// Fiat–Shamir challenge.
    pub e: BigUint,
    /// Schnorr-style response, reduced mod `q`.
    pub f: BigUint,
}

/// Encrypts `m` under the group public key `y`, sampling fresh randomness `r, s` via `rng`.
///
/// `m` is treated as an arbitrary-precision integer in `[0, 2^256)`; callers encoding shorter
/// messages are expected to pad/interpret accordingly, mirroring `H1`'s fixed 256-bit output width.
pub fn encrypt<R: rand::CryptoRng + rand::RngCore>(
    rng: &mut R,
    params: &GroupParams,
    public_key: &BigUint,
    m: &BigUint,
) -> Ciphertext {
    let r = sample_nonzero_below(rng, &params.q);
    let s = sample_nonzero_below(rng, &params.q);

    let y_r = mod_pow(public_key, &r, &params.p);
    let c = h1(&y_r).bitxor(m);

    let u = mod_pow(&params.g, &r, &params.p);
    let u_prime = mod_pow(&params.g_prime, &r, &params.p);
    let w = mod_pow(&params.g, &s, &params.p);
    let w_prime = mod_pow(&params.g_prime, &s, &params.p);

    let e = h2(&c, &u, &w, &u_prime, &w_prime, &params.q);
    let f = (s + &r * &e) % &params.q;

    Ciphertext { c, u, u_prime, e, f }
}

/// Verifies a ciphertext's Chaum–Pedersen proof by recomputing `w = g^f · u^{-e}`,
/// `w' = g'^f · u'^{-e}` and checking `e == H2(c, u, w, u', w')`.
pub fn is_ciphertext_valid(params: &GroupParams, ct: &Ciphertext) -> Result<(), DkgError> {
    let u_neg_e = mod_pow(&ct.u, &mod_neg(&ct.e, &params.q), &params.p);
    let w = (mod_pow(&params.g, &ct.f, &params.p) * u_neg_e) % &params.p;

    let u_prime_neg_e = mod_pow(&ct.u_prime, &mod_neg(&ct.e, &params.q), &params.p);
    let w_prime = (mod_pow(&params.g_prime, &ct.f, &params.p) * u_prime_neg_e) % &params.p;

    let expected_e = h2(&ct.c, &ct.u, &w, &ct.u_prime, &w_prime, &params.q);
    if expected_e == ct.e {
        Ok(())
    } else {
        Err(DkgError::VerificationFailed("ciphertext NIZK does not verify"))
    }
}
