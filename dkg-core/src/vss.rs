//! Verifiable secret sharing: share production and the two stage verifiers.
//!
//! A [`VssShares`] is generated once per peer per epoch: two degree-`t` polynomials sampled
//! uniformly, evaluated at every peer index, and committed under `(g, h)`. The free functions
//! [`verify_stage1`] and [`verify_stage2`] check an inbound peer's claimed share against its
//! published commitment without ever learning the peer's polynomial.

use num_bigint::BigUint;
use zeroize::ZeroizeOnDrop;

use crate::bigint::{mod_mul, mod_pow};
use crate::error::DkgError;
use crate::params::GroupParams;
use crate::poly::{self, Polynomial};

/// The two polynomials a peer samples at construction, plus their public commitments.
///
/// `shares1`/`shares2` and the polynomials themselves are secret; the commitment vectors are
/// public and safe to broadcast as-is.
#[derive(ZeroizeOnDrop)]
pub struct VssShares {
    poly1: Polynomial,
    poly2: Polynomial,
    /// `public_vals1[k] = g^{a_k}`, the plain (non-Pedersen) commitment to `poly1`'s coefficients.
    /// Public by definition, but left to zeroize along with the rest of the struct for simplicity.
    public_vals1: Vec<BigUint>,
    /// `combined_public_vals[k] = g^{a_k} · h^{b_k}`, the Pedersen commitment binding both
    /// polynomials' `k`-th coefficients together.
    combined_public_vals: Vec<BigUint>,
}

impl VssShares {
    /// Samples `f_i`, `f'_i` and computes both commitment vectors.
    pub fn generate<R: rand::CryptoRng + rand::RngCore>(rng: &mut R, params: &GroupParams) -> Self {
        let poly1 = Polynomial::sample_random(rng, params.t, &params.q);
        let poly2 = Polynomial::sample_random(rng, params.t, &params.q);
        let public_vals1 = poly1.commit(&params.g, &params.p);
        let commit2 = poly2.commit(&params.h, &params.p);
        let combined_public_vals = poly::combine_commitments(&public_vals1, &commit2, &params.p)
            .expect("poly1 and poly2 share the same degree by construction");
        Self {
            poly1,
            poly2,
            public_vals1,
            combined_public_vals,
        }
    }

    /// `f_i(j) mod q` for peer id `j ∈ [1, n]` — the stage-1 share sent to peer `j`.
    pub fn share1_for(&self, params: &GroupParams, peer_id: usize) -> BigUint {
        self.poly1.eval(&params.id_as_scalar(peer_id), &params.q)
    }

    /// `f'_i(j) mod q` for peer id `j ∈ [1, n]` — the second stage-1 share sent to peer `j`.
    pub fn share2_for(&self, params: &GroupParams, peer_id: usize) -> BigUint {
        self.poly2.eval(&params.id_as_scalar(peer_id), &params.q)
    }

    /// `PublicVals1`, the plain commitment vector sent alongside the stage-2 payload.
    pub fn public_vals1(&self) -> &[BigUint] {
        &self.public_vals1
    }

    /// `CombinedPublicVals`, the Pedersen commitment vector sent alongside the stage-1 payload.
    pub fn combined_public_vals(&self) -> &[BigUint] {
        &self.combined_public_vals
    }
}

/// Verifies an inbound stage-1 payload `{id=j, s1, s2, C}` against the receiver's own id `i`.
///
/// Accepts iff `|C| = t+1` and `g^{s1} · h^{s2} ≡ Φ(C, i) mod p`.
pub fn verify_stage1(
    params: &GroupParams,
    receiver_id: usize,
    s1: &BigUint,
    s2: &BigUint,
    combined_public_vals: &[BigUint],
) -> Result<(), DkgError> {
    let expected_len = params.threshold_plus_one();
    if combined_public_vals.len() != expected_len {
        return Err(DkgError::MalformedPayload {
            expected: expected_len,
            got: combined_public_vals.len(),
        });
    }
    let lhs = mod_mul(
        &mod_pow(&params.g, s1, &params.p),
        &mod_pow(&params.h, s2, &params.p),
        &params.p,
    );
    let rhs = poly::phi(combined_public_vals, &params.id_as_scalar(receiver_id), &params.p);
    if lhs == rhs {
        Ok(())
    } else {
        Err(DkgError::VerificationFailed("stage-1 share does not open the Pedersen commitment"))
    }
}

/// Verifies an inbound stage-2 payload `{id=j, s, P}` against the receiver's own id `i`.
///
/// Accepts iff `|P| = t+1` and `g^{s} ≡ Φ(P, i) mod p`.
pub fn verify_stage2(
    params: &GroupParams,
    receiver_id: usize,
    s: &BigUint,
    public_vals: &[BigUint],
) -> Result<(), DkgError> {
    let expected_len = params.threshold_plus_one();
    if public_vals.len() != expected_len {
        return Err(DkgError::MalformedPayload {
            expected: expected_len,
            got: public_vals.len(),
        });
    }
    let lhs = mod_pow(&params.g, s, &params.p);
    let rhs = poly::phi(public_vals, &params.id_as_scalar(receiver_id), &params.p);
    if lhs == rhs {
        Ok(())
    } else {
        Err(DkgError::VerificationFailed("stage-2 share does not open the plain commitment"))
    }
}
