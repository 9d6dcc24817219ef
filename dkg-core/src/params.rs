//! Group parameters shared by all peers.
//!
//! Parameter generation itself (choosing a safe prime `p`, a subgroup order `q | p-1`, and
//! generators `g, g', h` of that subgroup with `log_g h` unknown) is out of scope for this crate —
//! it is the job of a trusted setup routine external to the protocol (see SPEC_FULL.md §1). What
//! this module owns is holding those values immutably and rejecting structurally nonsensical input
//! before it reaches the rest of the crate.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::DkgError;

/// Immutable group parameters `(p, q, g, g', h)` plus the fixed `(n, t)` committee shape.
///
/// All arithmetic on secret exponents happens mod `q`; all arithmetic on group elements happens
/// mod `p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupParams {
    /// Large prime modulus.
    pub p: BigUint,
    /// Prime order of the subgroup generated by `g`, `g'`, `h`. Divides `p - 1`.
    pub q: BigUint,
    /// Generator of the order-`q` subgroup.
    pub g: BigUint,
    /// A second, independent generator of the order-`q` subgroup.
    pub g_prime: BigUint,
    /// A third generator with `log_g h` unknown to any party (Pedersen binding).
    pub h: BigUint,
    /// Total number of peers.
    pub n: usize,
    /// Maximum number of tolerated faulty peers. Any `t+1` honest peers can reconstruct.
    pub t: usize,
}

impl GroupParams {
    /// Constructs a new [`GroupParams`], validating the structural invariants the rest of the
    /// crate relies on.
    ///
    /// This does **not** verify that `p` is prime, that `q` divides `p - 1`, or that `g`, `g'`,
    /// `h` actually generate an order-`q` subgroup — those are the trusted setup's responsibility
    /// and cannot be checked cheaply from the generators alone. What is checked:
    /// - `1 <= t < n`,
    /// - `q > n` (so every peer id `1..=n` is invertible mod `q`),
    /// - `q` is odd (a necessary condition for an odd prime),
    /// - `g`, `g'`, `h` are nonzero and reduced mod `p`, and pairwise distinct.
    pub fn new(
        p: BigUint,
        q: BigUint,
        g: BigUint,
        g_prime: BigUint,
        h: BigUint,
        n: usize,
        t: usize,
    ) -> Result<Self, DkgError> {
        if !(t >= 1 && t < n) {
            return Err(DkgError::PreconditionViolated("require 1 <= t < n"));
        }
        if q <= BigUint::from(n) {
            return Err(DkgError::PreconditionViolated(
                "q must exceed the number of peers n",
            ));
        }
        if (&q % BigUint::from(2u8)).is_zero() {
            return Err(DkgError::PreconditionViolated("q must be odd"));
        }
        for (name, elem) in [("g", &g), ("g_prime", &g_prime), ("h", &h)] {
            if elem.is_zero() || *elem >= p {
                return Err(DkgError::PreconditionViolated(match name {
                    "g" => "g must be a nonzero residue mod p",
                    "g_prime" => "g' must be a nonzero residue mod p",
                    _ => "h must be a nonzero residue mod p",
                }));
            }
        }
        if g == g_prime || g == h || g_prime == h {
            return Err(DkgError::PreconditionViolated(
                "g, g' and h must be pairwise distinct",
            ));
        }
        Ok(Self {
            p,
            q,
            g,
            g_prime,
            h,
            n,
            t,
        })
    }

    /// Returns `t + 1`, the number of coefficients in a degree-`t` polynomial and the minimum
    /// qualified-committee size.
    pub fn threshold_plus_one(&self) -> usize {
        self.t + 1
    }

    /// Reduces a peer id `1..=n` to its `ℤ_q` representative `BigUint::from(id)`.
    pub fn id_as_scalar(&self, id: usize) -> BigUint {
        BigUint::from(id as u64)
    }
}

#[cfg(test)]
pub(crate) mod toy {
    //! The `(n,t)=(4,1)` toy parameters used throughout this crate's tests, taken verbatim from
    //! SPEC_FULL.md §8: `p=23, q=11, g=4, g'=6, h=9`.
    use super::*;

    pub(crate) fn params() -> GroupParams {
        GroupParams::new(
            BigUint::from(23u32),
            BigUint::from(11u32),
            BigUint::from(4u32),
            BigUint::from(6u32),
            BigUint::from(9u32),
            4,
            1,
        )
        .expect("toy parameters are valid")
    }
}
