//! `H1`, `H2`, `H3`: the three SHA-256-based hash-to-integer functions the protocol uses.
//!
//! Each is domain-separated by a fixed one-byte tag hashed ahead of its arguments, so a value
//! computed for one purpose (masking a message, a Chaum–Pedersen challenge during encryption, a
//! Chaum–Pedersen challenge during decryption) can never be replayed as another's input even if
//! the underlying `BigUint` arguments happen to coincide. Every integer argument is hashed as its
//! big-endian byte representation prefixed with its own length, so `H(1, 23)` and `H(12, 3)`
//! cannot collide by byte concatenation alone.

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

const H1_DOMAIN: u8 = 0x01;
const H2_DOMAIN: u8 = 0x02;
const H3_DOMAIN: u8 = 0x03;

fn hash_parts(domain: u8, parts: &[&BigUint]) -> BigUint {
    let mut hasher = Sha256::new();
    hasher.update([domain]);
    for part in parts {
        let bytes = part.to_bytes_be();
        hasher.update((bytes.len() as u64).to_be_bytes());
        hasher.update(&bytes);
    }
    BigUint::from_bytes_be(&hasher.finalize())
}

/// `H1(x)`, used as the one-time-pad mask `c = H1(y^r) ⊕ m` and to invert it during combination.
///
/// Returns the full 256-bit SHA-256 digest interpreted as a big-endian integer, unreduced, since
/// it masks a message in `[0, 2^256)` rather than a group exponent.
pub fn h1(x: &BigUint) -> BigUint {
    hash_parts(H1_DOMAIN, &[x])
}

/// `H2(c, u, w, u', w')`, the Fiat–Shamir challenge for the encryption-time NIZK.
///
/// Reduced mod `q` since the result is only ever used as a group exponent.
pub fn h2(c: &BigUint, u: &BigUint, w: &BigUint, u_prime: &BigUint, w_prime: &BigUint, q: &BigUint) -> BigUint {
    hash_parts(H2_DOMAIN, &[c, u, w, u_prime, w_prime]) % q
}

/// `H3(u_i, u_i', h_i')`, the Fiat–Shamir challenge for the decryption-share NIZK.
///
/// Reduced mod `q` for the same reason as [`h2`].
pub fn h3(u_i: &BigUint, u_i_prime: &BigUint, h_i_prime: &BigUint, q: &BigUint) -> BigUint {
    hash_parts(H3_DOMAIN, &[u_i, u_i_prime, h_i_prime]) % q
}
