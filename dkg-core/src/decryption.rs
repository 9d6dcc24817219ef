//! Per-peer decryption shares, their Chaum–Pedersen NIZK, and the cancellable wait for the
//! ciphertext a share is checked against.

use num_bigint::BigUint;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::bigint::{mod_neg, mod_pow, sample_nonzero_below};
use crate::encryption::Ciphertext;
use crate::error::DkgError;
use crate::hash::h3;
use crate::params::GroupParams;

/// `{id, u_i, e_i, f_i, h_i}`: peer `id`'s partial decryption of the currently active ciphertext,
/// with a proof that `u_i` and `h_i` share the discrete log `x_i` relative to `u` and `g`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionShare {
    /// Contributing peer id.
    pub id: usize,
    /// `u^{x_i}`.
    pub u: BigUint,
    /// Fiat–Shamir challenge.
    pub e: BigUint,
    /// Schnorr-style response, reduced mod `q`.
    pub f: BigUint,
    /// `g^{x_i}`, the peer's public verification key, carried with every share.
    pub h: BigUint,
}

/// Produces peer `id`'s decryption share of `ciphertext` under private key share `private_key`,
/// sampling a fresh nonce `s_i` via `rng`.
pub fn decrypt_share<R: rand::CryptoRng + rand::RngCore>(
    rng: &mut R,
    params: &GroupParams,
    id: usize,
    private_key: &BigUint,
    ciphertext: &Ciphertext,
) -> DecryptionShare {
    let s_i = sample_nonzero_below(rng, &params.q);

    let u_i = mod_pow(&ciphertext.u, private_key, &params.p);
    let h_i = mod_pow(&params.g, private_key, &params.p);
    let u_i_prime = mod_pow(&ciphertext.u, &s_i, &params.p);
    let h_i_prime = mod_pow(&params.g, &s_i, &params.p);

    let e_i = h3(&u_i, &u_i_prime, &h_i_prime, &params.q);
    let f_i = (s_i + private_key * &e_i) % &params.q;

    DecryptionShare {
        id,
        u: u_i,
        e: e_i,
        f: f_i,
        h: h_i,
    }
}

/// Verifies a decryption share's NIZK against the ciphertext it was produced for, by recomputing
/// `u_i' = u^{f_i} · u_i^{-e_i}`, `h_i' = g^{f_i} · h_i^{-e_i}` and checking `e_i == H3(u_i, u_i', h_i')`.
pub fn verify_decryption_share(
    params: &GroupParams,
    u: &BigUint,
    share: &DecryptionShare,
) -> Result<(), DkgError> {
    let neg_e = mod_neg(&share.e, &params.q);

    let u_i_prime = (mod_pow(u, &share.f, &params.p) * mod_pow(&share.u, &neg_e, &params.p)) % &params.p;
    let h_i_prime = (mod_pow(&params.g, &share.f, &params.p) * mod_pow(&share.h, &neg_e, &params.p)) % &params.p;

    let expected_e = h3(&share.u, &u_i_prime, &h_i_prime, &params.q);
    if expected_e == share.e {
        Ok(())
    } else {
        Err(DkgError::VerificationFailed("decryption share NIZK does not verify"))
    }
}

/// Holds the ciphertext currently active for decryption, with a cancellable wait for callers that
/// race validation against its arrival.
///
/// Installing a new ciphertext wakes every waiter; resetting clears the slot between sessions
/// (§3's lifecycle note — aggregators and the ciphertext reset together, driven by the controller).
#[derive(Debug, Default)]
pub struct CiphertextSlot {
    current: Mutex<Option<Ciphertext>>,
    notify: Notify,
}

impl CiphertextSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `ciphertext` as the currently active one and wakes all waiters.
    pub fn install(&self, ciphertext: Ciphertext) {
        *self.current.lock() = Some(ciphertext);
        self.notify.notify_waiters();
    }

    /// Returns the currently installed ciphertext, if any, without waiting.
    pub fn current(&self) -> Option<Ciphertext> {
        self.current.lock().clone()
    }

    /// Clears the slot, e.g. between decryption sessions.
    pub fn reset(&self) {
        *self.current.lock() = None;
    }

    /// Waits until a ciphertext is installed, or `cancel` fires.
    ///
    /// Implemented as a loop over `Notify::notified()` rather than a single await: a ciphertext
    /// installed and then reset between the check and the notification would otherwise be missed.
    pub async fn wait(&self, cancel: &CancellationToken) -> Result<Ciphertext, DkgError> {
        loop {
            if let Some(ct) = self.current() {
                return Ok(ct);
            }
            let notified = self.notify.notified();
            tokio::select! {
                _ = notified => continue,
                _ = cancel.cancelled() => return Err(DkgError::Cancelled),
            }
        }
    }
}

/// Verifies `share` against whatever ciphertext is (or becomes) active in `slot`, suspending if
/// none is installed yet. Suspension is cancellable via `cancel` rather than a busy spin.
pub async fn is_decryption_share_valid(
    params: &GroupParams,
    slot: &CiphertextSlot,
    share: &DecryptionShare,
    cancel: &CancellationToken,
) -> Result<(), DkgError> {
    let ciphertext = slot.wait(cancel).await?;
    verify_decryption_share(params, &ciphertext.u, share)
}
