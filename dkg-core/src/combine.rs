//! Lagrange combination of decryption shares into the recovered message.

use std::ops::BitXor;

use num_bigint::BigUint;

use crate::decryption::DecryptionShare;
use crate::encryption::Ciphertext;
use crate::error::DkgError;
use crate::hash::h1;
use crate::params::GroupParams;
use crate::poly::lagrange_coefficient;

/// Combines the first `t+1` of `shares` (in arrival order) into the recovered message.
///
/// # Errors
/// Returns [`DkgError::PreconditionViolated`] if `shares.len() < t+1`. Callers are responsible for
/// ensuring every share already passed [`crate::decryption::verify_decryption_share`].
pub fn combine_shares(
    params: &GroupParams,
    shares: &[DecryptionShare],
    ciphertext: &Ciphertext,
) -> Result<BigUint, DkgError> {
    let needed = params.threshold_plus_one();
    if shares.len() < needed {
        return Err(DkgError::PreconditionViolated(
            "fewer than t+1 decryption shares available to combine",
        ));
    }
    combine(params, &shares[..needed], ciphertext)
}

/// Combines exactly the shares in `shares` whose ids match `subset`, in the order `subset` gives,
/// for callers that need to exercise a specific `t+1`-subset rather than arrival order.
///
/// # Errors
/// Returns [`DkgError::PreconditionViolated`] if `subset` has fewer than `t+1` ids, contains a
/// duplicate, or names an id not present in `shares`.
pub fn combine_with_subset(
    params: &GroupParams,
    shares: &[DecryptionShare],
    ciphertext: &Ciphertext,
    subset: &[usize],
) -> Result<BigUint, DkgError> {
    let needed = params.threshold_plus_one();
    if subset.len() < needed {
        return Err(DkgError::PreconditionViolated(
            "subset has fewer than t+1 ids",
        ));
    }
    let mut unique = subset.to_vec();
    unique.sort_unstable();
    unique.dedup();
    if unique.len() != subset.len() {
        return Err(DkgError::PreconditionViolated(
            "subset contains a duplicate id",
        ));
    }

    let mut selected = Vec::with_capacity(subset.len());
    for id in subset {
        let share = shares
            .iter()
            .find(|s| s.id == *id)
            .ok_or(DkgError::PreconditionViolated(
                "subset names an id with no corresponding decryption share",
            ))?;
        selected.push(share.clone());
    }
    combine(params, &selected, ciphertext)
}

fn combine(params: &GroupParams, selected: &[DecryptionShare], ciphertext: &Ciphertext) -> Result<BigUint, DkgError> {
    let subset_ids: Vec<BigUint> = selected.iter().map(|s| params.id_as_scalar(s.id)).collect();

    let mut u = BigUint::from(1u32);
    for (share, id) in selected.iter().zip(&subset_ids) {
        let lambda = lagrange_coefficient(id, &subset_ids, &params.q);
        u = (u * crate::bigint::mod_pow(&share.u, &lambda, &params.p)) % &params.p;
    }

    Ok(h1(&u).bitxor(&ciphertext.c))
}
