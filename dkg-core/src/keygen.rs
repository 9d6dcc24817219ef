//! Assembling the group private key share and public key from a qualified committee.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::aggregator::{QualifiedPublicVal, QualifiedShare};
use crate::error::DkgError;
use crate::params::GroupParams;

/// `x_i = Σ_{P ∈ QualifiedPeerShares} P.share mod q`, this peer's additive share of the group
/// private key.
///
/// # Errors
/// Returns [`DkgError::PreconditionViolated`] if fewer than `t+1` shares are given. Does not check
/// that the contributing ids are distinct or match [`assemble_public_key`]'s id set — that
/// cross-aggregator invariant is the controller's responsibility (§4.6).
pub fn assemble_private_key(params: &GroupParams, shares: &[QualifiedShare]) -> Result<BigUint, DkgError> {
    if shares.len() < params.threshold_plus_one() {
        return Err(DkgError::PreconditionViolated(
            "fewer than t+1 qualified shares to assemble a private key",
        ));
    }
    Ok(shares
        .iter()
        .fold(BigUint::zero(), |acc, s| (acc + &s.share) % &params.q))
}

/// `y = Π_{V ∈ QualifiedPeerPublicVals} V.publicVal mod p`, the group public key.
///
/// # Errors
/// Returns [`DkgError::PreconditionViolated`] if fewer than `t+1` public values are given.
pub fn assemble_public_key(params: &GroupParams, vals: &[QualifiedPublicVal]) -> Result<BigUint, DkgError> {
    if vals.len() < params.threshold_plus_one() {
        return Err(DkgError::PreconditionViolated(
            "fewer than t+1 qualified public vals to assemble a public key",
        ));
    }
    Ok(vals
        .iter()
        .fold(BigUint::one(), |acc, v| (acc * &v.public_val) % &params.p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::toy;

    fn biguint(v: u64) -> BigUint {
        BigUint::from(v)
    }

    fn test_assembly_matches_manual_sum(contributions: &[(usize, u64)]) {
        let params = toy::params();
        let shares: Vec<QualifiedShare> = contributions
            .iter()
            .map(|&(id, share)| QualifiedShare {
                id,
                share: biguint(share),
            })
            .collect();
        let expected = contributions.iter().map(|&(_, s)| s).sum::<u64>() % 11;
        let got = assemble_private_key(&params, &shares).unwrap();
        assert_eq!(got, biguint(expected));
    }

    #[test]
    fn sums_shares_mod_q() {
        test_assembly_matches_manual_sum(&[(1, 3), (2, 5)]);
        test_assembly_matches_manual_sum(&[(1, 9), (2, 9), (3, 9)]);
    }

    #[test]
    fn rejects_insufficient_shares() {
        let params = toy::params();
        let shares = vec![QualifiedShare { id: 1, share: biguint(3) }];
        assert!(matches!(
            assemble_private_key(&params, &shares),
            Err(DkgError::PreconditionViolated(_))
        ));
    }

    #[test]
    fn multiplies_public_vals_mod_p() {
        let params = toy::params();
        let vals = vec![
            QualifiedPublicVal { id: 1, public_val: biguint(4) },
            QualifiedPublicVal { id: 2, public_val: biguint(9) },
        ];
        let got = assemble_public_key(&params, &vals).unwrap();
        assert_eq!(got, biguint((4 * 9) % 23));
    }

    #[test]
    fn rejects_insufficient_public_vals() {
        let params = toy::params();
        let vals = vec![QualifiedPublicVal { id: 1, public_val: biguint(4) }];
        assert!(matches!(
            assemble_public_key(&params, &vals),
            Err(DkgError::PreconditionViolated(_))
        ));
    }
}
