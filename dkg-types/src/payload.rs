//! Wire payload schemas exchanged between peers (§6). Plain `serde`-derived structs; the exact
//! transport and encoding (JSON, bincode, …) is left to the caller — see `dkg-node` for a
//! reference transport.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::biguint_serde;
use crate::peer_id::PeerId;

/// `{ id, share1, share2, combinedPublicVals }`, broadcast during stage 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareStage1Payload {
    pub id: PeerId,
    #[serde(with = "biguint_serde")]
    pub share1: BigUint,
    #[serde(with = "biguint_serde")]
    pub share2: BigUint,
    #[serde(with = "biguint_serde::vec", rename = "combinedPublicVals")]
    pub combined_public_vals: Vec<BigUint>,
}

/// `{ id, share, publicVals }`, broadcast during stage 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareStage2Payload {
    pub id: PeerId,
    #[serde(with = "biguint_serde")]
    pub share: BigUint,
    #[serde(with = "biguint_serde::vec", rename = "publicVals")]
    pub public_vals: Vec<BigUint>,
}

/// `{ c, u, u_, e, f }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextPayload {
    #[serde(with = "biguint_serde")]
    pub c: BigUint,
    #[serde(with = "biguint_serde")]
    pub u: BigUint,
    #[serde(with = "biguint_serde", rename = "u_")]
    pub u_prime: BigUint,
    #[serde(with = "biguint_serde")]
    pub e: BigUint,
    #[serde(with = "biguint_serde")]
    pub f: BigUint,
}

/// `{ id, u, e, f, h }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionSharePayload {
    pub id: PeerId,
    #[serde(with = "biguint_serde")]
    pub u: BigUint,
    #[serde(with = "biguint_serde")]
    pub e: BigUint,
    #[serde(with = "biguint_serde")]
    pub f: BigUint,
    #[serde(with = "biguint_serde")]
    pub h: BigUint,
}

impl From<&dkg_core::Ciphertext> for CiphertextPayload {
    fn from(ct: &dkg_core::Ciphertext) -> Self {
        Self {
            c: ct.c.clone(),
            u: ct.u.clone(),
            u_prime: ct.u_prime.clone(),
            e: ct.e.clone(),
            f: ct.f.clone(),
        }
    }
}

impl From<&CiphertextPayload> for dkg_core::Ciphertext {
    fn from(payload: &CiphertextPayload) -> Self {
        Self {
            c: payload.c.clone(),
            u: payload.u.clone(),
            u_prime: payload.u_prime.clone(),
            e: payload.e.clone(),
            f: payload.f.clone(),
        }
    }
}

impl From<&dkg_core::DecryptionShare> for DecryptionSharePayload {
    fn from(share: &dkg_core::DecryptionShare) -> Self {
        Self {
            id: PeerId::from(share.id),
            u: share.u.clone(),
            e: share.e.clone(),
            f: share.f.clone(),
            h: share.h.clone(),
        }
    }
}

impl From<&DecryptionSharePayload> for dkg_core::DecryptionShare {
    fn from(payload: &DecryptionSharePayload) -> Self {
        Self {
            id: payload.id.into(),
            u: payload.u.clone(),
            e: payload.e.clone(),
            f: payload.f.clone(),
            h: payload.h.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biguint(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn ciphertext_payload_round_trips_through_json() {
        let payload = CiphertextPayload {
            c: biguint(1),
            u: biguint(2),
            u_prime: biguint(3),
            e: biguint(4),
            f: biguint(5),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"u_\""));
        let round_tripped: CiphertextPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(payload, round_tripped);
    }

    #[test]
    fn stage1_payload_round_trips_through_json() {
        let payload = ShareStage1Payload {
            id: PeerId(2),
            share1: biguint(7),
            share2: biguint(8),
            combined_public_vals: vec![biguint(1), biguint(2)],
        };
        let json = serde_json::to_string(&payload).unwrap();
        let round_tripped: ShareStage1Payload = serde_json::from_str(&json).unwrap();
        assert_eq!(payload, round_tripped);
    }

    #[test]
    fn ciphertext_payload_converts_from_and_to_core_ciphertext() {
        let ct = dkg_core::Ciphertext {
            c: biguint(1),
            u: biguint(2),
            u_prime: biguint(3),
            e: biguint(4),
            f: biguint(5),
        };
        let payload = CiphertextPayload::from(&ct);
        let back = dkg_core::Ciphertext::from(&payload);
        assert_eq!(ct, back);
    }
}
