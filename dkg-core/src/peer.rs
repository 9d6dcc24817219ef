//! `DkgPeer`: the per-party state machine composing field ops, VSS, aggregators, key assembly,
//! and threshold (de/en)cryption into the six-stage protocol described in SPEC_FULL.md §4.

use std::sync::OnceLock;

use num_bigint::BigUint;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use zeroize::Zeroize;

use crate::aggregator::{Aggregator, QualifiedPublicVal, QualifiedShare};
use crate::combine;
use crate::decryption::{self, CiphertextSlot, DecryptionShare};
use crate::encryption::{self, Ciphertext};
use crate::error::DkgError;
use crate::keygen;
use crate::params::GroupParams;
use crate::vss::{self, VssShares};

/// The six stages a [`DkgPeer`] moves through, driven entirely by externally invoked transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Constructed, polynomials sampled, not yet broadcast.
    Initial,
    /// Stage-1 payloads are being exchanged.
    SendShare1,
    /// Stage-2 payloads are being exchanged.
    SendShare2,
    /// Keys assembled; ready to encrypt or receive a ciphertext to decrypt.
    Encryption,
    /// A ciphertext is active; decryption shares are being exchanged.
    Decryption,
    /// Enough valid decryption shares are in; ready to combine.
    CombineShare,
}

/// A `OnceLock`-backed secret scalar that zeroizes its contents on drop.
///
/// Used for the private key share: readable only after [`DkgPeer::finalize_keys`] has run, and
/// erroring (not panicking) on a premature read, per §5's "set exactly once" invariant.
#[derive(Default)]
struct SecretCell(OnceLock<BigUint>);

impl SecretCell {
    fn set(&self, value: BigUint) -> Result<(), DkgError> {
        self.0
            .set(value)
            .map_err(|_| DkgError::PreconditionViolated("private key already set"))
    }

    fn get(&self) -> Result<&BigUint, DkgError> {
        self.0
            .get()
            .ok_or(DkgError::PreconditionViolated("private key not yet set"))
    }
}

impl Drop for SecretCell {
    fn drop(&mut self) {
        if let Some(v) = self.0.get_mut() {
            v.zeroize();
        }
    }
}

/// One peer's full protocol state: its own VSS polynomials, the three qualification aggregators,
/// the active ciphertext slot, and the derived keys once assembled.
pub struct DkgPeer {
    id: usize,
    params: GroupParams,
    vss: VssShares,
    stage: Mutex<Stage>,
    qualified_shares: Aggregator<QualifiedShare>,
    qualified_public_vals: Aggregator<QualifiedPublicVal>,
    decryption_shares: Aggregator<DecryptionShare>,
    ciphertext_slot: CiphertextSlot,
    private_key: SecretCell,
    public_key: OnceLock<BigUint>,
}

impl DkgPeer {
    /// Constructs a new peer, sampling its two polynomials and seeding both qualification
    /// aggregators with its own self-qualified contribution (§9's self-qualification note).
    pub fn new<R: rand::CryptoRng + rand::RngCore>(rng: &mut R, id: usize, params: GroupParams) -> Self {
        let vss = VssShares::generate(rng, &params);
        let own_share = vss.share1_for(&params, id);
        let own_public_val = vss.public_vals1()[0].clone();
        Self {
            id,
            params,
            vss,
            stage: Mutex::new(Stage::Initial),
            qualified_shares: Aggregator::seeded(QualifiedShare { id, share: own_share }),
            qualified_public_vals: Aggregator::seeded(QualifiedPublicVal {
                id,
                public_val: own_public_val,
            }),
            decryption_shares: Aggregator::new(),
            ciphertext_slot: CiphertextSlot::new(),
            private_key: SecretCell::default(),
            public_key: OnceLock::new(),
        }
    }

    /// This peer's id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The group parameters this peer was constructed with.
    pub fn params(&self) -> &GroupParams {
        &self.params
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        *self.stage.lock()
    }

    fn require_stage(&self, expected: Stage) -> Result<(), DkgError> {
        let current = *self.stage.lock();
        if current == expected {
            Ok(())
        } else {
            Err(DkgError::PreconditionViolated("operation invoked out of stage order"))
        }
    }

    fn transition(&self, from: Stage, to: Stage) -> Result<(), DkgError> {
        let mut guard = self.stage.lock();
        if *guard != from {
            return Err(DkgError::PreconditionViolated("operation invoked out of stage order"));
        }
        *guard = to;
        Ok(())
    }

    /// `(s1, s2)` this peer owes peer `peer_id` for the stage-1 broadcast.
    pub fn stage1_share_for(&self, peer_id: usize) -> (BigUint, BigUint) {
        (
            self.vss.share1_for(&self.params, peer_id),
            self.vss.share2_for(&self.params, peer_id),
        )
    }

    /// `s` this peer owes peer `peer_id` for the stage-2 broadcast (identical to `share1_for`,
    /// carried separately since stage 1 and stage 2 bind different commitment vectors).
    pub fn stage2_share_for(&self, peer_id: usize) -> BigUint {
        self.vss.share1_for(&self.params, peer_id)
    }

    /// This peer's Pedersen commitment vector, broadcast alongside every stage-1 share.
    pub fn combined_public_vals(&self) -> &[BigUint] {
        self.vss.combined_public_vals()
    }

    /// This peer's plain commitment vector, broadcast alongside every stage-2 share.
    pub fn public_vals1(&self) -> &[BigUint] {
        self.vss.public_vals1()
    }

    /// `Initial -> SendShare1`.
    pub fn begin_share1(&self) -> Result<(), DkgError> {
        self.transition(Stage::Initial, Stage::SendShare1)?;
        tracing::info!(id = self.id, "entering SendShare1");
        Ok(())
    }

    /// `SendShare1 -> SendShare2`.
    pub fn begin_share2(&self) -> Result<(), DkgError> {
        self.transition(Stage::SendShare1, Stage::SendShare2)?;
        tracing::info!(id = self.id, "entering SendShare2");
        Ok(())
    }

    /// Verifies an inbound stage-1 payload from `sender_id` and, if it verifies, records
    /// `{sender_id, s1}` in `QualifiedPeerShares`. Returns the aggregator's length after the
    /// append on success so the controller can detect the `t+1`-th arrival.
    pub fn ingest_stage1(
        &self,
        sender_id: usize,
        s1: &BigUint,
        s2: &BigUint,
        combined_public_vals: &[BigUint],
    ) -> Result<usize, DkgError> {
        if let Err(err) = vss::verify_stage1(&self.params, self.id, s1, s2, combined_public_vals) {
            tracing::debug!(id = self.id, sender = sender_id, %err, "dropping stage-1 payload");
            return Err(err);
        }
        Ok(self.qualified_shares.push(QualifiedShare {
            id: sender_id,
            share: s1.clone(),
        }))
    }

    /// Verifies an inbound stage-2 payload from `sender_id` and, if it verifies, records
    /// `{sender_id, publicVals[0]}` in `QualifiedPeerPublicVals`.
    pub fn ingest_stage2(
        &self,
        sender_id: usize,
        s: &BigUint,
        public_vals: &[BigUint],
    ) -> Result<usize, DkgError> {
        if let Err(err) = vss::verify_stage2(&self.params, self.id, s, public_vals) {
            tracing::debug!(id = self.id, sender = sender_id, %err, "dropping stage-2 payload");
            return Err(err);
        }
        Ok(self.qualified_public_vals.push(QualifiedPublicVal {
            id: sender_id,
            public_val: public_vals[0].clone(),
        }))
    }

    /// Number of peers currently qualified for stage 1.
    pub fn qualified_share_count(&self) -> usize {
        self.qualified_shares.len()
    }

    /// Number of peers currently qualified for stage 2.
    pub fn qualified_public_val_count(&self) -> usize {
        self.qualified_public_vals.len()
    }

    /// `SendShare2 -> Encryption`, assembling the private key share and group public key from the
    /// qualified aggregators.
    ///
    /// # Errors
    /// Returns [`DkgError::PreconditionViolated`] if fewer than `t+1` entries are qualified in
    /// either aggregator, without transitioning the stage.
    pub fn finalize_keys(&self) -> Result<(), DkgError> {
        self.require_stage(Stage::SendShare2).inspect_err(|err| {
            tracing::warn!(id = self.id, %err, "finalize_keys invoked out of stage order");
        })?;
        let private_key = keygen::assemble_private_key(&self.params, &self.qualified_shares.snapshot())?;
        let public_key = keygen::assemble_public_key(&self.params, &self.qualified_public_vals.snapshot())?;
        self.private_key.set(private_key)?;
        self.public_key
            .set(public_key)
            .map_err(|_| DkgError::PreconditionViolated("public key already set"))?;
        self.transition(Stage::SendShare2, Stage::Encryption)?;
        tracing::info!(id = self.id, "keys assembled, entering Encryption");
        Ok(())
    }

    /// This peer's assembled private key share, once [`finalize_keys`](Self::finalize_keys) has run.
    pub fn private_key(&self) -> Result<&BigUint, DkgError> {
        self.private_key.get()
    }

    /// The group public key, once [`finalize_keys`](Self::finalize_keys) has run.
    pub fn public_key(&self) -> Result<&BigUint, DkgError> {
        self.public_key
            .get()
            .ok_or(DkgError::PreconditionViolated("public key not yet set"))
    }

    /// Encrypts `m` under the group public key. Requires [`finalize_keys`](Self::finalize_keys) to
    /// have run; does not otherwise depend on this peer's stage, since encryption is a client-side
    /// operation against the (now public) group key rather than a peer-to-peer exchange.
    pub fn encrypt<R: rand::CryptoRng + rand::RngCore>(&self, rng: &mut R, m: &BigUint) -> Result<Ciphertext, DkgError> {
        let public_key = self.public_key()?;
        Ok(encryption::encrypt(rng, &self.params, public_key, m))
    }

    /// Installs `ciphertext` as the one currently active for decryption, waking any waiters.
    ///
    /// Safe to call regardless of stage: a peer may learn of the ciphertext via broadcast before
    /// locally transitioning into [`Stage::Decryption`] itself.
    pub fn install_ciphertext(&self, ciphertext: Ciphertext) {
        self.ciphertext_slot.install(ciphertext);
    }

    /// `Encryption -> Decryption`, installing `ciphertext` as the active one and clearing any
    /// decryption shares left over from a previous session.
    pub fn begin_decryption(&self, ciphertext: Ciphertext) -> Result<(), DkgError> {
        self.transition(Stage::Encryption, Stage::Decryption)?;
        self.decryption_shares.reset();
        self.install_ciphertext(ciphertext);
        tracing::info!(id = self.id, "entering Decryption");
        Ok(())
    }

    /// Produces this peer's decryption share of the currently active ciphertext.
    pub fn decrypt_share<R: rand::CryptoRng + rand::RngCore>(&self, rng: &mut R) -> Result<DecryptionShare, DkgError> {
        let private_key = self.private_key()?;
        let ciphertext = self
            .ciphertext_slot
            .current()
            .ok_or(DkgError::PreconditionViolated("no ciphertext installed"))?;
        Ok(decryption::decrypt_share(rng, &self.params, self.id, private_key, &ciphertext))
    }

    /// Verifies an inbound decryption share, suspending until a ciphertext is installed if none
    /// is yet known (cancellable via `cancel`). On success, records the share in
    /// `DecryptionShares` and returns the aggregator's length after the append.
    pub async fn ingest_decryption_share(
        &self,
        share: DecryptionShare,
        cancel: &CancellationToken,
    ) -> Result<usize, DkgError> {
        if let Err(err) = decryption::is_decryption_share_valid(&self.params, &self.ciphertext_slot, &share, cancel).await
        {
            tracing::debug!(id = self.id, sender = share.id, %err, "dropping decryption share");
            return Err(err);
        }
        Ok(self.decryption_shares.push(share))
    }

    /// Number of decryption shares currently recorded for the active ciphertext.
    pub fn decryption_share_count(&self) -> usize {
        self.decryption_shares.len()
    }

    /// `Decryption -> CombineShare`.
    pub fn begin_combine(&self) -> Result<(), DkgError> {
        self.transition(Stage::Decryption, Stage::CombineShare)?;
        tracing::info!(id = self.id, "entering CombineShare");
        Ok(())
    }

    /// Combines the first `t+1` recorded decryption shares and recovers the message, then
    /// transitions `CombineShare -> Encryption`, clearing the ciphertext slot and the decryption
    /// shares for the next round.
    pub fn finish_combine(&self) -> Result<BigUint, DkgError> {
        self.require_stage(Stage::CombineShare)?;
        let ciphertext = self
            .ciphertext_slot
            .current()
            .ok_or(DkgError::PreconditionViolated("no ciphertext installed"))?;
        let message = combine::combine_shares(&self.params, &self.decryption_shares.snapshot(), &ciphertext)?;
        self.decryption_shares.reset();
        self.ciphertext_slot.reset();
        self.transition(Stage::CombineShare, Stage::Encryption)?;
        tracing::info!(id = self.id, "combined decryption shares, entering Encryption");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::toy;
    use rand::SeedableRng;

    fn build_committee(n: usize, t: usize, seed: u64) -> (GroupParams, Vec<DkgPeer>) {
        let base = toy::params();
        let params = GroupParams::new(base.p, base.q, base.g, base.g_prime, base.h, n, t)
            .expect("valid toy-scale params");
        let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(seed);
        let peers = (1..=n)
            .map(|id| DkgPeer::new(&mut rng, id, params.clone()))
            .collect();
        (params, peers)
    }

    fn run_vss_and_keygen(peers: &[DkgPeer]) {
        for peer in peers {
            peer.begin_share1().unwrap();
        }
        for receiver in peers {
            for sender in peers {
                let (s1, s2) = sender.stage1_share_for(receiver.id());
                receiver
                    .ingest_stage1(sender.id(), &s1, &s2, sender.combined_public_vals())
                    .unwrap();
            }
        }
        for peer in peers {
            peer.begin_share2().unwrap();
        }
        for receiver in peers {
            for sender in peers {
                let s = sender.stage2_share_for(receiver.id());
                receiver
                    .ingest_stage2(sender.id(), &s, sender.public_vals1())
                    .unwrap();
            }
        }
        for peer in peers {
            peer.finalize_keys().unwrap();
        }
    }

    fn test_full_protocol_walk(num_parties: usize, degree: usize, message: u64) {
        let (_params, peers) = build_committee(num_parties, degree, message + 1);
        run_vss_and_keygen(&peers);

        let public_keys: Vec<BigUint> = peers.iter().map(|p| p.public_key().unwrap().clone()).collect();
        assert!(public_keys.windows(2).all(|w| w[0] == w[1]));

        let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(message + 2);
        let ct = peers[0].encrypt(&mut rng, &BigUint::from(message)).unwrap();
        assert!(encryption::is_ciphertext_valid(peers[0].params(), &ct).is_ok());

        for peer in &peers {
            peer.begin_decryption(ct.clone()).unwrap();
        }

        let cancel = CancellationToken::new();
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            for contributor in peers.iter().take(degree + 1) {
                let share = contributor.decrypt_share(&mut rng).unwrap();
                for receiver in &peers {
                    receiver.ingest_decryption_share(share.clone(), &cancel).await.unwrap();
                }
            }
        });

        for peer in &peers {
            peer.begin_combine().unwrap();
            let recovered = peer.finish_combine().unwrap();
            assert_eq!(recovered, BigUint::from(message));
            assert_eq!(peer.stage(), Stage::Encryption);
        }
    }

    #[test]
    fn full_protocol_walk_toy_scale() {
        test_full_protocol_walk(4, 1, 7);
    }

    #[test]
    fn full_protocol_walk_larger_scale() {
        test_full_protocol_walk(5, 2, 42);
    }

    #[test]
    fn stage1_tamper_is_rejected_by_honest_peers() {
        let (_params, peers) = build_committee(4, 1, 99);
        for peer in &peers {
            peer.begin_share1().unwrap();
        }
        let (mut s1, s2) = peers[1].stage1_share_for(peers[0].id());
        s1 += BigUint::from(1u32);
        let err = peers[0].ingest_stage1(peers[1].id(), &s1, &s2, peers[1].combined_public_vals());
        assert!(matches!(err, Err(DkgError::VerificationFailed(_))));
    }

    #[test]
    fn finalize_keys_out_of_stage_is_rejected() {
        let (_params, peers) = build_committee(4, 1, 3);
        assert!(matches!(peers[0].finalize_keys(), Err(DkgError::PreconditionViolated(_))));
    }

    #[test]
    fn reading_private_key_before_finalize_errors_without_panicking() {
        let (_params, peers) = build_committee(4, 1, 4);
        assert!(matches!(peers[0].private_key(), Err(DkgError::PreconditionViolated(_))));
    }

    #[tokio::test]
    async fn ingest_decryption_share_waits_for_ciphertext_then_cancels() {
        let (_params, peers) = build_committee(4, 1, 5);
        run_vss_and_keygen(&peers);
        let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(6);
        let ct = peers[0].encrypt(&mut rng, &BigUint::from(1u32)).unwrap();
        peers[0].begin_decryption(ct.clone()).unwrap();
        let share = peers[0].decrypt_share(&mut rng).unwrap();

        // peers[1] has not yet installed the ciphertext; the wait must be cancellable.
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = peers[1].ingest_decryption_share(share, &cancel).await;
        assert_eq!(result, Err(DkgError::Cancelled));
    }
}
