//! Runs `n` peers through the full protocol — VSS, key assembly, encryption, threshold
//! decryption — in a single process over [`InProcessTransport`], narrating each stage transition.
//!
//! This binary exists to give the crate an end-to-end smoke test a human can run and read; it is
//! not how a real deployment would be launched (a real deployment runs one process per peer,
//! talking over a real `PeerTransport`, using [`DkgNodeConfig`](taceo_dkg_node::config::DkgNodeConfig)).

use std::sync::Arc;

use clap::Parser;
use dkg_core::peer::DkgPeer;
use dkg_core::{Ciphertext, DecryptionShare, GroupParams};
use dkg_types::{CiphertextPayload, DecryptionSharePayload, PeerId, ShareStage1Payload, ShareStage2Payload};
use num_bigint::BigUint;
use rand::SeedableRng;
use rand::rngs::StdRng;
use taceo_dkg_node::transport::{InProcessTransport, PeerMessage, PeerTransport};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Toy group parameters from the protocol's own test scenarios: *not* a real trusted setup, only
/// large enough to demonstrate the protocol end to end.
const TOY_P: u32 = 23;
const TOY_Q: u32 = 11;
const TOY_G: u32 = 4;
const TOY_G_PRIME: u32 = 6;
const TOY_H: u32 = 9;

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Number of peers `n`.
    #[clap(long, default_value = "4")]
    num_parties: usize,

    /// Fault threshold `t`; any `t+1` peers reconstruct.
    #[clap(long, default_value = "1")]
    threshold: usize,

    /// The message to encrypt and recover, as a small integer.
    #[clap(long, default_value = "7")]
    message: u64,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    taceo_dkg_node::init_tracing();
    let args = DemoArgs::parse();

    let params = GroupParams::new(
        BigUint::from(TOY_P),
        BigUint::from(TOY_Q),
        BigUint::from(TOY_G),
        BigUint::from(TOY_G_PRIME),
        BigUint::from(TOY_H),
        args.num_parties,
        args.threshold,
    )?;

    let all_ids: Vec<usize> = (1..=args.num_parties).collect();
    let (transport, receivers) = InProcessTransport::new(&all_ids, 64);
    let transport = Arc::new(transport);
    let cancel = CancellationToken::new();

    // The first `t+1` peers contribute decryption shares, matching scenario S3's "minimum
    // qualified subset" framing.
    let contributing_ids: Vec<usize> = all_ids.iter().take(args.threshold + 1).copied().collect();

    let mut rng = StdRng::from_entropy();
    let mut handles = Vec::with_capacity(all_ids.len());
    for (id, inbox) in receivers {
        let peer = Arc::new(DkgPeer::new(&mut rng, id, params.clone()));
        let transport = transport.clone();
        let all_ids = all_ids.clone();
        let contributing_ids = contributing_ids.clone();
        let cancel = cancel.clone();
        handles.push(tokio::spawn(run_peer(
            peer,
            transport,
            inbox,
            all_ids,
            contributing_ids,
            args.message,
            cancel,
        )));
    }

    let mut recovered_messages = Vec::with_capacity(handles.len());
    for handle in handles {
        recovered_messages.push(handle.await??);
    }

    let expected = BigUint::from(args.message);
    if recovered_messages.iter().all(|m| *m == expected) {
        tracing::info!(message = args.message, "every peer recovered the message");
        Ok(())
    } else {
        eyre::bail!("peers disagreed on the recovered message: {recovered_messages:?}");
    }
}

async fn run_peer(
    peer: Arc<DkgPeer>,
    transport: Arc<InProcessTransport>,
    mut inbox: mpsc::Receiver<PeerMessage>,
    all_ids: Vec<usize>,
    contributing_ids: Vec<usize>,
    message: u64,
    cancel: CancellationToken,
) -> eyre::Result<BigUint> {
    let others: Vec<usize> = all_ids.iter().copied().filter(|&id| id != peer.id()).collect();
    let mut rng = StdRng::from_entropy();

    peer.begin_share1()?;
    for &to in &others {
        let (share1, share2) = peer.stage1_share_for(to);
        let payload = ShareStage1Payload {
            id: PeerId::from(peer.id()),
            share1,
            share2,
            combined_public_vals: peer.combined_public_vals().to_vec(),
        };
        transport.send(to, PeerMessage::Stage1(payload)).await;
    }
    tracing::info!(id = peer.id(), "broadcast stage-1 shares");

    let mut stage1_received = 0;
    while stage1_received < others.len() {
        let msg = recv_or_bail(&mut inbox).await?;
        if let PeerMessage::Stage1(payload) = msg {
            let from = usize::from(payload.id);
            peer.ingest_stage1(from, &payload.share1, &payload.share2, &payload.combined_public_vals)?;
            stage1_received += 1;
        }
    }
    peer.begin_share2()?;
    tracing::info!(id = peer.id(), "qualified stage-1 for all peers, entering stage 2");

    for &to in &others {
        let share = peer.stage2_share_for(to);
        let payload = ShareStage2Payload {
            id: PeerId::from(peer.id()),
            share,
            public_vals: peer.public_vals1().to_vec(),
        };
        transport.send(to, PeerMessage::Stage2(payload)).await;
    }

    let mut stage2_received = 0;
    while stage2_received < others.len() {
        let msg = recv_or_bail(&mut inbox).await?;
        if let PeerMessage::Stage2(payload) = msg {
            let from = usize::from(payload.id);
            peer.ingest_stage2(from, &payload.share, &payload.public_vals)?;
            stage2_received += 1;
        }
    }

    peer.finalize_keys()?;
    tracing::info!(id = peer.id(), public_key = %peer.public_key()?, "keys assembled");

    let leader = all_ids[0];
    if peer.id() == leader {
        let ct = peer.encrypt(&mut rng, &BigUint::from(message))?;
        tracing::info!(id = peer.id(), "encrypted message, broadcasting ciphertext");
        for &to in &others {
            transport.send(to, PeerMessage::Ciphertext(CiphertextPayload::from(&ct))).await;
        }
        peer.begin_decryption(ct)?;
    } else {
        loop {
            let msg = recv_or_bail(&mut inbox).await?;
            if let PeerMessage::Ciphertext(payload) = msg {
                peer.begin_decryption(Ciphertext::from(&payload))?;
                break;
            }
        }
    }

    if contributing_ids.contains(&peer.id()) {
        let share = peer.decrypt_share(&mut rng)?;
        tracing::info!(id = peer.id(), "produced decryption share");
        peer.ingest_decryption_share(share.clone(), &cancel).await?;
        for &to in &others {
            transport
                .send(to, PeerMessage::DecryptionShare(DecryptionSharePayload::from(&share)))
                .await;
        }
    }

    while peer.decryption_share_count() < peer.params().threshold_plus_one() {
        let msg = recv_or_bail(&mut inbox).await?;
        if let PeerMessage::DecryptionShare(payload) = msg {
            let share = DecryptionShare::from(&payload);
            peer.ingest_decryption_share(share, &cancel).await?;
        }
    }

    peer.begin_combine()?;
    let recovered = peer.finish_combine()?;
    tracing::info!(id = peer.id(), recovered = %recovered, "combined decryption shares");
    Ok(recovered)
}

async fn recv_or_bail(inbox: &mut mpsc::Receiver<PeerMessage>) -> eyre::Result<PeerMessage> {
    inbox
        .recv()
        .await
        .ok_or_else(|| eyre::eyre!("inbox closed before the protocol completed"))
}
