//! The outbound transport contract (§6) and an in-process implementation for local simulation.
//!
//! `dkg-core` never sends a message itself; a controller built on top of it (this crate's demo
//! binary, or a real HTTP-backed service) calls [`PeerTransport::send`] once per recipient. The
//! [`InProcessTransport`] shipped here backs the demo binary and integration tests; a production
//! deployment supplies its own implementation over the real network.

use std::collections::HashMap;

use async_trait::async_trait;
use dkg_types::{CiphertextPayload, DecryptionSharePayload, ShareStage1Payload, ShareStage2Payload};
use tokio::sync::mpsc;

/// One message a peer can send to another, tagging the payload with which stage it belongs to.
#[derive(Debug, Clone)]
pub enum PeerMessage {
    /// A stage-1 `{id, share1, share2, combinedPublicVals}` broadcast.
    Stage1(ShareStage1Payload),
    /// A stage-2 `{id, share, publicVals}` broadcast.
    Stage2(ShareStage2Payload),
    /// A newly encrypted ciphertext, broadcast to the committee for decryption.
    Ciphertext(CiphertextPayload),
    /// A peer's decryption share of the active ciphertext.
    DecryptionShare(DecryptionSharePayload),
}

/// `send(payload, url)` from §6, generalized over peer id instead of a raw URL: best-effort,
/// no acknowledgement, no retry. Failures are silent at this layer.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Sends `message` to peer `to`. Implementations must not block on delivery confirmation.
    async fn send(&self, to: usize, message: PeerMessage);
}

/// Sends `message` to every id in `recipients` concurrently, matching the "`n-1` independent
/// sends, no ordering between them" contract.
pub async fn broadcast(transport: &dyn PeerTransport, recipients: &[usize], message: PeerMessage) {
    let sends = recipients.iter().map(|&to| transport.send(to, message.clone()));
    futures::future::join_all(sends).await;
}

/// An in-process transport backed by one `tokio::sync::mpsc` channel per peer.
///
/// Used by the demo binary and integration tests to exercise the full protocol without standing
/// up real network servers. Each peer owns the receiving half of its own channel; `send` looks up
/// the recipient's sender and pushes the message, dropping it silently if the recipient's channel
/// is gone (mirroring "failures are silent at this layer").
pub struct InProcessTransport {
    senders: HashMap<usize, mpsc::Sender<PeerMessage>>,
}

impl InProcessTransport {
    /// Builds a transport wiring `peer_ids` together, returning the transport plus each peer's
    /// inbound receiver (`(peer_id, receiver)` pairs, in the same order as `peer_ids`).
    ///
    /// The channel item is the bare [`PeerMessage`] — the recipient already knows its own id from
    /// owning the receiver, and every message that needs a sender id (everything but
    /// `Ciphertext`) already carries one in its payload.
    pub fn new(peer_ids: &[usize], channel_capacity: usize) -> (Self, Vec<(usize, mpsc::Receiver<PeerMessage>)>) {
        let mut senders = HashMap::with_capacity(peer_ids.len());
        let mut receivers = Vec::with_capacity(peer_ids.len());
        for &id in peer_ids {
            let (tx, rx) = mpsc::channel(channel_capacity);
            senders.insert(id, tx);
            receivers.push((id, rx));
        }
        (Self { senders }, receivers)
    }
}

#[async_trait]
impl PeerTransport for InProcessTransport {
    async fn send(&self, to: usize, message: PeerMessage) {
        if let Some(sender) = self.senders.get(&to) {
            // A full or closed channel means the recipient is gone or overwhelmed; the transport
            // contract is best-effort, so we drop the message rather than block or retry.
            let _ = sender.try_send(message);
        } else {
            tracing::debug!(peer = to, "send to unknown peer id, dropping");
        }
    }
}
