//! Mutex-guarded append-only lists.
//!
//! A [`DkgPeer`](crate::peer::DkgPeer) holds three of these — one per stage's inbound traffic —
//! each behind its own `parking_lot::Mutex`, because the three grow independently and an append to
//! one must never block on the other two.

use num_bigint::BigUint;
use parking_lot::Mutex;

/// A qualified peer's stage-1-derived share of the group private key, `{id, share}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedShare {
    /// Contributing peer id.
    pub id: usize,
    /// `f_id(receiver) mod q`.
    pub share: BigUint,
}

/// A qualified peer's contribution to the group public key, `{id, publicVal}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedPublicVal {
    /// Contributing peer id.
    pub id: usize,
    /// `g^{a_{id,0}} mod p`, the constant term of peer `id`'s committed polynomial.
    pub public_val: BigUint,
}

/// An append-only list of `T`, guarded by an uncontended `parking_lot::Mutex`.
///
/// No deduplication is performed — callers (the controller, not this crate) are responsible for
/// admitting at most one entry per peer per stage.
#[derive(Debug)]
pub struct Aggregator<T> {
    items: Mutex<Vec<T>>,
}

impl<T> Aggregator<T> {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Creates an aggregator pre-seeded with a single entry, used to seed a peer's own
    /// self-qualified contribution at construction.
    pub fn seeded(initial: T) -> Self {
        Self {
            items: Mutex::new(vec![initial]),
        }
    }

    /// Appends `item` and returns the aggregator's length after the append, so the controller can
    /// detect the `t+1`-th arrival without a separate locked read.
    pub fn push(&self, item: T) -> usize {
        let mut guard = self.items.lock();
        guard.push(item);
        guard.len()
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Whether the aggregator is currently empty.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Clears all entries, used between decryption sessions to reset `DecryptionShares`.
    pub fn reset(&self) {
        self.items.lock().clear();
    }
}

impl<T: Clone> Aggregator<T> {
    /// Returns a snapshot copy of the current contents.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().clone()
    }
}

impl<T> Default for Aggregator<T> {
    fn default() -> Self {
        Self::new()
    }
}
