//! Pure protocol algebra for a Pedersen-VSS distributed key generation and Shoup–Gennaro-style
//! threshold cryptosystem over `ℤ_p^*`.
//!
//! This crate has no knowledge of transport, wire encoding, or process configuration — see
//! `dkg-types` for wire payload schemas and `dkg-node` for a reference CLI/transport wiring. The
//! dependency order between modules mirrors the protocol's own layering: field ops, then
//! polynomials/commitments, then VSS, then the aggregators and key assembler, then
//! encryption/decryption, then combination, with [`peer::DkgPeer`] composing all of it behind the
//! six-stage state machine.

pub mod aggregator;
pub mod bigint;
pub mod combine;
pub mod decryption;
pub mod encryption;
pub mod error;
pub mod hash;
pub mod keygen;
pub mod params;
pub mod peer;
pub mod poly;
pub mod vss;

pub use aggregator::{Aggregator, QualifiedPublicVal, QualifiedShare};
pub use decryption::{CiphertextSlot, DecryptionShare};
pub use encryption::Ciphertext;
pub use error::DkgError;
pub use params::GroupParams;
pub use peer::{DkgPeer, Stage};
