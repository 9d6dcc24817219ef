//! Wire payload schemas for the distributed key generation and threshold cryptosystem protocol.
//!
//! These are plain `serde`-derived structs with no protocol logic of their own; `dkg-core` stays
//! free of any wire-format concern, and this crate stays free of any algebra. Conversions to and
//! from the corresponding `dkg-core` types are provided so a transport layer only ever has to
//! serialize/deserialize, never reach into `dkg-core` internals.

pub mod biguint_serde;
pub mod payload;
pub mod peer_id;

pub use payload::{CiphertextPayload, DecryptionSharePayload, ShareStage1Payload, ShareStage2Payload};
pub use peer_id::PeerId;
