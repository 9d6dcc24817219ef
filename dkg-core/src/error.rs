//! Error type for the distributed key generation and threshold cryptosystem core.
//!
//! Mirrors the error-kinds table of the protocol: malformed wire payloads and failed algebraic
//! checks are always recoverable by the caller (drop the message), while a violated precondition
//! is a programmer error at the call site and a cancelled suspension is reported explicitly rather
//! than hanging forever.

/// All errors produced by `dkg-core`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DkgError {
    /// A commitment or public-value vector did not have the expected `t+1` length.
    #[error("malformed payload: expected {expected} commitments, got {got}")]
    MalformedPayload {
        /// Expected vector length (`t+1`).
        expected: usize,
        /// Actual vector length.
        got: usize,
    },

    /// A stage-1, stage-2, ciphertext, or decryption-share algebraic check did not hold.
    #[error("verification failed: {0}")]
    VerificationFailed(&'static str),

    /// An operation was invoked without its required precondition being met, e.g. combining
    /// shares with fewer than `t+1` qualified contributions, or reading a key before it was set.
    #[error("precondition violated: {0}")]
    PreconditionViolated(&'static str),

    /// A suspended operation (currently only waiting for a ciphertext to be installed) was
    /// cancelled before its condition became true.
    #[error("operation cancelled")]
    Cancelled,
}
