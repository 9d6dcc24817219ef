//! Configuration types and CLI/environment parsing for a `dkg-node` instance.
//!
//! Mirrors the ambient stack's convention of a single `clap::Parser`-derived config struct with
//! one `env = "DKG_NODE_*"` variable per field, loadable from either CLI flags or the environment.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use num_bigint::BigUint;

/// The environment a node is running in. Only `Dev` permits the in-process demo transport; a
/// production deployment is expected to supply its own [`crate::transport::PeerTransport`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Environment {
    /// Production environment.
    Prod,
    /// Development environment.
    Dev,
}

impl Environment {
    /// Asserts that `Environment` is `dev`. Panics if not the case.
    pub fn assert_is_dev(&self) {
        assert!(matches!(self, Environment::Dev), "is not dev environment")
    }
}

/// The group parameters and committee shape a node is launched with.
///
/// Parameters are assumed supplied by a trusted setup (§1/§3 of the spec this crate implements);
/// this config only carries them from CLI/environment into a [`dkg_core::GroupParams`].
#[derive(Parser, Debug)]
pub struct DkgNodeConfig {
    /// The environment this node is running in (either `prod` or `dev`).
    #[clap(long, env = "DKG_NODE_ENVIRONMENT", default_value = "prod")]
    pub environment: Environment,

    /// This node's peer id, in `[1, n]`.
    #[clap(long, env = "DKG_NODE_ID")]
    pub id: usize,

    /// Total number of peers `n`.
    #[clap(long, env = "DKG_NODE_NUM_PARTIES")]
    pub n: usize,

    /// Fault threshold `t`; any `t+1` peers can reconstruct.
    #[clap(long, env = "DKG_NODE_THRESHOLD")]
    pub t: usize,

    /// Group modulus `p`, as a decimal string.
    #[clap(long, env = "DKG_NODE_P")]
    pub p: String,

    /// Subgroup order `q`, as a decimal string.
    #[clap(long, env = "DKG_NODE_Q")]
    pub q: String,

    /// Generator `g`, as a decimal string.
    #[clap(long, env = "DKG_NODE_G")]
    pub g: String,

    /// Generator `g'`, as a decimal string.
    #[clap(long, env = "DKG_NODE_G_PRIME")]
    pub g_prime: String,

    /// Generator `h`, as a decimal string.
    #[clap(long, env = "DKG_NODE_H")]
    pub h: String,

    /// Base URLs of every peer, indexed `0..n` (peer `i+1`'s URL at index `i`). Unused by the
    /// in-process demo transport; required by any real `PeerTransport` implementation.
    #[clap(long, env = "DKG_NODE_SERVERS", value_delimiter = ',')]
    pub servers: Vec<String>,

    /// Deadline a decryption-share validation waits for a missing ciphertext before reporting
    /// [`dkg_core::DkgError::Cancelled`].
    #[clap(
        long,
        env = "DKG_NODE_CIPHERTEXT_WAIT_TIMEOUT",
        default_value = "30s",
        value_parser = humantime::parse_duration,
    )]
    pub ciphertext_wait_timeout: Duration,
}

/// Parse error for [`DkgNodeConfig::group_params`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// One of `p, q, g, g', h` was not a valid decimal integer.
    #[error("invalid decimal integer for {field}: {value:?}")]
    InvalidInteger {
        /// Which field failed to parse.
        field: &'static str,
        /// The offending raw value.
        value: String,
    },
    /// The parsed values did not satisfy [`dkg_core::GroupParams`]'s structural invariants.
    #[error(transparent)]
    InvalidParams(#[from] dkg_core::DkgError),
}

impl DkgNodeConfig {
    /// Parses `p, q, g, g', h` and constructs the validated [`dkg_core::GroupParams`].
    pub fn group_params(&self) -> Result<dkg_core::GroupParams, ConfigError> {
        let parse = |field: &'static str, value: &str| {
            value
                .parse::<BigUint>()
                .map_err(|_| ConfigError::InvalidInteger {
                    field,
                    value: value.to_string(),
                })
        };
        let p = parse("p", &self.p)?;
        let q = parse("q", &self.q)?;
        let g = parse("g", &self.g)?;
        let g_prime = parse("g_prime", &self.g_prime)?;
        let h = parse("h", &self.h)?;
        Ok(dkg_core::GroupParams::new(p, q, g, g_prime, h, self.n, self.t)?)
    }
}
