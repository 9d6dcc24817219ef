#![deny(missing_docs)]
//! Reference CLI, configuration, and transport wiring around `dkg-core`.
//!
//! This crate is explicitly a thin, replaceable convenience layer, not a production transport: it
//! exists to give `dkg-core` a config surface (`clap`, `DKG_NODE_*` environment variables) and a
//! working multi-peer transport for the demo binary and integration tests, not to define how a
//! real deployment should carry payloads between servers.

pub mod config;
pub mod transport;

/// Initializes a `tracing-subscriber` `fmt` layer reading its filter from `RUST_LOG`, defaulting
/// to `info` when unset.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
