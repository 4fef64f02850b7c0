//! # mixnet-relay
//!
//! The per-relay peeling, pooling, shuffling, and batch-release state
//! machine.
//!
//! - [`pool`] — the `Vec`-backed packet pool and its shuffle-on-release step
//! - [`relay`] — the accept/peel/pool/release loop (`Relay`, `RelayState`)

pub mod pool;
pub mod relay;

pub use pool::Pool;
pub use relay::{Relay, RelayState};

/// Error types for relay operations. Every variant here is recovered
/// locally inside the accept loop — none of these propagate to a peer.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Peeling the onion layer failed: bad padding, wrong key, or AEAD
    /// auth mismatch.
    #[error("crypto error: {0}")]
    Crypto(#[from] mixnet_crypto::CryptoError),

    /// The decrypted layer did not parse as a valid frame.
    #[error("envelope error: {0}")]
    Envelope(#[from] mixnet_envelope::EnvelopeError),

    /// Accepting a connection or reading the fixed-size frame failed.
    #[error("transport error: {0}")]
    Transport(#[from] mixnet_transport::TransportError),
}

pub type Result<T> = std::result::Result<T, RelayError>;
