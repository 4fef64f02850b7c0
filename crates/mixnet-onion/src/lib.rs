//! # mixnet-onion
//!
//! Chain topology and client-side onion construction for the mixnet.
//!
//! - [`chain`] — ordered, immutable relay chain (`Chain`/`ChainBuilder`)
//! - [`builder`] — `build_onion`: wraps a payload in nested hybrid-encrypted
//!   layers addressed to the chain's head relay

pub mod builder;
pub mod chain;

pub use builder::{build_onion, Onion};
pub use chain::{Chain, ChainBuilder, ChainHop};

/// Error types for chain and onion construction.
#[derive(Debug, thiserror::Error)]
pub enum OnionError {
    /// A relay descriptor could not be turned into a usable chain hop.
    #[error("chain construction failed: {0}")]
    ChainConstruction(String),

    /// A cryptographic operation while building a layer failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] mixnet_crypto::CryptoError),

    /// Framing a layer failed (most commonly: the finished onion is too
    /// large for a single envelope).
    #[error("envelope error: {0}")]
    Envelope(#[from] mixnet_envelope::EnvelopeError),
}

pub type Result<T> = std::result::Result<T, OnionError>;
