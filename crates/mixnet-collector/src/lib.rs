//! # mixnet-collector
//!
//! The terminal endpoint: decrypts the innermost envelope and hands
//! plaintext ride records to a [`sink::Sink`] for a consumer to drain.
//!
//! - [`collector`] — the accept/decrypt loop (`Collector`)
//! - [`sink`] — the FIFO hand-off (`Sink`)

pub mod collector;
pub mod sink;

pub use collector::Collector;
pub use sink::Sink;

/// Error types for collector operations. Every variant here is recovered
/// locally inside the accept loop — none of these propagate to a peer.
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    /// Decrypting the terminal ciphertext failed: wrong key or bad padding.
    #[error("crypto error: {0}")]
    Crypto(#[from] mixnet_crypto::CryptoError),

    /// The decrypted core did not parse as a valid terminal frame.
    #[error("envelope error: {0}")]
    Envelope(#[from] mixnet_envelope::EnvelopeError),

    /// Accepting a connection or reading the fixed-size frame failed.
    #[error("transport error: {0}")]
    Transport(#[from] mixnet_transport::TransportError),
}

pub type Result<T> = std::result::Result<T, CollectorError>;
