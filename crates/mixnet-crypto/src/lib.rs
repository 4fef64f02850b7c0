//! # mixnet-crypto
//!
//! Cryptographic primitives for the mixnet data plane.
//!
//! ## Modules
//!
//! - [`rsa_oaep`] — RSA-2048 OAEP(MGF1-SHA256, SHA-256) asymmetric encrypt/decrypt
//! - [`aead`] — ChaCha20-Poly1305 AEAD, the Fernet-equivalent symmetric primitive
//! - [`hybrid`] — the per-layer hybrid wrapper (`encrypt_layer`/`decrypt_layer`)
//! - [`ed25519`] — client identity keypair, reserved for future signing extensions

pub mod aead;
pub mod ed25519;
pub mod hybrid;
pub mod rsa_oaep;

/// Error types for cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Ed25519 signature verification failed.
    #[error("signature verification failed")]
    SignatureVerification,

    /// AEAD decryption failed (authentication tag mismatch).
    #[error("AEAD decryption failed")]
    AeadDecryption,

    /// RSA OAEP encryption failed (message too large for the key).
    #[error("RSA-OAEP encryption failed: {0}")]
    OaepEncryption(String),

    /// RSA OAEP decryption failed (bad padding or wrong key).
    #[error("RSA-OAEP decryption failed: {0}")]
    OaepDecryption(String),

    /// Key generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// A hybrid-layer blob was shorter than the asymmetric ciphertext prefix.
    #[error("truncated hybrid layer: need at least {need} bytes, have {have}")]
    TruncatedLayer { need: usize, have: usize },

    /// Invalid input data.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Key (de)serialization error.
    #[error("key encoding error: {0}")]
    KeyEncoding(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
