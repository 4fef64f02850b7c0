//! RSA-2048 with OAEP(MGF1-SHA256, SHA-256, empty label) asymmetric
//! encryption. The asymmetric half of the hybrid layer construction in
//! [`crate::hybrid`].

use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::{CryptoError, Result};

/// Modulus size, in bits, of every relay and collector keypair.
pub const KEY_BITS: usize = 2048;

/// Exact ciphertext length, in bytes, of an RSA-2048 OAEP encryption —
/// equal to the modulus size. Every hybrid layer is prefixed with exactly
/// this many bytes of asymmetric ciphertext.
pub const RSA_OAEP_CIPHERTEXT_LEN: usize = KEY_BITS / 8;

fn oaep() -> Oaep {
    Oaep::new::<Sha256>()
}

/// Generate a fresh RSA-2048 keypair.
pub fn generate_keypair() -> Result<(RsaPrivateKey, RsaPublicKey)> {
    let mut rng = rand::rngs::OsRng;
    let private_key = RsaPrivateKey::new(&mut rng, KEY_BITS)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
    let public_key = RsaPublicKey::from(&private_key);
    Ok((private_key, public_key))
}

/// Encrypt `plaintext` under `public_key` with OAEP. `plaintext` must fit in
/// a single RSA block (at most `RSA_OAEP_CIPHERTEXT_LEN - 2 * 32 - 2` bytes
/// for SHA-256); callers in this workspace only ever encrypt fixed-size
/// symmetric keys, well within that bound.
pub fn encrypt(public_key: &RsaPublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut rng = rand::rngs::OsRng;
    public_key
        .encrypt(&mut rng, oaep(), plaintext)
        .map_err(|e| CryptoError::OaepEncryption(e.to_string()))
}

/// Decrypt an OAEP ciphertext produced by [`encrypt`].
pub fn decrypt(private_key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    private_key
        .decrypt(oaep(), ciphertext)
        .map_err(|e| CryptoError::OaepDecryption(e.to_string()))
}

/// Encode a public key as DER `SubjectPublicKeyInfo`, for embedding in a
/// [`mixnet_types::RelayDescriptor`].
pub fn encode_public_key_der(public_key: &RsaPublicKey) -> Result<Vec<u8>> {
    public_key
        .to_public_key_der()
        .map(|doc| doc.as_bytes().to_vec())
        .map_err(|e| CryptoError::KeyEncoding(e.to_string()))
}

/// Decode a DER `SubjectPublicKeyInfo` back into a public key.
pub fn decode_public_key_der(der: &[u8]) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_der(der).map_err(|e| CryptoError::KeyEncoding(e.to_string()))
}
