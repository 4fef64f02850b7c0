//! Per-layer hybrid encryption: an RSA-OAEP-wrapped, freshly generated
//! symmetric key followed by the AEAD ciphertext of the layer itself.
//!
//! A fresh key is drawn for every call — each onion layer, for every
//! message, gets its own symmetric key. Nothing is reused across layers or
//! across messages.

use rand::RngCore;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::aead::{self, KEY_SIZE, NONCE_SIZE};
use crate::rsa_oaep::{self, RSA_OAEP_CIPHERTEXT_LEN};
use crate::{CryptoError, Result};

/// Size, in bytes, of the big-endian length prefix on the AEAD ciphertext.
/// Needed because a hybrid blob travels inside a fixed `MSG_MAX_SIZE`
/// envelope padded with random bytes — without a length marker, the AEAD
/// ciphertext and the trailing padding are indistinguishable, and feeding
/// the padding to the AEAD as part of the tag breaks authentication.
const LEN_PREFIX_SIZE: usize = 2;

/// Encrypt one onion layer for `public_key`.
///
/// In debug mode the layer is returned unchanged — relays and the collector
/// must be run with matching debug settings, since the wire shape no longer
/// carries the asymmetric-ciphertext prefix.
///
/// Layout of the non-debug result: `RSA_OAEP_CIPHERTEXT_LEN` bytes of
/// RSA-OAEP-wrapped key material (`nonce ‖ sym_key`), a `LEN_PREFIX_SIZE`-byte
/// big-endian length of the AEAD ciphertext, then the ciphertext itself.
/// The length prefix lets [`decrypt_layer`] find the exact end of the
/// ciphertext once this blob is sitting inside a padded, fixed-size
/// envelope.
pub fn encrypt_layer(public_key: &RsaPublicKey, layer: &[u8], debug: bool) -> Result<Vec<u8>> {
    if debug {
        return Ok(layer.to_vec());
    }

    let mut rng = rand::rngs::OsRng;
    let mut sym_key = [0u8; KEY_SIZE];
    rng.fill_bytes(&mut sym_key);
    let mut nonce = [0u8; NONCE_SIZE];
    rng.fill_bytes(&mut nonce);

    let mut key_material = Vec::with_capacity(NONCE_SIZE + KEY_SIZE);
    key_material.extend_from_slice(&nonce);
    key_material.extend_from_slice(&sym_key);

    let wrapped_key = rsa_oaep::encrypt(public_key, &key_material)?;
    let ciphertext = aead::encrypt_no_aad(&sym_key, &nonce, layer)?;
    let ciphertext_len: u16 = ciphertext
        .len()
        .try_into()
        .map_err(|_| CryptoError::InvalidInput(format!("layer too large to frame: {} bytes", ciphertext.len())))?;

    let mut out = Vec::with_capacity(wrapped_key.len() + LEN_PREFIX_SIZE + ciphertext.len());
    out.extend_from_slice(&wrapped_key);
    out.extend_from_slice(&ciphertext_len.to_be_bytes());
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt one onion layer with `private_key`, inverse of [`encrypt_layer`].
/// Any bytes in `blob` past the framed ciphertext (the envelope's random
/// padding) are ignored.
pub fn decrypt_layer(private_key: &RsaPrivateKey, blob: &[u8], debug: bool) -> Result<Vec<u8>> {
    if debug {
        return Ok(blob.to_vec());
    }

    if blob.len() < RSA_OAEP_CIPHERTEXT_LEN + LEN_PREFIX_SIZE {
        return Err(CryptoError::TruncatedLayer {
            need: RSA_OAEP_CIPHERTEXT_LEN + LEN_PREFIX_SIZE,
            have: blob.len(),
        });
    }
    let (wrapped_key, rest) = blob.split_at(RSA_OAEP_CIPHERTEXT_LEN);
    let (len_bytes, rest) = rest.split_at(LEN_PREFIX_SIZE);
    let ciphertext_len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
    if rest.len() < ciphertext_len {
        return Err(CryptoError::TruncatedLayer {
            need: RSA_OAEP_CIPHERTEXT_LEN + LEN_PREFIX_SIZE + ciphertext_len,
            have: blob.len(),
        });
    }
    let ciphertext = &rest[..ciphertext_len];

    let key_material = rsa_oaep::decrypt(private_key, wrapped_key)?;
    if key_material.len() != NONCE_SIZE + KEY_SIZE {
        return Err(CryptoError::InvalidKeyLength {
            expected: NONCE_SIZE + KEY_SIZE,
            actual: key_material.len(),
        });
    }
    let (nonce, sym_key) = key_material.split_at(NONCE_SIZE);

    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(sym_key);
    let mut nonce_arr = [0u8; NONCE_SIZE];
    nonce_arr.copy_from_slice(nonce);

    aead::decrypt_no_aad(&key, &nonce_arr, ciphertext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa_oaep::generate_keypair;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let (private_key, public_key) = generate_keypair().expect("keygen");
        let layer = b"POSTsome inner layer payloadEND";

        let blob = encrypt_layer(&public_key, layer, false).expect("encrypt");
        let recovered = decrypt_layer(&private_key, &blob, false).expect("decrypt");
        assert_eq!(recovered, layer);
    }

    #[test]
    fn test_debug_mode_is_passthrough() {
        let (private_key, public_key) = generate_keypair().expect("keygen");
        let layer = b"plain layer, not wrapped";

        let blob = encrypt_layer(&public_key, layer, true).expect("encrypt");
        assert_eq!(blob, layer);
        let recovered = decrypt_layer(&private_key, &blob, true).expect("decrypt");
        assert_eq!(recovered, layer);
    }

    #[test]
    fn test_each_call_uses_a_fresh_key() {
        let (_, public_key) = generate_keypair().expect("keygen");
        let layer = b"same layer both times";

        let blob_a = encrypt_layer(&public_key, layer, false).expect("encrypt");
        let blob_b = encrypt_layer(&public_key, layer, false).expect("encrypt");
        assert_ne!(blob_a, blob_b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let (_, public_key) = generate_keypair().expect("keygen");
        let (other_private_key, _) = generate_keypair().expect("keygen");
        let blob = encrypt_layer(&public_key, b"secret layer", false).expect("encrypt");
        assert!(decrypt_layer(&other_private_key, &blob, false).is_err());
    }

    #[test]
    fn test_truncated_blob_fails() {
        let (private_key, _) = generate_keypair().expect("keygen");
        assert!(decrypt_layer(&private_key, b"too short", false).is_err());
    }

    #[test]
    fn test_decrypt_ignores_trailing_envelope_padding() {
        // On the wire this blob never arrives alone — it sits at the front
        // of a fixed-size, randomly padded envelope, exactly as
        // `mixnet_envelope::wrap` produces it.
        let (private_key, public_key) = generate_keypair().expect("keygen");
        let layer = b"inner layer payload";

        let mut blob = encrypt_layer(&public_key, layer, false).expect("encrypt");
        blob.extend(std::iter::repeat(0xAAu8).take(4096));

        let recovered = decrypt_layer(&private_key, &blob, false).expect("decrypt");
        assert_eq!(recovered, layer);
    }
}
