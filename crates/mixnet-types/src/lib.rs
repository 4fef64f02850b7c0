//! # mixnet-types
//!
//! Shared constants and wire-adjacent domain types for the mixnet workspace.
//!
//! These are the numbers and shapes every other crate agrees on: the fixed
//! envelope size, the ASCII delimiters, and the relay/packet structures that
//! flow between the onion builder, the relay engine, and the collector.

pub mod network;

pub use network::{Packet, RelayDescriptor};

/// Fixed size, in bytes, of every envelope sent on any mixnet link.
pub const MSG_MAX_SIZE: usize = 8192;

/// Length, in bytes, of the random pseudonym prefixed to every layer.
pub const PSEUDONYM_LEN: usize = 8;

/// Length, in bytes, of the asymmetric ciphertext prefixing a hybrid layer
/// (exact RSA-2048 OAEP ciphertext length).
pub const SYM_KEY_LEN: usize = 256;

/// Number of peeled packets a relay pool buffers before a batch release.
pub const POOL_SIZE: usize = 64;

/// Idle timeout, in seconds, for a relay or collector's accept loop.
pub const SOCKET_TIMEOUT_SECS: u64 = 60;

/// Maximum number of connect-and-send attempts before a packet is dropped.
pub const MAX_TRIES: u32 = 10;

/// Number of leading bytes of the wire buffer the collector treats as the
/// RSA-OAEP ciphertext of the terminal payload. Tied to the asymmetric key
/// size; must track `mixnet_crypto::RSA_OAEP_CIPHERTEXT_LEN`.
pub const CORE_MSG_SIZE: usize = SYM_KEY_LEN;

/// ASCII delimiter marking the start of the payload field.
pub const POST: &[u8] = b"POST";

/// ASCII delimiter marking the start of the destination-host field.
pub const DEST: &[u8] = b"DEST";

/// ASCII delimiter marking the start of the destination-port field.
pub const PORT: &[u8] = b"PORT";

/// ASCII delimiter marking the end of the framed content, before padding.
pub const END: &[u8] = b"END";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(MSG_MAX_SIZE, 8192);
        assert_eq!(PSEUDONYM_LEN, 8);
        assert_eq!(SYM_KEY_LEN, 256);
        assert_eq!(POOL_SIZE, 64);
        assert_eq!(SOCKET_TIMEOUT_SECS, 60);
        assert_eq!(MAX_TRIES, 10);
        assert_eq!(CORE_MSG_SIZE, SYM_KEY_LEN);
    }

    #[test]
    fn test_delimiters_distinct() {
        let all = [POST, DEST, PORT, END];
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
    }
}
