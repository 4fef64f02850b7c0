//! Relay descriptors and the internal-to-a-relay packet representation.

use serde::{Deserialize, Serialize};

/// Out-of-band descriptor for one relay in a chain, as distributed to a
/// client ahead of a mixing session. The mechanism for distributing these
/// is out of scope; only the shape is defined here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelayDescriptor {
    /// IP address or hostname the relay listens on.
    pub address: String,
    /// Port the relay listens on.
    pub port: u16,
    /// DER-encoded `SubjectPublicKeyInfo` for the relay's RSA public key.
    pub public_key_der: Vec<u8>,
}

/// A packet staged inside a relay's pool: the next onion layer plus where it
/// is headed next. `len(payload) <= MSG_MAX_SIZE`; padding is reapplied on
/// send, not carried while the packet sits in the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    /// The next onion layer (or terminal ciphertext), unpadded.
    pub payload: Vec<u8>,
    /// Host to forward `payload` to.
    pub dest_host: String,
    /// Port to forward `payload` to.
    pub dest_port: u16,
}

impl Packet {
    /// Construct a new packet.
    pub fn new(payload: Vec<u8>, dest_host: String, dest_port: u16) -> Self {
        Self {
            payload,
            dest_host,
            dest_port,
        }
    }
}
