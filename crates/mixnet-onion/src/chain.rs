//! Chain topology: an ordered, immutable sequence of relay descriptors.
//!
//! Expressed as indices into a `Vec` rather than owned `prev`/`next`
//! pointers between hops — sidesteps the reference-cycle problem a
//! doubly-linked structure would otherwise create, while `hops()` still
//! gives head/tail traversal in either direction.

use mixnet_types::RelayDescriptor;
use rsa::RsaPublicKey;

use crate::{OnionError, Result};

/// One hop in a chain: the out-of-band descriptor plus its decoded public key.
#[derive(Clone)]
pub struct ChainHop {
    pub descriptor: RelayDescriptor,
    pub public_key: RsaPublicKey,
}

impl ChainHop {
    pub fn address(&self) -> &str {
        &self.descriptor.address
    }

    pub fn port(&self) -> u16 {
        self.descriptor.port
    }
}

/// An ordered, immutable chain of relay hops, built once per mixing session.
#[derive(Clone, Default)]
pub struct Chain {
    hops: Vec<ChainHop>,
}

impl Chain {
    /// All hops in forwarding order (client → head → … → tail).
    pub fn hops(&self) -> &[ChainHop] {
        &self.hops
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// The head relay: the first hop the client connects to.
    pub fn head(&self) -> Option<&ChainHop> {
        self.hops.first()
    }

    /// The tail relay: the last hop before the collector.
    pub fn tail(&self) -> Option<&ChainHop> {
        self.hops.last()
    }

    /// The hop forwarding to `index`, if any — index-based traversal
    /// standing in for an owned back-reference.
    pub fn prev_of(&self, index: usize) -> Option<&ChainHop> {
        index.checked_sub(1).and_then(|i| self.hops.get(i))
    }

    /// The hop `index` forwards to, if any.
    pub fn next_of(&self, index: usize) -> Option<&ChainHop> {
        self.hops.get(index + 1)
    }
}

/// Builds a [`Chain`] from relay descriptors, decoding each DER-encoded
/// public key as it is added.
#[derive(Default)]
pub struct ChainBuilder {
    hops: Vec<ChainHop>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next relay in forwarding order.
    pub fn add_relay(mut self, descriptor: RelayDescriptor) -> Result<Self> {
        let public_key = mixnet_crypto::rsa_oaep::decode_public_key_der(&descriptor.public_key_der)
            .map_err(|e| OnionError::ChainConstruction(format!("invalid relay public key: {e}")))?;
        self.hops.push(ChainHop {
            descriptor,
            public_key,
        });
        Ok(self)
    }

    /// Finish construction. An empty chain is valid — it represents the
    /// no-chain case where the client speaks directly to the collector.
    pub fn build(self) -> Chain {
        Chain { hops: self.hops }
    }
}
