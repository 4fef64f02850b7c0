//! Client-side onion construction: given a chain, the collector's public
//! key, and a payload, produce the outermost ciphertext addressed to the
//! head relay (or a direct terminal envelope if the chain is empty).

use mixnet_envelope::{format_layer, format_terminal, wrap};
use mixnet_types::MSG_MAX_SIZE;
use rsa::RsaPublicKey;

use crate::chain::Chain;
use crate::{OnionError, Result};

/// The result of building an onion: the wire-ready bytes and the address
/// the client must connect to in order to send them.
pub struct Onion {
    pub wire: Vec<u8>,
    pub next_host: String,
    pub next_port: u16,
}

/// Build the onion for `payload`, addressed ultimately to
/// `collector_host:collector_port`.
///
/// Case A (`chain.is_empty()`): no encryption is applied at all; the
/// terminal frame is sent straight to the collector. This only makes sense
/// against a collector also running in debug mode.
///
/// Case B: layers are built innermost-out, each hybrid-encrypted for its
/// relay, until the outermost layer addressed to the chain's head.
pub fn build_onion(
    chain: &Chain,
    collector_public_key: Option<&RsaPublicKey>,
    collector_host: &str,
    collector_port: u16,
    payload: &[u8],
    debug: bool,
) -> Result<Onion> {
    if chain.is_empty() {
        let frame = format_terminal(payload);
        let wire = wrap(&frame)?;
        return Ok(Onion {
            wire,
            next_host: collector_host.to_string(),
            next_port: collector_port,
        });
    }

    let core = format_terminal(payload);
    let enc_core = match (debug, collector_public_key) {
        (true, _) | (false, None) => core,
        (false, Some(pub_key)) => mixnet_crypto::rsa_oaep::encrypt(pub_key, &core)?,
    };

    let hops = chain.hops();
    let tail = hops.last().expect("chain.is_empty() checked above");
    let frame_tail = format_layer(&enc_core, collector_host, collector_port);
    let mut layer = mixnet_crypto::hybrid::encrypt_layer(&tail.public_key, &frame_tail, debug)?;

    for i in (0..hops.len() - 1).rev() {
        let next = &hops[i + 1];
        let frame = format_layer(&layer, next.address(), next.port());
        layer = mixnet_crypto::hybrid::encrypt_layer(&hops[i].public_key, &frame, debug)?;
    }

    if layer.len() > MSG_MAX_SIZE {
        return Err(OnionError::Envelope(mixnet_envelope::EnvelopeError::EnvelopeTooLarge {
            len: layer.len(),
            max: MSG_MAX_SIZE,
        }));
    }
    let wire = wrap(&layer)?;

    let head = chain.head().expect("chain.is_empty() checked above");
    Ok(Onion {
        wire,
        next_host: head.address().to_string(),
        next_port: head.port(),
    })
}
