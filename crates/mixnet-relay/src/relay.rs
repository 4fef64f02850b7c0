//! The relay's accept/peel/pool/release loop.
//!
//! State machine: `Listening → Accepting → Peeling → Pooling → Releasing
//! → Listening`, with any state transitioning to `Closed` on accept
//! timeout or explicit shutdown.

use rsa::RsaPrivateKey;
use tracing::{debug, info, instrument, warn};

use mixnet_config::MixnetConfig;
use mixnet_transport::Listener;
use mixnet_types::Packet;

use crate::pool::Pool;
use crate::{RelayError, Result};

/// Where the relay's accept loop currently stands. Mirrors the design's
/// state machine for introspection and logging; the loop in [`Relay::run`]
/// is the actual driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Listening,
    Accepting,
    Peeling,
    Pooling,
    Releasing,
    Closed,
}

/// A single mix relay: listens on one address, peels one onion layer per
/// inbound message, and releases shuffled batches once its pool fills.
pub struct Relay {
    private_key: RsaPrivateKey,
    listener: Listener,
    config: MixnetConfig,
    pool: Pool,
    state: RelayState,
}

impl Relay {
    /// Bind a relay to `address:port`.
    pub async fn bind(address: &str, port: u16, private_key: RsaPrivateKey, config: MixnetConfig) -> Result<Self> {
        let listener = Listener::bind_with_timeout(address, port, config.socket_timeout()).await?;
        let pool = Pool::new(config.pool_size);
        Ok(Self {
            private_key,
            listener,
            config,
            pool,
            state: RelayState::Listening,
        })
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// The ephemeral port this relay is actually bound to, when bound with
    /// port `0`.
    pub fn local_port(&self) -> Result<u16> {
        Ok(self.listener.local_port()?)
    }

    /// Peel one onion layer off a raw wire buffer, producing the packet to
    /// enqueue. `wire` is exactly `MSG_MAX_SIZE`; the decrypt step consumes
    /// only the hybrid-blob prefix, leaving the rest as discarded padding.
    #[instrument(skip(self, wire))]
    fn peel(&self, wire: &[u8]) -> Result<Packet> {
        let layer = mixnet_crypto::hybrid::decrypt_layer(&self.private_key, wire, self.config.debug_mode)?;
        let frame = mixnet_envelope::unwrap(&layer)?;
        let (payload, dest_host, dest_port) = mixnet_envelope::parse_relay_frame(&frame)?;
        Ok(Packet::new(payload, dest_host, dest_port))
    }

    /// Run the accept loop until the socket idles past its timeout. Each
    /// iteration: accept one connection, peel its layer, pool the result,
    /// and release a batch if the pool has reached capacity. Malformed or
    /// undecryptable messages are logged and dropped; the relay keeps
    /// accepting.
    pub async fn run(&mut self) {
        loop {
            self.state = RelayState::Accepting;
            let wire = match self.listener.accept_message().await {
                Ok(Some(wire)) => wire,
                Ok(None) => {
                    info!("accept loop idle, closing");
                    self.state = RelayState::Closed;
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "accept failed, continuing");
                    continue;
                }
            };

            self.state = RelayState::Peeling;
            let packet = match self.peel(&wire) {
                Ok(packet) => packet,
                Err(e) => {
                    warn!(error = %e, "dropping undecryptable or malformed packet");
                    continue;
                }
            };

            self.state = RelayState::Pooling;
            debug!(dest = %packet.dest_host, port = packet.dest_port, "pooled packet");
            self.pool.push(packet);

            if self.pool.should_release() {
                self.state = RelayState::Releasing;
                self.release_batch().await;
            }
        }
    }

    async fn release_batch(&mut self) {
        let batch = self.pool.release_batch();
        info!(batch_size = batch.len(), "releasing batch");
        for packet in batch {
            let wire = match mixnet_envelope::wrap(&packet.payload) {
                Ok(wire) => wire,
                Err(e) => {
                    warn!(error = %e, "dropping packet, could not re-wrap for send");
                    continue;
                }
            };
            if let Err(e) =
                mixnet_transport::send_with_tries(&packet.dest_host, packet.dest_port, &wire, self.config.max_tries)
                    .await
            {
                warn!(error = %e, dest = %packet.dest_host, port = packet.dest_port, "send failed after retries, dropping");
            }
        }
    }

    /// Force an immediate release regardless of pool occupancy. Only for
    /// test harnesses driving scenario S4 (starvation) or similar —
    /// production relays must never call this, since it defeats the
    /// batching privacy mechanism.
    #[cfg(test)]
    pub async fn forced_flush(&mut self) {
        let batch = self.pool.forced_flush();
        for packet in batch {
            if let Ok(wire) = mixnet_envelope::wrap(&packet.payload) {
                let _ = mixnet_transport::send(&packet.dest_host, packet.dest_port, &wire).await;
            }
        }
    }
}
