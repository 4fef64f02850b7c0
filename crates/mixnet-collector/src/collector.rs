//! Accept loop for the terminal collector: decrypt the fixed-length
//! asymmetric-ciphertext prefix of each inbound frame and deliver the
//! decoded record to the sink.

use std::sync::Arc;

use rsa::RsaPrivateKey;
use tracing::{info, warn};

use mixnet_config::MixnetConfig;
use mixnet_transport::Listener;
use mixnet_types::CORE_MSG_SIZE;

use crate::sink::Sink;
use crate::{CollectorError, Result};

/// The terminal mixnet component: decrypts and delivers plaintext ride
/// records to its [`Sink`].
pub struct Collector {
    private_key: RsaPrivateKey,
    listener: Listener,
    config: MixnetConfig,
    sink: Arc<Sink>,
}

impl Collector {
    pub async fn bind(address: &str, port: u16, private_key: RsaPrivateKey, config: MixnetConfig) -> Result<Self> {
        let listener = Listener::bind_with_timeout(address, port, config.socket_timeout()).await?;
        Ok(Self {
            private_key,
            listener,
            config,
            sink: Arc::new(Sink::new()),
        })
    }

    /// A handle to this collector's sink, sharable with a consumer task.
    pub fn sink(&self) -> Arc<Sink> {
        Arc::clone(&self.sink)
    }

    /// The ephemeral port this collector is actually bound to, when bound
    /// with port `0`.
    pub fn local_port(&self) -> Result<u16> {
        Ok(self.listener.local_port()?)
    }

    /// Decrypt the terminal payload out of a raw `MSG_MAX_SIZE` wire
    /// buffer: the first `CORE_MSG_SIZE` bytes are the RSA-OAEP ciphertext
    /// of `pseudonym ‖ POST ‖ payload ‖ END`; the rest is discarded padding.
    /// In debug mode that same `CORE_MSG_SIZE` window is itself the
    /// unencrypted terminal frame followed by `wrap()`'s random fill, so
    /// the trailing `END`/padding is stripped the same way in both modes.
    fn decrypt_and_parse(&self, wire: &[u8]) -> Result<Vec<u8>> {
        let ciphertext = &wire[..CORE_MSG_SIZE];
        let plaintext = if self.config.debug_mode {
            ciphertext.to_vec()
        } else {
            mixnet_crypto::rsa_oaep::decrypt(&self.private_key, ciphertext)?
        };
        let frame = mixnet_envelope::unwrap(&plaintext)?;
        Ok(mixnet_envelope::parse_terminal_frame(&frame)?)
    }

    /// Run the accept loop until the socket idles past its timeout, then
    /// close the sink so a draining consumer can exit.
    pub async fn run(&mut self) {
        loop {
            let wire = match self.listener.accept_message().await {
                Ok(Some(wire)) => wire,
                Ok(None) => {
                    info!("accept loop idle, closing");
                    self.sink.close();
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "accept failed, continuing");
                    continue;
                }
            };

            match self.decrypt_and_parse(&wire) {
                Ok(record) => self.sink.push(record),
                Err(e) => warn!(error = %e, "dropping undecryptable or malformed message"),
            }
        }
    }
}
