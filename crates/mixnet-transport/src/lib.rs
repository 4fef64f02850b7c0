//! # mixnet-transport
//!
//! Best-effort TCP transport for the mixnet: a fresh connection per
//! message, bounded send retries, and a single-connection-per-message
//! accept loop with an idle timeout.
//!
//! No framing beyond the fixed `MSG_MAX_SIZE` — callers hand over and
//! receive back exactly that many bytes; `mixnet-envelope` owns everything
//! inside the buffer.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{debug, warn};

use mixnet_types::{MAX_TRIES, MSG_MAX_SIZE, SOCKET_TIMEOUT_SECS};

/// Errors raised by the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// All `MAX_TRIES` connect-and-send attempts failed.
    #[error("send to {host}:{port} failed after {tries} attempts")]
    SendFailed { host: String, port: u16, tries: u32 },

    /// The accept loop was idle past `SOCKET_TIMEOUT`.
    #[error("accept loop timed out after {0:?}")]
    AcceptTimeout(Duration),

    /// A read or write on an established connection failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Open a fresh TCP connection to `host:port` and send the entire `msg`
/// buffer, retrying up to [`MAX_TRIES`] times on failure. `msg` is expected
/// to already be exactly `MSG_MAX_SIZE` bytes (the caller framed it via
/// `mixnet_envelope::wrap`); this function does not enforce that length.
pub async fn send(host: &str, port: u16, msg: &[u8]) -> Result<()> {
    send_with_tries(host, port, msg, MAX_TRIES).await
}

/// Like [`send`], but with an explicit retry budget — lets a relay or
/// collector honor its configured `max_tries` instead of the hardcoded
/// default.
pub async fn send_with_tries(host: &str, port: u16, msg: &[u8], max_tries: u32) -> Result<()> {
    for attempt in 1..=max_tries {
        match try_send_once(host, port, msg).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                debug!(host, port, attempt, error = %e, "send attempt failed");
                continue;
            }
        }
    }
    warn!(host, port, tries = max_tries, "send failed, dropping packet");
    Err(TransportError::SendFailed {
        host: host.to_string(),
        port,
        tries: max_tries,
    })
}

async fn try_send_once(host: &str, port: u16, msg: &[u8]) -> Result<()> {
    let mut stream = TcpStream::connect((host, port)).await?;
    stream.write_all(msg).await?;
    stream.shutdown().await?;
    Ok(())
}

/// A listening socket with an idle-accept timeout, matching the relay and
/// collector's `Listening` state.
pub struct Listener {
    inner: TcpListener,
    idle_timeout: Duration,
}

impl Listener {
    /// Bind a fresh listener on `address:port` with the default
    /// [`SOCKET_TIMEOUT_SECS`] idle timeout.
    pub async fn bind(address: &str, port: u16) -> Result<Self> {
        Self::bind_with_timeout(address, port, Duration::from_secs(SOCKET_TIMEOUT_SECS)).await
    }

    /// Bind a fresh listener with an explicit idle-accept timeout, as
    /// configured by [`mixnet_types::SOCKET_TIMEOUT_SECS`]'s override in a
    /// component's config.
    pub async fn bind_with_timeout(address: &str, port: u16, idle_timeout: Duration) -> Result<Self> {
        let inner = TcpListener::bind((address, port)).await?;
        Ok(Self { inner, idle_timeout })
    }

    /// The ephemeral port assigned when this listener was bound with port
    /// `0`. Lets a test harness discover where to send.
    pub fn local_port(&self) -> Result<u16> {
        Ok(self.inner.local_addr()?.port())
    }

    /// Accept one inbound connection and read exactly `MSG_MAX_SIZE` bytes
    /// from it. Returns `Ok(None)` on idle timeout — the caller should
    /// transition to `Closed`.
    pub async fn accept_message(&self) -> Result<Option<Vec<u8>>> {
        let accepted = match timeout(self.idle_timeout, self.inner.accept()).await {
            Ok(result) => result?,
            Err(_) => return Ok(None),
        };
        let (mut stream, _addr) = accepted;

        let mut buf = vec![0u8; MSG_MAX_SIZE];
        stream.read_exact(&mut buf).await?;
        Ok(Some(buf))
    }
}
