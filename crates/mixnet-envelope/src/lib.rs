//! Fixed-size wire framing for the mixnet: padding, the `POST`/`DEST`/
//! `PORT`/`END` tokenization, and the relay/terminal frame parsers.
//!
//! Every function here is pure byte-slice manipulation — no I/O, no crypto.
//! `mixnet-onion` and `mixnet-relay` call these to build and peel frames;
//! `mixnet-collector` calls [`parse_terminal_frame`].

use rand::RngCore;

use mixnet_types::{DEST, END, MSG_MAX_SIZE, PORT, POST, PSEUDONYM_LEN};

/// Errors raised while framing or parsing an envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The frame, before padding, already exceeds `MSG_MAX_SIZE`.
    #[error("frame of {len} bytes exceeds the {max}-byte envelope")]
    EnvelopeTooLarge { len: usize, max: usize },

    /// A required delimiter was missing, or a field failed to decode.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
}

type Result<T> = std::result::Result<T, EnvelopeError>;

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

fn random_pseudonym() -> [u8; PSEUDONYM_LEN] {
    let mut pseudonym = [0u8; PSEUDONYM_LEN];
    rand::rngs::OsRng.fill_bytes(&mut pseudonym);
    pseudonym
}

/// Build a relay frame: `pseudonym ‖ POST ‖ inner ‖ DEST ‖ dest ‖ PORT ‖ port ‖ END`.
pub fn format_layer(inner: &[u8], dest: &str, port: u16) -> Vec<u8> {
    let mut frame = Vec::with_capacity(
        PSEUDONYM_LEN + POST.len() + inner.len() + DEST.len() + dest.len() + PORT.len() + 5 + END.len(),
    );
    frame.extend_from_slice(&random_pseudonym());
    frame.extend_from_slice(POST);
    frame.extend_from_slice(inner);
    frame.extend_from_slice(DEST);
    frame.extend_from_slice(dest.as_bytes());
    frame.extend_from_slice(PORT);
    frame.extend_from_slice(port.to_string().as_bytes());
    frame.extend_from_slice(END);
    frame
}

/// Build the terminal frame: `pseudonym ‖ POST ‖ payload ‖ END`. The
/// collector strips the trailing `END` (and, with it, any envelope padding
/// that follows) via [`unwrap`] before handing the result to
/// [`parse_terminal_frame`].
pub fn format_terminal(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(PSEUDONYM_LEN + POST.len() + payload.len() + END.len());
    frame.extend_from_slice(&random_pseudonym());
    frame.extend_from_slice(POST);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(END);
    frame
}

/// Pad `frame` with uniformly random bytes up to `MSG_MAX_SIZE`.
pub fn wrap(frame: &[u8]) -> Result<Vec<u8>> {
    if frame.len() > MSG_MAX_SIZE {
        return Err(EnvelopeError::EnvelopeTooLarge {
            len: frame.len(),
            max: MSG_MAX_SIZE,
        });
    }
    let mut padded = frame.to_vec();
    let mut filler = vec![0u8; MSG_MAX_SIZE - frame.len()];
    rand::rngs::OsRng.fill_bytes(&mut filler);
    padded.extend_from_slice(&filler);
    Ok(padded)
}

/// Strip trailing padding: returns the prefix up to (excluding) the last
/// occurrence of `END`.
pub fn unwrap(padded: &[u8]) -> Result<Vec<u8>> {
    let end_idx = rfind(padded, END)
        .ok_or_else(|| EnvelopeError::MalformedEnvelope("no END delimiter found".into()))?;
    Ok(padded[..end_idx].to_vec())
}

/// Parse an unwrapped relay frame into `(payload, dest, port)`. `DEST` and
/// `PORT` are matched as their *last* occurrence so payload bytes that
/// happen to contain those literals cannot confuse the parser.
pub fn parse_relay_frame(frame: &[u8]) -> Result<(Vec<u8>, String, u16)> {
    let post_idx =
        find(frame, POST).ok_or_else(|| EnvelopeError::MalformedEnvelope("no POST delimiter found".into()))?;
    let payload_start = post_idx + POST.len();

    let dest_idx = rfind(frame, DEST)
        .ok_or_else(|| EnvelopeError::MalformedEnvelope("no DEST delimiter found".into()))?;
    if dest_idx < payload_start {
        return Err(EnvelopeError::MalformedEnvelope("DEST precedes POST".into()));
    }
    let payload = frame[payload_start..dest_idx].to_vec();

    let dest_start = dest_idx + DEST.len();
    let port_idx = rfind(frame, PORT)
        .ok_or_else(|| EnvelopeError::MalformedEnvelope("no PORT delimiter found".into()))?;
    if port_idx < dest_start {
        return Err(EnvelopeError::MalformedEnvelope("PORT precedes DEST".into()));
    }
    let dest = String::from_utf8(frame[dest_start..port_idx].to_vec())
        .map_err(|e| EnvelopeError::MalformedEnvelope(format!("non-UTF8 dest: {e}")))?;

    let port_start = port_idx + PORT.len();
    let port_str = std::str::from_utf8(&frame[port_start..])
        .map_err(|e| EnvelopeError::MalformedEnvelope(format!("non-UTF8 port: {e}")))?;
    let port: u16 = port_str
        .parse()
        .map_err(|e| EnvelopeError::MalformedEnvelope(format!("non-integer port: {e}")))?;

    Ok((payload, dest, port))
}

/// Parse an unwrapped terminal frame: everything after the first `POST`.
/// Callers must strip the trailing `END`/padding with [`unwrap`] first.
pub fn parse_terminal_frame(frame: &[u8]) -> Result<Vec<u8>> {
    let post_idx =
        find(frame, POST).ok_or_else(|| EnvelopeError::MalformedEnvelope("no POST delimiter found".into()))?;
    Ok(frame[post_idx + POST.len()..].to_vec())
}
