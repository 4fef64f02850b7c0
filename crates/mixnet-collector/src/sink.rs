//! The collector → consumer hand-off: an unbounded FIFO of decoded
//! records, with push/pop/is_open as defined by the core sink API. The
//! semicolon-delimited record interpretation itself stays out of scope —
//! the sink only ever carries opaque bytes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// FIFO hand-off between the collector's accept loop and a downstream
/// consumer.
pub struct Sink {
    queue: Mutex<VecDeque<Vec<u8>>>,
    open: AtomicBool,
}

impl Default for Sink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            open: AtomicBool::new(true),
        }
    }

    /// Append a decoded record to the FIFO.
    pub fn push(&self, record: Vec<u8>) {
        self.queue.lock().expect("sink mutex poisoned").push_back(record);
    }

    /// Pop the oldest record, if any.
    pub fn pop(&self) -> Option<Vec<u8>> {
        self.queue.lock().expect("sink mutex poisoned").pop_front()
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.queue.lock().expect("sink mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Idempotent close: transitions `is_open()` to false.
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_is_fifo() {
        let sink = Sink::new();
        sink.push(b"one".to_vec());
        sink.push(b"two".to_vec());
        assert_eq!(sink.pop(), Some(b"one".to_vec()));
        assert_eq!(sink.pop(), Some(b"two".to_vec()));
        assert_eq!(sink.pop(), None);
    }

    #[test]
    fn test_close_is_idempotent() {
        let sink = Sink::new();
        assert!(sink.is_open());
        sink.close();
        assert!(!sink.is_open());
        sink.close();
        assert!(!sink.is_open());
    }
}
