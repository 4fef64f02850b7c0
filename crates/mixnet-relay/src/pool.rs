//! A relay's staging buffer of peeled, not-yet-forwarded packets.
//!
//! Backed by a plain `Vec` rather than a set: collapsing duplicates would
//! lose legitimate (cryptographically negligible) collisions and hands an
//! adversary who injects a known packet an ordering side channel. Release
//! samples without replacement and shuffles, so insertion order never
//! survives into emission order.

use rand::seq::index::sample;
use rand::seq::SliceRandom;

use mixnet_types::Packet;

/// The pool of packets a relay has peeled but not yet released.
#[derive(Default)]
pub struct Pool {
    packets: Vec<Packet>,
    capacity: usize,
}

impl Pool {
    pub fn new(capacity: usize) -> Self {
        Self {
            packets: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn push(&mut self, packet: Packet) {
        self.packets.push(packet);
    }

    /// Whether a batch release should fire.
    pub fn should_release(&self) -> bool {
        self.packets.len() >= self.capacity
    }

    /// Sample up to `capacity` packets uniformly at random without
    /// replacement, remove them from the pool, and shuffle the sample.
    /// Returns an empty vector if the pool is empty.
    pub fn release_batch(&mut self) -> Vec<Packet> {
        let limit = self.capacity.min(self.packets.len());
        if limit == 0 {
            return Vec::new();
        }

        let mut rng = rand::rngs::OsRng;
        let chosen: Vec<usize> = sample(&mut rng, self.packets.len(), limit).into_vec();
        let mut is_chosen = vec![false; self.packets.len()];
        for &i in &chosen {
            is_chosen[i] = true;
        }

        let mut batch = Vec::with_capacity(limit);
        let mut remaining = Vec::with_capacity(self.packets.len() - limit);
        for (i, packet) in self.packets.drain(..).enumerate() {
            if is_chosen[i] {
                batch.push(packet);
            } else {
                remaining.push(packet);
            }
        }
        self.packets = remaining;

        batch.shuffle(&mut rng);
        batch
    }

    /// Drain the entire pool regardless of the capacity threshold,
    /// bypassing the batching privacy mechanism. Only for test harnesses —
    /// never call this in production, per the relay's starvation design
    /// note.
    #[cfg(test)]
    pub fn forced_flush(&mut self) -> Vec<Packet> {
        let mut rng = rand::rngs::OsRng;
        let mut batch: Vec<Packet> = self.packets.drain(..).collect();
        batch.shuffle(&mut rng);
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(n: u8) -> Packet {
        Packet::new(vec![n], "10.0.0.1".into(), 9000)
    }

    #[test]
    fn test_should_release_at_capacity() {
        let mut pool = Pool::new(3);
        assert!(!pool.should_release());
        pool.push(packet(1));
        pool.push(packet(2));
        assert!(!pool.should_release());
        pool.push(packet(3));
        assert!(pool.should_release());
    }

    #[test]
    fn test_release_batch_empties_pool_by_exactly_capacity() {
        let mut pool = Pool::new(4);
        for n in 0..4 {
            pool.push(packet(n));
        }
        let batch = pool.release_batch();
        assert_eq!(batch.len(), 4);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn test_release_batch_leaves_excess_behind() {
        let mut pool = Pool::new(2);
        for n in 0..5 {
            pool.push(packet(n));
        }
        let batch = pool.release_batch();
        assert_eq!(batch.len(), 2);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_release_batch_on_empty_pool() {
        let mut pool = Pool::new(4);
        assert_eq!(pool.release_batch(), Vec::new());
    }

    #[test]
    fn test_duplicate_packets_are_not_collapsed() {
        let mut pool = Pool::new(4);
        pool.push(packet(1));
        pool.push(packet(1));
        pool.push(packet(1));
        pool.push(packet(1));
        assert_eq!(pool.len(), 4);
        let batch = pool.release_batch();
        assert_eq!(batch.len(), 4);
    }

    #[test]
    fn test_forced_flush_ignores_capacity() {
        let mut pool = Pool::new(100);
        pool.push(packet(1));
        pool.push(packet(2));
        let batch = pool.forced_flush();
        assert_eq!(batch.len(), 2);
        assert!(pool.is_empty());
    }
}
