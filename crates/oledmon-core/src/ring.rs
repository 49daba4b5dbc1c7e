//! Fixed-capacity history of the most recent samples for one metric.

/// Circular buffer of `f64` samples with oldest-eviction.
///
/// Holds the most recent `len() <= capacity()` samples in insertion order.
/// One ring is created per plotted metric at startup, with capacity equal to
/// the plot's pixel width, and lives for the process lifetime. The ring puts
/// no constraints on the numeric range of its samples; that is the
/// renderer's business.
pub struct Ring {
    buf: Vec<f64>,
    begin: usize,
    len: usize,
}

impl Ring {
    /// Create an empty ring. Capacity must be at least 1.
    pub fn new(capacity: usize) -> Ring {
        assert!(capacity >= 1, "ring capacity must be at least 1");
        Ring {
            buf: vec![0.0; capacity],
            begin: 0,
            len: 0,
        }
    }

    /// Maximum number of retained samples.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of currently retained samples.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True until the first push.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a sample. Once the ring is full, the newest sample replaces
    /// the chronologically oldest one.
    pub fn push(&mut self, value: f64) {
        let capacity = self.buf.len();
        self.buf[(self.begin + self.len) % capacity] = value;
        if self.len < capacity {
            self.len += 1;
        } else {
            self.begin = (self.begin + 1) % capacity;
        }
    }

    /// The sample `index` positions after the oldest retained one
    /// (0 = oldest). Panics when `index >= len()`.
    pub fn get(&self, index: usize) -> f64 {
        assert!(index < self.len, "ring index out of range");
        self.buf[(self.begin + index) % self.buf.len()]
    }

    /// Retained samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_fill_keeps_insertion_order() {
        let mut ring = Ring::new(4);
        assert!(ring.is_empty());

        ring.push(1.0);
        ring.push(2.0);
        ring.push(3.0);

        assert_eq!(ring.len(), 3);
        assert_eq!(ring.get(0), 1.0);
        assert_eq!(ring.get(2), 3.0);
    }

    #[test]
    fn full_ring_evicts_the_oldest() {
        let capacity = 5;
        let mut ring = Ring::new(capacity);

        // Push 12 samples; only the last 5 must survive, in order.
        for v in 1..=12 {
            ring.push(v as f64);
        }

        assert_eq!(ring.len(), capacity);
        for i in 0..capacity {
            assert_eq!(ring.get(i), (8 + i) as f64);
        }
    }

    #[test]
    fn iter_matches_get() {
        let mut ring = Ring::new(3);
        for v in [0.5, 0.25, 0.75, 1.0] {
            ring.push(v);
        }

        let collected: Vec<f64> = ring.iter().collect();
        assert_eq!(collected, vec![0.25, 0.75, 1.0]);
    }

    #[test]
    #[should_panic(expected = "ring index out of range")]
    fn reading_past_len_panics() {
        let mut ring = Ring::new(3);
        ring.push(1.0);
        let _ = ring.get(1);
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn zero_capacity_panics() {
        let _ = Ring::new(0);
    }
}
