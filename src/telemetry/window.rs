use std::collections::VecDeque;

pub const THROUGHPUT_WINDOW: usize = 60;

/// Fixed-capacity FIFO of samples. Starts full of zeros so the first frame
/// already has a complete chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingWindow {
    samples: VecDeque<u64>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: std::iter::repeat(0).take(capacity).collect(),
            capacity,
        }
    }

    pub fn push(&mut self, sample: u64) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.samples.iter().copied()
    }

    pub fn latest(&self) -> Option<u64> {
        self.samples.back().copied()
    }

    pub fn peak(&self) -> u64 {
        self.samples.iter().copied().max().unwrap_or(0)
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(THROUGHPUT_WINDOW)
    }
}
