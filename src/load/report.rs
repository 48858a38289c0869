use crate::load::trader::{TraderOutcome, TraderReport};
use std::collections::VecDeque;
use std::time::Duration;

const LATENCY_HISTORY_SIZE: usize = 1_000;

#[derive(Debug, Clone)]
pub struct LatencyStats {
    samples: VecDeque<Duration>,
    capacity: usize,
}

impl LatencyStats {
    pub fn new() -> Self {
        Self::with_capacity(LATENCY_HISTORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.min(LATENCY_HISTORY_SIZE)),
            capacity,
        }
    }

    pub fn record(&mut self, latency: Duration) {
        self.samples.push_back(latency);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn merge(&mut self, other: &LatencyStats) {
        self.capacity += other.capacity;
        self.samples.extend(other.samples.iter().copied());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn avg(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let sum: Duration = self.samples.iter().sum();
        sum / self.samples.len() as u32
    }

    pub fn p99(&self) -> Duration {
        let mut sorted: Vec<Duration> = self.samples.iter().copied().collect();
        sorted.sort();
        let p99_idx = (sorted.len() as f64 * 0.99) as usize;
        sorted
            .get(p99_idx.min(sorted.len().saturating_sub(1)))
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for LatencyStats {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ClientFailure {
    pub trader: usize,
    pub sent: u64,
    pub reason: String,
}

/// Aggregate result of one run, available only after every client finished.
#[derive(Debug)]
pub struct RunSummary {
    pub clients: usize,
    pub orders_per_client: u64,
    pub elapsed: Duration,
    pub reports: Vec<TraderReport>,
}

impl RunSummary {
    pub fn new(
        clients: usize,
        orders_per_client: u64,
        mut reports: Vec<TraderReport>,
        elapsed: Duration,
    ) -> Self {
        reports.sort_by_key(|r| r.trader);
        Self {
            clients,
            orders_per_client,
            elapsed,
            reports,
        }
    }

    #[inline]
    pub fn total_orders(&self) -> u64 {
        self.clients as u64 * self.orders_per_client
    }

    pub fn sent_orders(&self) -> u64 {
        self.reports.iter().map(|r| r.sent).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = ClientFailure> + '_ {
        self.reports.iter().filter_map(|report| match &report.outcome {
            TraderOutcome::Failed(error) => Some(ClientFailure {
                trader: report.trader,
                sent: report.sent,
                reason: error.to_string(),
            }),
            TraderOutcome::Completed => None,
        })
    }

    pub fn failed_clients(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_completed()).count()
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failed_clients() == 0
    }

    /// No client completed. Partial failures still count as a finished run.
    pub fn all_failed(&self) -> bool {
        !self.reports.is_empty() && self.reports.iter().all(|r| !r.is_completed())
    }

    /// Configured orders over wall time.
    pub fn throughput(&self) -> f64 {
        per_second(self.total_orders(), self.elapsed)
    }

    /// Orders actually written over wall time.
    pub fn effective_throughput(&self) -> f64 {
        per_second(self.sent_orders(), self.elapsed)
    }

    pub fn latency(&self) -> LatencyStats {
        let mut merged = LatencyStats::with_capacity(0);
        for report in &self.reports {
            merged.merge(&report.latency);
        }
        merged
    }
}

fn per_second(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}
