use crate::error::HarnessError;
use crate::load::report::LatencyStats;
use crate::simulator::OrderFlow;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::net::TcpStream;
use std::time::Instant;
use tracing::{debug, warn};

pub trait Transport: Sync {
    type Stream: Write;

    fn connect(&self, trader: usize) -> io::Result<Self::Stream>;

    fn peer(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct TcpTransport {
    addr: String,
}

impl TcpTransport {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }
}

impl Transport for TcpTransport {
    type Stream = TcpStream;

    fn connect(&self, _trader: usize) -> io::Result<TcpStream> {
        TcpStream::connect(&self.addr)
    }

    fn peer(&self) -> String {
        self.addr.clone()
    }
}

#[derive(Debug)]
pub enum TraderOutcome {
    Completed,
    Failed(HarnessError),
}

#[derive(Debug)]
pub struct TraderReport {
    pub trader: usize,
    pub sent: u64,
    pub outcome: TraderOutcome,
    pub latency: LatencyStats,
}

impl TraderReport {
    pub fn failed(trader: usize, sent: u64, error: HarnessError) -> Self {
        Self {
            trader,
            sent,
            outcome: TraderOutcome::Failed(error),
            latency: LatencyStats::new(),
        }
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, TraderOutcome::Completed)
    }
}

/// One simulated participant: `orders` frames with ids `0..orders`, sent one
/// after another on a single connection. Never retries.
pub struct TraderClient<'a> {
    pub id: usize,
    pub orders: u64,
    pub flow: &'a OrderFlow,
    pub seed: Option<u64>,
}

impl<'a> TraderClient<'a> {
    pub fn new(id: usize, orders: u64, flow: &'a OrderFlow) -> Self {
        Self {
            id,
            orders,
            flow,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn run<T: Transport>(&self, transport: &T) -> TraderReport {
        let mut stream = match transport.connect(self.id) {
            Ok(stream) => stream,
            Err(source) => {
                let error = HarnessError::Connect {
                    addr: transport.peer(),
                    source,
                };
                warn!(trader = self.id, "{error}");
                return TraderReport::failed(self.id, 0, error);
            }
        };
        debug!(trader = self.id, peer = %transport.peer(), "connected");

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut latency = LatencyStats::new();
        let mut sent = 0u64;

        for order_id in 0..self.orders {
            let order = self.flow.next_order(&mut rng, order_id);
            let start = Instant::now();
            if let Err(source) = order.write_to(&mut stream) {
                let error = HarnessError::Send { order_id, source };
                warn!(trader = self.id, sent, "{error}");
                return TraderReport {
                    trader: self.id,
                    sent,
                    outcome: TraderOutcome::Failed(error),
                    latency,
                };
            }
            latency.record(start.elapsed());
            sent += 1;
        }

        if let Err(source) = stream.flush() {
            let error = HarnessError::Send {
                order_id: sent.saturating_sub(1),
                source,
            };
            warn!(trader = self.id, sent, "{error}");
            return TraderReport {
                trader: self.id,
                sent,
                outcome: TraderOutcome::Failed(error),
                latency,
            };
        }

        debug!(trader = self.id, sent, "completed");
        TraderReport {
            trader: self.id,
            sent,
            outcome: TraderOutcome::Completed,
            latency,
        }
    }
}
