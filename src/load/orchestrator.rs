use crate::error::HarnessError;
use crate::load::report::RunSummary;
use crate::load::trader::{TraderClient, TraderReport, Transport};
use crate::simulator::OrderFlow;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

/// Fan-out/fan-in run: `clients` traders start together and the summary is
/// built only after every one of them has finished or failed.
///
/// There is no timeout on the join, so a hung connection holds the whole run.
#[derive(Debug, Clone)]
pub struct LoadTest {
    pub clients: usize,
    pub orders_per_client: u64,
    pub flow: OrderFlow,
    /// Trader `n` seeds its RNG with `seed + n`.
    pub seed: Option<u64>,
}

impl LoadTest {
    pub fn new(clients: usize, orders_per_client: u64) -> Self {
        Self {
            clients,
            orders_per_client,
            flow: OrderFlow::default(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn run<T: Transport>(&self, transport: &T) -> RunSummary {
        info!(
            clients = self.clients,
            orders_per_client = self.orders_per_client,
            peer = %transport.peer(),
            "starting load test"
        );

        let start = Instant::now();
        let reports: Vec<TraderReport> = thread::scope(|scope| {
            let handles: Vec<_> = (0..self.clients)
                .map(|id| {
                    let mut client = TraderClient::new(id, self.orders_per_client, &self.flow);
                    if let Some(seed) = self.seed {
                        client = client.with_seed(seed.wrapping_add(id as u64));
                    }
                    let handle = thread::Builder::new()
                        .name(format!("trader-{id}"))
                        .spawn_scoped(scope, move || client.run(transport));
                    (id, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(id, handle)| match handle {
                    Ok(handle) => handle.join().unwrap_or_else(|_| {
                        TraderReport::failed(id, 0, HarnessError::ClientPanicked)
                    }),
                    Err(source) => TraderReport::failed(id, 0, HarnessError::Spawn(source)),
                })
                .collect()
        });
        let elapsed = start.elapsed();

        let summary = RunSummary::new(self.clients, self.orders_per_client, reports, elapsed);

        for failure in summary.failures() {
            warn!(
                trader = failure.trader,
                sent = failure.sent,
                reason = %failure.reason,
                "client failed"
            );
        }
        info!(
            sent = summary.sent_orders(),
            total = summary.total_orders(),
            failed_clients = summary.failed_clients(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            throughput = summary.throughput() as u64,
            "load test finished"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::trader::{TcpTransport, TraderOutcome};
    use crate::protocol::ORDER_MESSAGE_SIZE;
    use crate::types::OrderMessage;
    use std::io::{self, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::JoinHandle;

    /// Accepts `connections` peers and returns the order ids seen on each.
    fn spawn_sink(listener: TcpListener, connections: usize) -> JoinHandle<Vec<Vec<u64>>> {
        thread::spawn(move || {
            let readers: Vec<JoinHandle<Vec<u64>>> = (0..connections)
                .map(|_| {
                    let (mut stream, _) = listener.accept().unwrap();
                    thread::spawn(move || {
                        let mut bytes = Vec::new();
                        stream.read_to_end(&mut bytes).unwrap();
                        assert_eq!(bytes.len() % ORDER_MESSAGE_SIZE, 0);
                        bytes
                            .chunks(ORDER_MESSAGE_SIZE)
                            .map(|frame| OrderMessage::decode(frame).unwrap().order_id)
                            .collect()
                    })
                })
                .collect();

            readers.into_iter().map(|r| r.join().unwrap()).collect()
        })
    }

    /// Refuses one trader, connects the rest to a real listener.
    struct RefuseOne {
        addr: String,
        refused: usize,
    }

    impl Transport for RefuseOne {
        type Stream = TcpStream;

        fn connect(&self, trader: usize) -> io::Result<TcpStream> {
            if trader == self.refused {
                return Err(io::Error::from(io::ErrorKind::ConnectionRefused));
            }
            TcpStream::connect(&self.addr)
        }

        fn peer(&self) -> String {
            self.addr.clone()
        }
    }

    #[test]
    fn test_every_client_delivers_its_own_sequence() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let sink = spawn_sink(listener, 4);

        let summary = LoadTest::new(4, 250).run(&TcpTransport::new(addr));
        let per_connection = sink.join().unwrap();

        assert!(summary.is_clean());
        assert_eq!(summary.sent_orders(), 1_000);
        assert_eq!(summary.total_orders(), 1_000);

        let expected: Vec<u64> = (0..250).collect();
        assert_eq!(per_connection.len(), 4);
        for ids in &per_connection {
            assert_eq!(ids, &expected);
        }
        let observed: usize = per_connection.iter().map(Vec::len).sum();
        assert_eq!(observed, 1_000);
    }

    #[test]
    fn test_one_refused_client_does_not_sink_the_run() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let sink = spawn_sink(listener, 4);

        let transport = RefuseOne { addr, refused: 2 };
        let summary = LoadTest::new(5, 100).run(&transport);
        let per_connection = sink.join().unwrap();

        assert_eq!(summary.failed_clients(), 1);
        assert_eq!(summary.sent_orders(), 400);
        assert_eq!(summary.reports.len(), 5);

        let failures: Vec<_> = summary.failures().collect();
        assert_eq!(failures[0].trader, 2);
        assert_eq!(failures[0].sent, 0);

        assert_eq!(per_connection.iter().map(Vec::len).sum::<usize>(), 400);
    }

    /// Trader 1 panics on its first write, trader 2 loses its connection
    /// after `cut_after` frames, everyone else writes into memory.
    struct Scripted {
        cut_after: usize,
    }

    struct ScriptedStream {
        trader: usize,
        frames_left: usize,
    }

    impl Write for ScriptedStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            match self.trader {
                1 => panic!("stream blew up"),
                2 if self.frames_left == 0 => {
                    Err(io::Error::from(io::ErrorKind::ConnectionReset))
                }
                _ => {
                    self.frames_left = self.frames_left.saturating_sub(1);
                    Ok(buf.len())
                }
            }
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Transport for Scripted {
        type Stream = ScriptedStream;

        fn connect(&self, trader: usize) -> io::Result<ScriptedStream> {
            Ok(ScriptedStream {
                trader,
                frames_left: if trader == 2 { self.cut_after } else { usize::MAX },
            })
        }

        fn peer(&self) -> String {
            "scripted".to_string()
        }
    }

    #[test]
    fn test_panicked_and_reset_clients_are_counted() {
        let summary = LoadTest::new(4, 50).run(&Scripted { cut_after: 20 });

        assert_eq!(summary.reports.len(), 4);
        assert_eq!(summary.failed_clients(), 2);
        assert_eq!(summary.sent_orders(), 50 + 20 + 50);
        assert!(!summary.all_failed());

        assert!(matches!(
            summary.reports[1].outcome,
            TraderOutcome::Failed(HarnessError::ClientPanicked)
        ));
        assert!(matches!(
            summary.reports[2].outcome,
            TraderOutcome::Failed(HarnessError::Send { order_id: 20, .. })
        ));
        assert_eq!(summary.reports[2].sent, 20);
        assert!(summary.reports[0].is_completed());
        assert!(summary.reports[3].is_completed());
    }

    #[test]
    fn test_unreachable_engine_fails_every_client() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().to_string()
        };

        let summary = LoadTest::new(3, 10).run(&TcpTransport::new(addr));

        assert_eq!(summary.failed_clients(), 3);
        assert_eq!(summary.sent_orders(), 0);
        assert_eq!(summary.total_orders(), 30);
    }

    #[test]
    fn test_seeded_runs_send_identical_prices() {
        let capture = |seed| {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap().to_string();
            let sink = thread::spawn(move || {
                let (mut stream, _) = listener.accept().unwrap();
                let mut bytes = Vec::new();
                stream.read_to_end(&mut bytes).unwrap();
                bytes
                    .chunks(ORDER_MESSAGE_SIZE)
                    .map(|frame| OrderMessage::decode(frame).unwrap().price)
                    .collect::<Vec<_>>()
            });
            LoadTest::new(1, 20)
                .with_seed(Some(seed))
                .run(&TcpTransport::new(addr));
            sink.join().unwrap()
        };

        assert_eq!(capture(42), capture(42));
    }
}
