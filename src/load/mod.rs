//! Concurrent order traffic: one blocking connection per simulated trader,
//! fanned out across OS threads and joined before anything is reported.

pub mod orchestrator;
pub mod report;
pub mod trader;

pub use orchestrator::LoadTest;
pub use report::{LatencyStats, RunSummary};
pub use trader::{TcpTransport, TraderClient, TraderOutcome, TraderReport, Transport};
