//! Engine observation: tolerant snapshot reads, the rolling throughput window
//! and depth-of-market reconstruction.

pub mod aggregator;
pub mod depth;
pub mod snapshot;
pub mod window;

pub use aggregator::TelemetryAggregator;
pub use depth::{BookSide, Depth, DepthLevel, DepthRow, DepthTable};
pub use snapshot::{
    read_snapshot, BookState, EngineMetrics, FileSnapshots, RawLevel, Snapshot, SnapshotSource,
};
pub use window::{RollingWindow, THROUGHPUT_WINDOW};
