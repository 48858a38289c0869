use crate::telemetry::depth::Depth;
use crate::telemetry::snapshot::{BookState, EngineMetrics, Snapshot};
use crate::telemetry::window::RollingWindow;
use tracing::trace;

/// Renderable engine state built from the latest snapshots. It never touches
/// files or sockets; callers hand it whatever the reader produced.
#[derive(Debug, Clone)]
pub struct TelemetryAggregator {
    window: RollingWindow,
    latest: Option<EngineMetrics>,
    depth: Option<Depth>,
}

impl TelemetryAggregator {
    pub fn new(window: RollingWindow) -> Self {
        Self {
            window,
            latest: None,
            depth: None,
        }
    }

    /// A present snapshot appends one sample; anything else leaves the window
    /// as it was.
    pub fn ingest_metrics(&mut self, snapshot: Snapshot<EngineMetrics>) {
        self.latest = snapshot.into_option();
        if let Some(metrics) = self.latest {
            let sample = metrics.active_ops();
            self.window.push(sample);
            trace!(sample, total = metrics.total_engine, "throughput sample");
        }
    }

    /// Depth is rebuilt from scratch on every present snapshot and cleared to
    /// "not loaded" otherwise.
    pub fn ingest_book(&mut self, snapshot: Snapshot<BookState>) {
        self.depth = snapshot
            .into_option()
            .map(|book| Depth::reconstruct(&book.bids, &book.asks));
    }

    #[inline]
    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    #[inline]
    pub fn latest(&self) -> Option<&EngineMetrics> {
        self.latest.as_ref()
    }

    /// `None` until a book snapshot has been read this tick.
    #[inline]
    pub fn depth(&self) -> Option<&Depth> {
        self.depth.as_ref()
    }

    pub fn active_ops(&self) -> Option<u64> {
        self.latest.map(|m| m.active_ops())
    }
}

impl Default for TelemetryAggregator {
    fn default() -> Self {
        Self::new(RollingWindow::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::depth::DepthRow;
    use crate::telemetry::snapshot::RawLevel;
    use crate::telemetry::window::THROUGHPUT_WINDOW;
    use rust_decimal_macros::dec;

    fn metrics(network_ops: u64, engine_ops: u64) -> Snapshot<EngineMetrics> {
        Snapshot::Present(EngineMetrics {
            network_ops,
            engine_ops,
            total_engine: 0,
        })
    }

    #[test]
    fn test_present_metrics_append_active_rate() {
        let mut aggregator = TelemetryAggregator::default();
        aggregator.ingest_metrics(metrics(500, 0));
        aggregator.ingest_metrics(metrics(500, 320));

        let window: Vec<u64> = aggregator.window().iter().collect();
        assert_eq!(window.len(), THROUGHPUT_WINDOW);
        assert_eq!(&window[THROUGHPUT_WINDOW - 2..], &[500, 320]);
        assert_eq!(aggregator.active_ops(), Some(320));
    }

    #[test]
    fn test_missing_or_torn_metrics_leave_window_alone() {
        let mut aggregator = TelemetryAggregator::default();
        aggregator.ingest_metrics(metrics(10, 10));
        let before = aggregator.window().clone();

        aggregator.ingest_metrics(Snapshot::Absent);
        aggregator.ingest_metrics(Snapshot::Malformed);

        assert_eq!(aggregator.window(), &before);
        assert!(aggregator.latest().is_none());
    }

    #[test]
    fn test_book_states() {
        let mut aggregator = TelemetryAggregator::default();
        assert!(aggregator.depth().is_none());

        aggregator.ingest_book(Snapshot::Present(BookState::default()));
        assert_eq!(aggregator.depth(), Some(&Depth::Empty));

        aggregator.ingest_book(Snapshot::Present(BookState {
            bids: vec![RawLevel {
                price: 14950,
                quantity: 10,
            }],
            asks: vec![],
        }));
        let table = aggregator.depth().and_then(Depth::table).unwrap();
        assert_eq!(table.get(dec!(149.50)), Some(DepthRow { bid: 10, ask: 0 }));

        aggregator.ingest_book(Snapshot::Malformed);
        assert!(aggregator.depth().is_none());
    }
}
