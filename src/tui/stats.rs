use crate::telemetry::{Depth, DepthTable, TelemetryAggregator};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Processing,
    Idle,
    NoData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineStats {
    pub live_ops: Option<u64>,
    pub total_processed: Option<u64>,
    pub status: EngineStatus,
    pub bid_volume: u64,
    pub ask_volume: u64,
    pub spread: Option<Decimal>,
    pub imbalance: f64,
}

impl Default for EngineStats {
    fn default() -> Self {
        Self {
            live_ops: None,
            total_processed: None,
            status: EngineStatus::NoData,
            bid_volume: 0,
            ask_volume: 0,
            spread: None,
            imbalance: 0.0,
        }
    }
}

impl EngineStats {
    pub fn from_aggregator(aggregator: &TelemetryAggregator) -> Self {
        let mut stats = Self::default();

        if let Some(metrics) = aggregator.latest() {
            let live = metrics.active_ops();
            stats.live_ops = Some(live);
            stats.total_processed = Some(metrics.total_engine);
            stats.status = if live > 0 {
                EngineStatus::Processing
            } else {
                EngineStatus::Idle
            };
        }

        if let Some(table) = aggregator.depth().and_then(Depth::table) {
            stats.bid_volume = table.bid_volume();
            stats.ask_volume = table.ask_volume();
            stats.spread = spread(table);

            let total = stats.bid_volume.saturating_add(stats.ask_volume);
            if total > 0 {
                stats.imbalance =
                    (stats.bid_volume as f64 - stats.ask_volume as f64) / total as f64;
            }
        }

        stats
    }
}

/// Best ask minus best bid, when both sides have resting quantity.
pub fn spread(table: &DepthTable) -> Option<Decimal> {
    let best_bid = table.rows().rev().find(|(_, row)| row.bid > 0)?.0;
    let best_ask = table.rows().find(|(_, row)| row.ask > 0)?.0;
    Some(best_ask - best_bid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{BookState, EngineMetrics, RawLevel, Snapshot};
    use rust_decimal_macros::dec;

    fn level(price: u64, quantity: u64) -> RawLevel {
        RawLevel { price, quantity }
    }

    #[test]
    fn test_no_snapshot_means_no_data() {
        let stats = EngineStats::from_aggregator(&TelemetryAggregator::default());
        assert_eq!(stats.status, EngineStatus::NoData);
        assert_eq!(stats.live_ops, None);
        assert_eq!(stats.spread, None);
    }

    #[test]
    fn test_status_follows_active_rate() {
        let mut aggregator = TelemetryAggregator::default();
        aggregator.ingest_metrics(Snapshot::Present(EngineMetrics {
            network_ops: 0,
            engine_ops: 0,
            total_engine: 12_000,
        }));
        let stats = EngineStats::from_aggregator(&aggregator);
        assert_eq!(stats.status, EngineStatus::Idle);
        assert_eq!(stats.total_processed, Some(12_000));

        aggregator.ingest_metrics(Snapshot::Present(EngineMetrics {
            network_ops: 800,
            engine_ops: 0,
            total_engine: 12_000,
        }));
        let stats = EngineStats::from_aggregator(&aggregator);
        assert_eq!(stats.status, EngineStatus::Processing);
        assert_eq!(stats.live_ops, Some(800));
    }

    #[test]
    fn test_book_volumes_spread_and_imbalance() {
        let mut aggregator = TelemetryAggregator::default();
        aggregator.ingest_book(Snapshot::Present(BookState {
            bids: vec![level(14950, 30), level(14900, 10)],
            asks: vec![level(15050, 10), level(15100, 0)],
        }));

        let stats = EngineStats::from_aggregator(&aggregator);
        assert_eq!(stats.bid_volume, 40);
        assert_eq!(stats.ask_volume, 10);
        assert_eq!(stats.spread, Some(dec!(1.00)));
        assert!((stats.imbalance - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_one_sided_book_has_no_spread() {
        let mut aggregator = TelemetryAggregator::default();
        aggregator.ingest_book(Snapshot::Present(BookState {
            bids: vec![level(14950, 30)],
            asks: vec![],
        }));
        assert_eq!(EngineStats::from_aggregator(&aggregator).spread, None);
    }

    #[test]
    fn test_saturated_book_totals_do_not_overflow() {
        let book: BookState = serde_json::from_str(
            r#"{"bids":[{"price":14950,"quantity":18446744073709551615}],"asks":[{"price":15050,"quantity":5}]}"#,
        )
        .unwrap();
        let mut aggregator = TelemetryAggregator::default();
        aggregator.ingest_book(Snapshot::Present(book));

        let stats = EngineStats::from_aggregator(&aggregator);
        assert_eq!(stats.bid_volume, u64::MAX);
        assert_eq!(stats.ask_volume, 5);
        assert_eq!(stats.spread, Some(dec!(1.00)));
        assert!(stats.imbalance > 0.99 && stats.imbalance <= 1.0);
    }
}
