use crate::types::{MessageType, OrderMessage, Side, Symbol};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::RangeInclusive;
use std::time::{SystemTime, UNIX_EPOCH};

/// $149.00 to $151.00 in cents.
pub const DEFAULT_PRICE_BAND: RangeInclusive<u32> = 14900..=15100;
pub const DEFAULT_QUANTITY_RANGE: RangeInclusive<u32> = 1..=100;
pub const DEFAULT_TICKERS: [&str; 3] = ["AAPL", "TSLA", "MSFT"];

#[derive(Debug, Clone)]
pub struct OrderFlow {
    pub price_band: RangeInclusive<u32>,
    pub quantity_range: RangeInclusive<u32>,
    pub symbols: Vec<Symbol>,
}

impl Default for OrderFlow {
    fn default() -> Self {
        Self {
            price_band: DEFAULT_PRICE_BAND,
            quantity_range: DEFAULT_QUANTITY_RANGE,
            symbols: DEFAULT_TICKERS
                .iter()
                .filter_map(|ticker| Symbol::new(ticker).ok())
                .collect(),
        }
    }
}

impl OrderFlow {
    pub fn next_order<R: Rng>(&self, rng: &mut R, order_id: u64) -> OrderMessage {
        let price = rng.gen_range(self.price_band.clone());
        let quantity = rng.gen_range(self.quantity_range.clone());
        let side = if rng.gen_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };
        let symbol = self
            .symbols
            .choose(rng)
            .copied()
            .unwrap_or_else(|| Symbol::from_bytes([0; 8]));

        OrderMessage {
            message_type: MessageType::NewOrder,
            timestamp_nanos: now_nanos(),
            order_id,
            price,
            quantity,
            side,
            symbol,
        }
    }
}

/// Wall-clock nanoseconds; not monotonic across threads.
pub fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
