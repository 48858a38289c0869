use crate::telemetry::snapshot::RawLevel;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookSide {
    Bid,
    Ask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLevel {
    pub price: Decimal,
    pub quantity: u64,
    pub side: BookSide,
}

impl DepthLevel {
    pub fn from_raw(raw: &RawLevel, side: BookSide) -> Self {
        Self {
            price: cents_to_price(raw.price),
            quantity: raw.quantity,
            side,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthRow {
    pub bid: u64,
    pub ask: u64,
}

/// Price-ordered bid/ask quantities. Every price seen on either side has a
/// row, and the side it was not seen on is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthTable {
    rows: BTreeMap<Decimal, DepthRow>,
}

impl DepthTable {
    pub fn insert(&mut self, level: DepthLevel) {
        let row = self.rows.entry(level.price).or_default();
        match level.side {
            BookSide::Bid => row.bid = row.bid.saturating_add(level.quantity),
            BookSide::Ask => row.ask = row.ask.saturating_add(level.quantity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl DoubleEndedIterator<Item = (Decimal, DepthRow)> + '_ {
        self.rows.iter().map(|(price, row)| (*price, *row))
    }

    pub fn get(&self, price: Decimal) -> Option<DepthRow> {
        self.rows.get(&price).copied()
    }

    pub fn max_quantity(&self) -> u64 {
        self.rows
            .values()
            .map(|row| row.bid.max(row.ask))
            .max()
            .unwrap_or(0)
    }

    pub fn bid_volume(&self) -> u64 {
        self.rows
            .values()
            .fold(0u64, |acc, row| acc.saturating_add(row.bid))
    }

    pub fn ask_volume(&self) -> u64 {
        self.rows
            .values()
            .fold(0u64, |acc, row| acc.saturating_add(row.ask))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Depth {
    Empty,
    Book(DepthTable),
}

impl Depth {
    pub fn reconstruct(bids: &[RawLevel], asks: &[RawLevel]) -> Self {
        if bids.is_empty() && asks.is_empty() {
            return Depth::Empty;
        }

        let mut table = DepthTable::default();
        let levels = bids
            .iter()
            .map(|raw| DepthLevel::from_raw(raw, BookSide::Bid))
            .chain(asks.iter().map(|raw| DepthLevel::from_raw(raw, BookSide::Ask)));
        for level in levels {
            table.insert(level);
        }

        Depth::Book(table)
    }

    pub fn table(&self) -> Option<&DepthTable> {
        match self {
            Depth::Empty => None,
            Depth::Book(table) => Some(table),
        }
    }
}

#[inline]
fn cents_to_price(cents: u64) -> Decimal {
    Decimal::from(cents) / Decimal::ONE_HUNDRED
}
