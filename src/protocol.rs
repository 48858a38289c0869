//! Fixed-layout binary order frames.
//!
//! Every frame is 34 bytes, little-endian, with no padding:
//!
//! ```text
//! [1B type][8B timestamp][8B order_id][4B price][4B quantity][1B side][8B symbol]
//! ```
//!
//! There is no length prefix or delimiter, so a reader resynchronises purely on
//! the fixed size.

use crate::error::{HarnessError, Result};
use crate::types::{MessageType, OrderMessage, Side, Symbol};
use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Write};
use std::ops::Range;

pub const ORDER_MESSAGE_SIZE: usize = 34;

const TYPE: usize = 0;
const TIMESTAMP: Range<usize> = 1..9;
const ORDER_ID: Range<usize> = 9..17;
const PRICE: Range<usize> = 17..21;
const QUANTITY: Range<usize> = 21..25;
const SIDE: usize = 25;
const SYMBOL: Range<usize> = 26..34;

impl OrderMessage {
    pub fn encode(&self) -> [u8; ORDER_MESSAGE_SIZE] {
        let mut frame = [0u8; ORDER_MESSAGE_SIZE];
        frame[TYPE] = self.message_type as u8;
        LittleEndian::write_u64(&mut frame[TIMESTAMP], self.timestamp_nanos);
        LittleEndian::write_u64(&mut frame[ORDER_ID], self.order_id);
        LittleEndian::write_u32(&mut frame[PRICE], self.price);
        LittleEndian::write_u32(&mut frame[QUANTITY], self.quantity);
        frame[SIDE] = self.side.as_u8();
        frame[SYMBOL].copy_from_slice(self.symbol.as_bytes());
        frame
    }

    #[inline]
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.encode())
    }

    /// Reference decoder for the frame layout. The engine owns the real one.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ORDER_MESSAGE_SIZE {
            return Err(HarnessError::BufferTooSmall {
                expected: ORDER_MESSAGE_SIZE,
                actual: bytes.len(),
            });
        }

        let message_type = MessageType::from_u8(bytes[TYPE])
            .ok_or(HarnessError::UnknownMessageType(bytes[TYPE]))?;
        if message_type != MessageType::NewOrder {
            return Err(HarnessError::UnexpectedMessageType(message_type));
        }

        let side = Side::from_u8(bytes[SIDE]).ok_or(HarnessError::InvalidSide(bytes[SIDE]))?;

        let mut symbol = [0u8; 8];
        symbol.copy_from_slice(&bytes[SYMBOL]);

        Ok(Self {
            message_type,
            timestamp_nanos: LittleEndian::read_u64(&bytes[TIMESTAMP]),
            order_id: LittleEndian::read_u64(&bytes[ORDER_ID]),
            price: LittleEndian::read_u32(&bytes[PRICE]),
            quantity: LittleEndian::read_u32(&bytes[QUANTITY]),
            side,
            symbol: Symbol::from_bytes(symbol),
        })
    }
}
