use super::{Side, Symbol};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    NewOrder = 1,
    CancelOrder = 2,
}

impl MessageType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(MessageType::NewOrder),
            2 => Some(MessageType::CancelOrder),
            _ => None,
        }
    }
}

/// One synthetic "new order" event. Built right before it is sent and
/// dropped once the write returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderMessage {
    pub message_type: MessageType,
    pub timestamp_nanos: u64,
    /// Unique only within the sending client's sequence.
    pub order_id: u64,
    // cents
    pub price: u32,
    pub quantity: u32,
    pub side: Side,
    pub symbol: Symbol,
}
