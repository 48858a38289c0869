//! Load generation and live telemetry for an external order-matching engine.
//!
//! The engine itself is not part of this crate. We only speak its binary
//! order protocol over TCP and read the JSON snapshots it leaves on disk.

pub mod config;
pub mod control;
pub mod error;
pub mod load;
pub mod protocol;
pub mod simulator;
pub mod telemetry;
pub mod tui;
pub mod types;

pub use error::{HarnessError, Result};
pub use protocol::ORDER_MESSAGE_SIZE;
pub use types::{MessageType, OrderMessage, Side, Symbol};
