use crate::types::MessageType;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Buffer too small: expected {expected} bytes, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    #[error("Unknown message type: {0}")]
    UnknownMessageType(u8),

    #[error("Unexpected message type: {0:?}")]
    UnexpectedMessageType(MessageType),

    #[error("Invalid side: {0}")]
    InvalidSide(u8),

    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to send order #{order_id}: {source}")]
    Send {
        order_id: u64,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write mode file {}: {source}", path.display())]
    ModeFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn client thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("Client thread panicked")]
    ClientPanicked,
}

pub type Result<T> = std::result::Result<T, HarnessError>;
