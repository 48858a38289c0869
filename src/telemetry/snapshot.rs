use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result of a best-effort read. A torn or truncated file is `Malformed`, and
/// callers treat it exactly like `Absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot<T> {
    Present(T),
    Absent,
    Malformed,
}

impl<T> Snapshot<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Snapshot::Present(value) => Some(value),
            Snapshot::Absent | Snapshot::Malformed => None,
        }
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        matches!(self, Snapshot::Present(_))
    }
}

/// Never fails: missing files and unreadable content both come back as
/// "no data" so the next tick can simply try again.
pub fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Snapshot<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Snapshot::Absent,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "snapshot unreadable");
            return Snapshot::Absent;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Snapshot::Present(value),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "snapshot malformed");
            Snapshot::Malformed
        }
    }
}

/// Engine counters; any missing field reads as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineMetrics {
    pub network_ops: u64,
    pub engine_ops: u64,
    pub total_engine: u64,
}

impl EngineMetrics {
    /// Engine rate when it is processing, network ingress rate otherwise.
    #[inline]
    pub fn active_ops(&self) -> u64 {
        if self.engine_ops > 0 {
            self.engine_ops
        } else {
            self.network_ops
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RawLevel {
    // cents
    pub price: u64,
    pub quantity: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookState {
    pub bids: Vec<RawLevel>,
    pub asks: Vec<RawLevel>,
}

pub trait SnapshotSource {
    fn metrics(&self) -> Snapshot<EngineMetrics>;

    fn book(&self) -> Snapshot<BookState>;
}

#[derive(Debug, Clone)]
pub struct FileSnapshots {
    pub metrics_path: PathBuf,
    pub book_path: PathBuf,
}

impl FileSnapshots {
    pub fn new(metrics_path: impl Into<PathBuf>, book_path: impl Into<PathBuf>) -> Self {
        Self {
            metrics_path: metrics_path.into(),
            book_path: book_path.into(),
        }
    }
}

impl SnapshotSource for FileSnapshots {
    fn metrics(&self) -> Snapshot<EngineMetrics> {
        read_snapshot(&self.metrics_path)
    }

    fn book(&self) -> Snapshot<BookState> {
        read_snapshot(&self.book_path)
    }
}
