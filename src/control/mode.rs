use crate::error::{HarnessError, Result};
use clap::ValueEnum;
use std::fmt;
use std::fs;
use std::path::Path;

/// Engine architecture selected by the operator. The engine polls the mode
/// file on its own schedule; nothing is acknowledged back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum EngineMode {
    #[default]
    Queue,
    Sync,
}

impl EngineMode {
    pub fn token(self) -> &'static str {
        match self {
            EngineMode::Queue => "queue",
            EngineMode::Sync => "sync",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EngineMode::Queue => "Lock-Free Queue",
            EngineMode::Sync => "Synchronous Mutex",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            EngineMode::Queue => EngineMode::Sync,
            EngineMode::Sync => EngineMode::Queue,
        }
    }

    pub fn write_to(self, path: &Path) -> Result<()> {
        fs::write(path, self.token()).map_err(|source| HarnessError::ModeFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
