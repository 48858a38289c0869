use crate::control::EngineMode;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

/// Live dashboard over the engine's snapshot files.
#[derive(Parser, Debug, Clone)]
#[command(name = "engine-profiler", version)]
pub struct DashboardConfig {
    /// Throughput counters written by the engine
    #[arg(long, default_value = "metrics.json")]
    pub metrics: PathBuf,

    /// Order book state written by the engine
    #[arg(long, default_value = "book_state.json")]
    pub book: PathBuf,

    /// File the selected engine mode is written to
    #[arg(long, default_value = "engine_mode.txt")]
    pub mode_file: PathBuf,

    #[arg(long, value_enum, default_value_t = EngineMode::Queue)]
    pub mode: EngineMode,

    /// Refresh interval in milliseconds
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(100..=2000))]
    pub refresh_ms: u64,

    /// Load generator executable; defaults to `load-generator` next to this binary
    #[arg(long)]
    pub generator: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The terminal owns stdout, so logs go here
    #[arg(long, default_value = "engine-profiler.log")]
    pub log_file: PathBuf,
}

impl DashboardConfig {
    #[inline]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    pub fn generator_path(&self) -> PathBuf {
        if let Some(path) = &self.generator {
            return path.clone();
        }
        let name = format!("load-generator{}", std::env::consts::EXE_SUFFIX);
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(&name)))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}

/// One load-generation run against the engine.
#[derive(Parser, Debug, Clone)]
#[command(name = "load-generator", version)]
pub struct LoadConfig {
    /// Concurrent clients, one connection each
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub clients: u32,

    /// Orders sent by every client
    #[arg(default_value_t = 100_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub orders_per_client: u64,

    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Seed client RNGs for a reproducible order stream
    #[arg(long)]
    pub seed: Option<u64>,
}

impl LoadConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
