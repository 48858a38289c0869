use crate::control::{EngineMode, LaunchHandle, Launcher};
use crate::telemetry::{SnapshotSource, TelemetryAggregator};
use crate::tui::stats::EngineStats;
use std::collections::VecDeque;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info};

const MAX_EVENTS: usize = 15;

pub const CLIENTS_RANGE: RangeInclusive<u32> = 1..=500;
pub const CLIENTS_STEP: u32 = 10;
pub const DEFAULT_CLIENTS: u32 = 50;

pub const ORDERS_RANGE: RangeInclusive<u32> = 100..=100_000;
pub const ORDERS_STEP: u32 = 100;
pub const DEFAULT_ORDERS_PER_CLIENT: u32 = 4_000;

pub const MIN_REFRESH: Duration = Duration::from_millis(100);
pub const MAX_REFRESH: Duration = Duration::from_millis(2_000);
pub const REFRESH_STEP: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchStatus {
    Started { pid: u32, total_orders: u64 },
    Failed(String),
}

pub struct App {
    pub aggregator: TelemetryAggregator,
    pub stats: EngineStats,
    pub frozen: bool,
    pub refresh_interval: Duration,
    pub mode: EngineMode,
    pub mode_file: PathBuf,
    pub clients: u32,
    pub orders_per_client: u32,
    pub launcher: Launcher,
    pub launches: Vec<LaunchHandle>,
    pub launch_status: Option<LaunchStatus>,
    pub events: VecDeque<(Severity, String, Instant)>,
    pub last_tick: Option<Instant>,
}

impl App {
    pub fn new(launcher: Launcher, mode_file: PathBuf, refresh_interval: Duration) -> Self {
        Self {
            aggregator: TelemetryAggregator::default(),
            stats: EngineStats::default(),
            frozen: false,
            refresh_interval: refresh_interval.clamp(MIN_REFRESH, MAX_REFRESH),
            mode: EngineMode::default(),
            mode_file,
            clients: DEFAULT_CLIENTS,
            orders_per_client: DEFAULT_ORDERS_PER_CLIENT,
            launcher,
            launches: Vec::new(),
            launch_status: None,
            events: VecDeque::new(),
            last_tick: None,
        }
    }

    /// One refresh: read both snapshots once and fold them in. Does nothing
    /// while frozen.
    pub fn tick(&mut self, source: &dyn SnapshotSource) -> bool {
        if self.frozen {
            return false;
        }

        self.aggregator.ingest_metrics(source.metrics());
        self.aggregator.ingest_book(source.book());
        self.stats = EngineStats::from_aggregator(&self.aggregator);
        self.reap_launches();
        self.last_tick = Some(Instant::now());
        true
    }

    pub fn toggle_freeze(&mut self) {
        self.frozen = !self.frozen;
        info!(frozen = self.frozen, "freeze toggled");
    }

    pub fn set_mode(&mut self, mode: EngineMode) {
        self.mode = mode;
        match mode.write_to(&self.mode_file) {
            Ok(()) => {
                info!(mode = mode.token(), "engine mode written");
                self.push_event(Severity::Info, format!("Engine mode: {mode}"));
            }
            Err(e) => {
                error!(error = %e, "failed to write engine mode");
                self.push_event(Severity::Error, e.to_string());
            }
        }
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggle());
    }

    pub fn launch(&mut self) {
        match self.launcher.launch(self.clients, self.orders_per_client) {
            Ok(handle) => {
                let total_orders = handle.total_orders();
                self.push_event(
                    Severity::Info,
                    format!("Fired {total_orders} orders into the engine (pid {})", handle.id()),
                );
                self.launch_status = Some(LaunchStatus::Started {
                    pid: handle.id(),
                    total_orders,
                });
                self.launches.push(handle);
            }
            Err(e) => {
                error!(error = %e, "load test launch failed");
                self.push_event(Severity::Error, format!("Failed to start: {e}"));
                self.launch_status = Some(LaunchStatus::Failed(e.to_string()));
            }
        }
    }

    pub fn adjust_clients(&mut self, up: bool) {
        self.clients = step(self.clients, CLIENTS_STEP, up, &CLIENTS_RANGE);
    }

    pub fn adjust_orders(&mut self, up: bool) {
        self.orders_per_client = step(self.orders_per_client, ORDERS_STEP, up, &ORDERS_RANGE);
    }

    /// `faster` shortens the interval.
    pub fn adjust_refresh(&mut self, faster: bool) {
        let next = if faster {
            self.refresh_interval.saturating_sub(REFRESH_STEP)
        } else {
            self.refresh_interval + REFRESH_STEP
        };
        self.refresh_interval = next.clamp(MIN_REFRESH, MAX_REFRESH);
    }

    fn reap_launches(&mut self) {
        let mut finished = Vec::new();
        self.launches.retain_mut(|handle| match handle.poll_exit() {
            Some(status) => {
                finished.push((handle.id(), status));
                false
            }
            None => true,
        });

        for (pid, status) in finished {
            info!(pid, %status, "load test process exited");
            let severity = if status.success() {
                Severity::Info
            } else {
                Severity::Error
            };
            self.push_event(severity, format!("Load test pid {pid} exited: {status}"));
        }
    }

    fn push_event(&mut self, severity: Severity, text: String) {
        self.events.push_front((severity, text, Instant::now()));
        while self.events.len() > MAX_EVENTS {
            self.events.pop_back();
        }
    }
}

fn step(value: u32, by: u32, up: bool, range: &RangeInclusive<u32>) -> u32 {
    let next = if up {
        value.saturating_add(by)
    } else {
        value.saturating_sub(by)
    };
    next.clamp(*range.start(), *range.end())
}
