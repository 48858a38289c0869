use clap::Parser;
use engine_profiler::config::LoadConfig;
use engine_profiler::load::{LoadTest, TcpTransport};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = LoadConfig::parse();
    let transport = TcpTransport::new(config.addr());

    let summary = LoadTest::new(config.clients as usize, config.orders_per_client)
        .with_seed(config.seed)
        .run(&transport);

    let latency = summary.latency();
    info!(
        avg_us = latency.avg().as_micros() as u64,
        p99_us = latency.p99().as_micros() as u64,
        effective_throughput = summary.effective_throughput() as u64,
        "write latency"
    );

    if summary.all_failed() {
        anyhow::bail!(
            "all {} clients failed ({} of {} orders sent)",
            summary.clients,
            summary.sent_orders(),
            summary.total_orders()
        );
    }
    if !summary.is_clean() {
        warn!(
            failed_clients = summary.failed_clients(),
            clients = summary.clients,
            sent = summary.sent_orders(),
            total = summary.total_orders(),
            "run finished with client failures"
        );
    }

    Ok(())
}
