use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use engine_profiler::config::DashboardConfig;
use engine_profiler::control::Launcher;
use engine_profiler::telemetry::{FileSnapshots, SnapshotSource};
use engine_profiler::tui::{ui, App, Ticker};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    fs::File,
    io,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const INPUT_POLL: Duration = Duration::from_millis(50);

fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::parse();
    init_tracing(&config)?;

    let source = FileSnapshots::new(&config.metrics, &config.book);
    let launcher = Launcher::new(config.generator_path(), config.host.clone(), config.port);
    let mut app = App::new(launcher, config.mode_file.clone(), config.refresh_interval());
    app.set_mode(config.mode);
    info!(
        metrics = %config.metrics.display(),
        book = %config.book.display(),
        "dashboard started"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &source);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    info!("dashboard stopped");
    Ok(())
}

fn init_tracing(config: &DashboardConfig) -> anyhow::Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("opening log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    source: &dyn SnapshotSource,
) -> io::Result<()> {
    let mut ticker = Ticker::new(app.refresh_interval, Instant::now());

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let wait = ticker.until_next(Instant::now()).min(INPUT_POLL);
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_freeze(),
                        KeyCode::Char('m') => app.toggle_mode(),
                        KeyCode::Char('l') => app.launch(),
                        KeyCode::Char('+') => app.adjust_refresh(true),
                        KeyCode::Char('-') => app.adjust_refresh(false),
                        KeyCode::Char('C') => app.adjust_clients(true),
                        KeyCode::Char('c') => app.adjust_clients(false),
                        KeyCode::Char('O') => app.adjust_orders(true),
                        KeyCode::Char('o') => app.adjust_orders(false),
                        _ => {}
                    }
                }
            }
        }

        ticker.set_interval(app.refresh_interval);
        if ticker.due(Instant::now()) {
            app.tick(source);
        }
    }
}
