use crate::telemetry::{Depth, DepthRow, DepthTable};
use crate::tui::app::{App, LaunchStatus, Severity};
use crate::tui::stats::EngineStatus;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, Paragraph},
    Frame,
};
use rust_decimal::Decimal;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(3),
        ])
        .split(f.size());

    draw_header(f, chunks[0], app);
    draw_kpis(f, chunks[1], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[0]);

    draw_throughput_chart(f, left_chunks[0], app);
    draw_events(f, left_chunks[1], app);
    draw_depth(f, main_chunks[1], app);

    draw_footer(f, chunks[3], app);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let (status_text, status_color) = if app.frozen {
        ("UI is Frozen for Inspection.", Color::Yellow)
    } else {
        ("RUNNING", Color::Green)
    };

    let imbalance = app.stats.imbalance;
    let (imbalance_text, imbalance_color) = if imbalance > 0.2 {
        ("▶▶▶ BUY", Color::Green)
    } else if imbalance < -0.2 {
        ("SELL ◀◀◀", Color::Red)
    } else {
        ("BALANCED", Color::Gray)
    };

    let spread = app
        .stats
        .spread
        .map(|s| format!("{s:.2}"))
        .unwrap_or_else(|| "--".to_string());

    let header_text = vec![
        Span::styled(
            "⚡ Matching Engine Profiler ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.mode.label(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            status_text,
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("Spread: {spread} "), Style::default().fg(Color::White)),
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::styled(imbalance_text, Style::default().fg(imbalance_color)),
    ];

    let header = Paragraph::new(Line::from(header_text))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_kpis(f: &mut Frame, area: Rect, app: &App) {
    let kpi_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let live = app
        .stats
        .live_ops
        .map(|ops| format!("{} OPS", thousands(ops)))
        .unwrap_or_else(|| "--".to_string());
    let total = app
        .stats
        .total_processed
        .map(thousands)
        .unwrap_or_else(|| "--".to_string());
    let (status, status_color) = match app.stats.status {
        EngineStatus::Processing => ("🔥 PROCESSING", Color::LightRed),
        EngineStatus::Idle => ("🟢 IDLE", Color::Green),
        EngineStatus::NoData => ("NO DATA", Color::DarkGray),
    };

    let kpis = [
        (" Live Throughput ", live, Color::Cyan),
        (" Total Orders Processed ", total, Color::White),
        (" Engine Status ", status.to_string(), status_color),
    ];

    for ((title, value, color), area) in kpis.into_iter().zip(kpi_chunks.iter()) {
        let kpi = Paragraph::new(value)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(kpi, *area);
    }
}

fn draw_throughput_chart(f: &mut Frame, area: Rect, app: &App) {
    let window = app.aggregator.window();
    let data: Vec<(f64, f64)> = window
        .iter()
        .enumerate()
        .map(|(i, ops)| (i as f64, ops as f64))
        .collect();

    let max_ops = (window.peak() as f64 * 1.1).max(1.0);

    let datasets = vec![Dataset::default()
        .name("OPS")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::LightRed))
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" System Throughput (Orders Per Second) ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, window.capacity().saturating_sub(1).max(1) as f64])
                .labels(vec![]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, max_ops])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(thousands((max_ops / 2.0) as u64)),
                    Span::raw(thousands(max_ops as u64)),
                ])
                .style(Style::default().fg(Color::Gray)),
        );

    f.render_widget(chart, area);
}

fn draw_depth(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Depth of Market (DOM) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL);

    let table = match app.aggregator.depth() {
        Some(Depth::Book(table)) => table,
        Some(Depth::Empty) => {
            let text = Paragraph::new("Order book is currently empty.")
                .style(Style::default().fg(Color::Cyan))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(text, area);
            return;
        }
        None => {
            let text = Paragraph::new("Waiting for book snapshot...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(text, area);
            return;
        }
    };

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let rows = visible_rows(table, inner_area.height as usize);
    let max_qty = table.max_quantity().max(1);
    let half = (inner_area.width.saturating_sub(23) / 2) as usize;

    let lines: Vec<Line> = rows
        .iter()
        .rev()
        .map(|(price, row)| depth_line(*price, *row, max_qty, half))
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Left);
    f.render_widget(paragraph, inner_area);
}

/// Rows around the touch, at most `height` of them, ascending by price.
fn visible_rows(table: &DepthTable, height: usize) -> Vec<(Decimal, DepthRow)> {
    let rows: Vec<(Decimal, DepthRow)> = table.rows().collect();
    if rows.len() <= height {
        return rows;
    }

    let touch = rows
        .iter()
        .position(|(_, row)| row.ask > 0)
        .unwrap_or(rows.len());
    let start = touch
        .saturating_sub(height / 2)
        .min(rows.len() - height);
    rows[start..start + height].to_vec()
}

fn depth_line(price: Decimal, row: DepthRow, max_qty: u64, half: usize) -> Line<'static> {
    let bar = |q: u64| (q as u128 * half as u128 / max_qty as u128).min(half as u128) as usize;
    let bid_len = bar(row.bid);
    let ask_len = bar(row.ask);

    let qty = |q: u64| if q > 0 { q.to_string() } else { String::new() };

    Line::from(vec![
        Span::styled(
            format!("{:>6} ", qty(row.bid)),
            Style::default().fg(Color::LightGreen),
        ),
        Span::raw(" ".repeat(half - bid_len)),
        Span::styled("█".repeat(bid_len), Style::default().fg(Color::Green)),
        Span::styled(
            format!(" {price:>7.2} "),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled("█".repeat(ask_len), Style::default().fg(Color::Red)),
        Span::raw(" ".repeat(half - ask_len)),
        Span::styled(
            format!(" {:<6}", qty(row.ask)),
            Style::default().fg(Color::LightRed),
        ),
    ])
}

fn draw_events(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" Events ").borders(Borders::ALL);

    let mut items: Vec<ListItem> = Vec::new();

    for (severity, text, time) in &app.events {
        let age = time.elapsed().as_secs_f32();
        let color = match severity {
            Severity::Error => Color::Red,
            Severity::Info if age < 2.0 => Color::White,
            Severity::Info => Color::Gray,
        };
        items.push(ListItem::new(text.clone()).style(Style::default().fg(color)));
    }

    if items.is_empty() {
        items.push(ListItem::new("No events yet...").style(Style::default().fg(Color::DarkGray)));
    }

    let list = List::new(items).block(block);
    f.render_widget(list, area);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let footer_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let footer_text = format!(
        " Clients: {} [c/C] | Orders/client: {} [o/O] | Refresh: {}ms [+/-] | [L]aunch [M]ode [Space] [Q]",
        app.clients,
        thousands(app.orders_per_client as u64),
        app.refresh_interval.as_millis(),
    );
    let controls = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(" Controls "));
    f.render_widget(controls, footer_chunks[0]);

    let (launch_text, launch_color) = match &app.launch_status {
        Some(LaunchStatus::Started { pid, total_orders }) => (
            format!("Started {} orders (pid {pid})", thousands(*total_orders)),
            Color::Green,
        ),
        Some(LaunchStatus::Failed(reason)) => (format!("Failed to start: {reason}"), Color::Red),
        None => ("--".to_string(), Color::DarkGray),
    };
    let launch = Paragraph::new(launch_text)
        .style(Style::default().fg(launch_color))
        .block(Block::default().borders(Borders::ALL).title(" Last Launch "));
    f.render_widget(launch, footer_chunks[1]);
}

fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
