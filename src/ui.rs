//! Terminal User Interface for flowwatch.
//!
//! This module provides a real-time dashboard using `ratatui` that
//! displays:
//!
//! - Status bar with the facility's headline numbers
//! - Capacity verdict panels (WIP, processing, buffer)
//! - CPT risk alert table with active rows highlighted
//!
//! # Controls
//!
//! - `q` or `Esc`: Quit

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};

use crate::app::{App, Evaluation};
use crate::capacity;

/// Run the TUI event loop.
///
/// This takes ownership of the App and terminal, running until the
/// user presses `q` or `Esc`, or the `running` flag is set to false.
///
/// # Arguments
///
/// * `app` - Application instance
/// * `running` - Atomic flag to signal shutdown
/// * `interval` - Time between evaluations
pub fn run(mut app: App, running: Arc<AtomicBool>, interval: Duration) -> std::io::Result<()> {
    enable_raw_mode()?;
    if let Err(e) = std::io::stdout().execute(EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }

    let result = run_tui_loop(&mut app, &running, interval);

    // Always clean up terminal state
    let _ = disable_raw_mode();
    let _ = std::io::stdout().execute(LeaveAlternateScreen);

    result
}

/// Inner TUI loop - separated to ensure cleanup happens on any exit path.
fn run_tui_loop(
    app: &mut App,
    running: &Arc<AtomicBool>,
    interval: Duration,
) -> std::io::Result<()> {
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let history_size = app.config.history_size;
    let mut last_collection = Instant::now();

    // Initial evaluation
    if let Ok(evaluation) = app.evaluate() {
        add_evaluation(app, evaluation, history_size);
    }

    while running.load(Ordering::Relaxed) {
        // Check for input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => {
                            running.store(false, Ordering::Relaxed);
                        }
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            running.store(false, Ordering::Relaxed);
                        }
                        _ => {}
                    }
                }
            }
        }

        // Evaluate at interval
        if last_collection.elapsed() >= interval {
            if let Ok(evaluation) = app.evaluate() {
                add_evaluation(app, evaluation, history_size);
            }
            last_collection = Instant::now();
        }

        // Draw UI
        terminal.draw(|f| draw_ui(f, app))?;
    }

    Ok(())
}

/// Add an evaluation to history, maintaining max size.
fn add_evaluation(app: &mut App, evaluation: Evaluation, max_size: usize) {
    if app.history.len() >= max_size {
        app.history.pop_front();
    }
    app.history.push_back(evaluation);
}

/// Main UI drawing function.
fn draw_ui(f: &mut Frame, app: &App) {
    let size = f.area();
    let evaluation = app.history.back();

    let warnings: &[String] = evaluation.map(|e| e.warnings.as_slice()).unwrap_or(&[]);
    let has_warnings = !warnings.is_empty();

    // Main layout: status bar, [warnings], capacity panels, alerts
    let constraints = if has_warnings {
        vec![
            Constraint::Length(3), // Status bar
            Constraint::Length(3), // Warnings bar
            Constraint::Length(8), // Capacity panels
            Constraint::Min(8),    // Alerts
        ]
    } else {
        vec![
            Constraint::Length(3), // Status bar
            Constraint::Length(8), // Capacity panels
            Constraint::Min(8),    // Alerts
        ]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    let mut index = 0;
    draw_status_bar(f, app, chunks[index]);
    index += 1;

    if has_warnings {
        draw_warnings(f, warnings, chunks[index]);
        index += 1;
    }

    draw_capacity(f, evaluation, chunks[index]);
    index += 1;

    draw_alerts(f, evaluation, chunks[index]);
}

/// Format an optional count for the status bar.
fn fmt_count(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Draw the status bar with the facility's headline numbers.
fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_text = if let Some(e) = app.history.back() {
        let (wip, lagrange, override_throughput, processing) = match &e.snapshot {
            Some(s) => (
                fmt_count(s.wip),
                fmt_count(s.lagrange),
                fmt_count(s.override_throughput),
                s.processing
                    .map_or_else(|| "-".to_string(), |p| format!("{:.0}", p.combined_average())),
            ),
            None => ("-".to_string(), "-".to_string(), "-".to_string(), "-".to_string()),
        };
        format!(
            " 📦 flowwatch | {} | {} | WIP: {} | Default: {} | Override: {} | Proc: {} | Alerts: {} | [q]uit",
            app.config.facility,
            e.collected_at.format("%d/%m/%Y %H:%M:%S"),
            wip,
            lagrange,
            override_throughput,
            processing,
            e.alerts.len(),
        )
    } else {
        format!(
            " 📦 flowwatch | {} | Waiting for first evaluation... | [q]uit",
            app.config.facility
        )
    };

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("Status"),
        );

    f.render_widget(status, area);
}

/// Draw the warnings bar for missing snapshot inputs.
fn draw_warnings(f: &mut Frame, warnings: &[String], area: Rect) {
    let text = warnings.join(" | ");
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Black).bg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("⚠ Degraded Inputs")
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(paragraph, area);
}

/// Draw the three capacity verdict panels side by side.
fn draw_capacity(f: &mut Frame, evaluation: Option<&Evaluation>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let (wip_text, processing_text, buffer_text) = match evaluation {
        Some(e) => (
            capacity::render(&e.wip_checks),
            capacity::render(&e.processing_checks),
            e.buffer_check.verdict.clone(),
        ),
        None => ("-".to_string(), "-".to_string(), "-".to_string()),
    };

    let panels = [
        ("WIP", wip_text, columns[0]),
        ("Processing", processing_text, columns[1]),
        ("Buffer", buffer_text, columns[2]),
    ];

    for (title, text, rect) in panels {
        let paragraph = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(title),
        );
        f.render_widget(paragraph, rect);
    }
}

/// Draw the CPT risk alert table.
///
/// ACTIVE rows are red, ATTENTION rows yellow, matching the severity
/// carried in the composite message.
fn draw_alerts(f: &mut Frame, evaluation: Option<&Evaluation>, area: Rect) {
    let items: Vec<ListItem> = match evaluation {
        Some(e) if !e.alerts.is_empty() => e
            .alerts
            .iter()
            .map(|alert| {
                let style = if alert.message.contains("TRB ACTIVE") {
                    Style::default().fg(Color::White).bg(Color::Red)
                } else {
                    Style::default().fg(Color::Black).bg(Color::Yellow)
                };
                ListItem::new(format!("[{}] {}", alert.grouping, alert.message)).style(style)
            })
            .collect(),
        Some(_) => vec![ListItem::new("☑ No CPT risk detected")
            .style(Style::default().fg(Color::Green))],
        None => vec![ListItem::new("-")],
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title("CPT Risk"),
    );
    f.render_widget(list, area);
}

/// Run without the TUI, printing one evaluation summary per interval.
pub fn run_headless(
    mut app: App,
    running: Arc<AtomicBool>,
    interval: Duration,
) -> std::io::Result<()> {
    let alert_log = app.config.alert_log.clone();
    let history_size = app.config.history_size;

    println!("flowwatch - Fulfillment Center Flow Monitor");
    println!("===========================================");
    println!("Facility: {}", app.config.facility);
    println!("Logging to: {}", alert_log);
    println!("Interval: {} seconds", interval.as_secs());
    println!("Press Ctrl+C to stop.\n");

    while running.load(Ordering::Relaxed) {
        let evaluation = app.evaluate()?;

        println!(
            "[{}] {} | alerts: {}",
            evaluation.collected_at.format("%d/%m/%Y %H:%M:%S"),
            app.config.facility,
            evaluation.alerts.len(),
        );
        for warning in &evaluation.warnings {
            println!("  ⚠ {}", warning);
        }
        for check in evaluation
            .wip_checks
            .iter()
            .chain(evaluation.processing_checks.iter())
            .chain(std::iter::once(&evaluation.buffer_check))
        {
            println!("  {}", check.verdict);
        }
        for alert in &evaluation.alerts {
            println!("  [{}] {}", alert.grouping, alert.message);
        }

        add_evaluation(&mut app, evaluation, history_size);
        std::thread::sleep(interval);
    }

    println!("\nStopped. Alerts logged to {}", alert_log);
    Ok(())
}
