// src/tui/app.rs — TUI application state, event loop, and rendering.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::sync::watch;

use crate::model::SharedSnapshot;
use crate::refresh::{RefreshPhase, RefreshTrigger, Refresher, TriggerOutcome};
use crate::view::{self, Column, DashboardView, SortOrder};

use super::theme::Theme;
use super::widgets;

// ── App state ────────────────────────────────────────────────────

struct App {
    snapshot: SharedSnapshot,
    view: DashboardView,
    sort_column: Column,
    sort_order: SortOrder,
    status: Option<&'static str>,
}

impl App {
    fn new(snapshot: SharedSnapshot) -> Self {
        let view = view::bind(&snapshot);
        Self {
            snapshot,
            view,
            sort_column: Column::Interval,
            sort_order: SortOrder::Ascending,
            status: None,
        }
    }

    /// Rebind to a newly published snapshot, keeping the chosen sort.
    fn rebind(&mut self, snapshot: SharedSnapshot) {
        self.view = view::bind(&snapshot);
        self.snapshot = snapshot;
        self.status = None;
        self.apply_sort();
    }

    fn next_sort_column(&mut self) {
        self.sort_column = self.sort_column.next();
        self.apply_sort();
    }

    fn toggle_sort_order(&mut self) {
        self.sort_order = self.sort_order.toggle();
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        self.view.table.sort_by(self.sort_column, self.sort_order);
    }
}

// ── Public entry point ───────────────────────────────────────────

/// Launch the TUI dashboard. Blocks until the user quits (q / Esc / Ctrl-C).
///
/// The refresh loop runs elsewhere; this only renders whatever the
/// refresher last published and forwards manual refresh requests.
pub fn run_dashboard(refresher: Arc<Refresher>, trigger: RefreshTrigger) -> anyhow::Result<()> {
    let mut rx = refresher.subscribe();
    let mut app = App::new(rx.borrow_and_update().clone());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app, &refresher, &mut rx, &trigger);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresher: &Refresher,
    rx: &mut watch::Receiver<SharedSnapshot>,
    trigger: &RefreshTrigger,
) -> anyhow::Result<()> {
    loop {
        // Pick up a newly published snapshot, if any.
        if rx.has_changed().unwrap_or(false) {
            let snapshot = rx.borrow_and_update().clone();
            app.rebind(snapshot);
        }

        let phase = refresher.phase();
        terminal.draw(|f| render(f, app, phase))?;

        // Poll for events (250ms timeout so new snapshots show promptly)
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q')
                    || key.code == KeyCode::Esc
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL))
                {
                    return Ok(());
                }

                match key.code {
                    KeyCode::Char('s') => app.next_sort_column(),
                    KeyCode::Char('o') => app.toggle_sort_order(),
                    KeyCode::Char('r') => {
                        app.status = match trigger.request() {
                            TriggerOutcome::Queued => Some("refresh requested"),
                            TriggerOutcome::AlreadyQueued => Some("refresh already pending"),
                            TriggerOutcome::Closed => Some("refresh loop stopped"),
                        };
                    }
                    _ => {}
                }
            }
        }
    }
}

// ── Rendering ────────────────────────────────────────────────────

fn render(f: &mut Frame, app: &App, phase: RefreshPhase) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(4),  // KPI tiles
            Constraint::Min(10),    // Interval table + charts
            Constraint::Length(12), // Campaigns + agents
            Constraint::Length(1),  // Footer / key hints
        ])
        .split(size);

    render_header(f, chunks[0], app, phase);
    widgets::kpis::render(f, chunks[1], &app.view.tiles);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);
    widgets::intervals::render_table(f, middle[0], &app.view.table);
    widgets::intervals::render_charts(f, middle[1], &app.view.interval_chart);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[3]);
    widgets::campaigns::render(f, bottom[0], &app.view.campaign_chart);
    widgets::agents::render(f, bottom[1], &app.view.agent_chart);

    render_footer(f, chunks[4], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App, phase: RefreshPhase) {
    let updated = if app.snapshot.cycle == 0 {
        "never".to_string()
    } else {
        app.snapshot
            .generated_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    };

    let mut spans = vec![
        Span::styled(" Last updated: ", Theme::text_dim()),
        Span::styled(updated, Theme::text()),
        Span::styled(format!("   cycle {}", app.snapshot.cycle), Theme::text_dim()),
    ];
    if phase == RefreshPhase::Refreshing {
        spans.push(Span::styled("   refreshing\u{2026}", Theme::highlight()));
    }

    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(Span::styled(" Call Traffic Dashboard ", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(p, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let order = match app.sort_order {
        SortOrder::Ascending => "\u{2191}",
        SortOrder::Descending => "\u{2193}",
    };

    let mut spans = vec![
        Span::styled(" q", Theme::key_hint()),
        Span::styled(" quit  ", Theme::key_desc()),
        Span::styled("s", Theme::key_hint()),
        Span::styled(
            format!(" sort ({} {order})  ", app.sort_column.label()),
            Theme::key_desc(),
        ),
        Span::styled("o", Theme::key_hint()),
        Span::styled(" order  ", Theme::key_desc()),
        Span::styled("r", Theme::key_hint()),
        Span::styled(" refresh", Theme::key_desc()),
    ];
    if let Some(status) = app.status {
        spans.push(Span::styled(format!("   {status}"), Theme::info()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DashboardSnapshot, IntervalRecord};
    use chrono::Local;

    fn snapshot_with(labels: &[(&str, u64)]) -> SharedSnapshot {
        let mut snap = DashboardSnapshot::empty(1, Local::now());
        snap.intervals = labels
            .iter()
            .map(|(l, r)| IntervalRecord {
                interval_label: l.to_string(),
                received: *r,
                ..Default::default()
            })
            .collect();
        Arc::new(snap)
    }

    #[test]
    fn test_sort_survives_rebind() {
        let mut app = App::new(snapshot_with(&[("08:00", 1), ("08:30", 5)]));
        app.next_sort_column(); // Received
        app.toggle_sort_order(); // Descending
        assert_eq!(app.view.table.rows[0].cells[0], "08:30");

        app.rebind(snapshot_with(&[("09:00", 9), ("09:30", 2), ("10:00", 4)]));
        let labels: Vec<&str> = app
            .view
            .table
            .rows
            .iter()
            .map(|r| r.cells[0].as_str())
            .collect();
        assert_eq!(labels, vec!["09:00", "10:00", "09:30"]);
    }

    #[test]
    fn test_rebind_clears_status() {
        let mut app = App::new(snapshot_with(&[]));
        app.status = Some("refresh requested");
        app.rebind(snapshot_with(&[("08:00", 1)]));
        assert!(app.status.is_none());
    }
}
