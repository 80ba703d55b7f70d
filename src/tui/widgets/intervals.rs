// src/tui/widgets/intervals.rs — Interval table, grouped bars and percentage lines.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use crate::tui::theme::Theme;
use crate::view::{self, IntervalChart, IntervalTable};

use super::{panel, render_placeholder};

pub fn render_table(f: &mut Frame, area: Rect, table: &IntervalTable) {
    let block = panel(format!(" Intervals ({}) ", table.rows.len()));

    if table.is_empty() {
        let p = Paragraph::new(Line::from(Span::styled(
            "  No interval data for this window.",
            Theme::text_dim(),
        )))
        .block(block);
        f.render_widget(p, area);
        return;
    }

    let sorted_label = table.sort.0.label();
    let header = Row::new(table.columns.iter().map(|c| {
        let style = if *c == sorted_label {
            Theme::table_sorted()
        } else {
            Theme::table_header()
        };
        Cell::from(*c).style(style)
    }));

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|r| {
            Row::new(r.cells.iter().enumerate().map(|(i, c)| {
                let style = if i == 0 { Theme::info() } else { Theme::text() };
                Cell::from(c.clone()).style(style)
            }))
        })
        .collect();

    let widths = [
        Constraint::Min(12),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(6),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(9),
        Constraint::Length(7),
    ];

    let t = Table::new(rows, widths).header(header).block(block);
    f.render_widget(t, area);
}

pub fn render_charts(f: &mut Frame, area: Rect, chart: &view::Chart<IntervalChart>) {
    let data = match chart {
        view::Chart::Ready(data) => data,
        view::Chart::Empty { title } => {
            render_placeholder(f, area, title);
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_bars(f, chunks[0], data);
    render_lines(f, chunks[1], data);
}

fn render_bars(f: &mut Frame, area: Rect, data: &IntervalChart) {
    let mut chart = BarChart::default()
        .block(panel(format!(" {} ", view::INTERVAL_CHART_TITLE)))
        .bar_width(2)
        .bar_gap(0)
        .group_gap(1);

    for (i, label) in data.labels.iter().enumerate() {
        let answered = data.answered.get(i).copied().unwrap_or(0);
        let abandoned = data.abandoned.get(i).copied().unwrap_or(0);
        let bars = [
            Bar::default()
                .value(answered)
                .style(Theme::answered())
                .text_value(String::new()),
            Bar::default()
                .value(abandoned)
                .style(Theme::abandoned())
                .text_value(String::new()),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(short_label(label)))
                .bars(&bars),
        );
    }

    f.render_widget(chart, area);
}

fn render_lines(f: &mut Frame, area: Rect, data: &IntervalChart) {
    let abandoned: Vec<(f64, f64)> = points(&data.pct_abandoned);
    let service: Vec<(f64, f64)> = points(&data.pct_service_level);
    let x_max = data.labels.len().saturating_sub(1).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("% Abandoned")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Theme::abandoned())
            .data(&abandoned),
        Dataset::default()
            .name("% Service Level")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Theme::answered())
            .data(&service),
    ];

    let first = data.labels.first().map(|l| short_label(l)).unwrap_or_default();
    let last = data.labels.last().map(|l| short_label(l)).unwrap_or_default();

    let chart = Chart::new(datasets)
        .block(panel(" Abandonment and service level (%) ".to_string()))
        .x_axis(
            Axis::default()
                .style(Theme::text_dim())
                .labels(vec![Span::raw(first), Span::raw(last)])
                .bounds([0.0, x_max]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Theme::GRAY))
                .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")])
                .bounds([0.0, 100.0]),
        );
    f.render_widget(chart, area);
}

fn points(series: &[f64]) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

/// `"08:00-08:30"` -> `"08:00"`.
fn short_label(label: &str) -> String {
    label.split('-').next().unwrap_or(label).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_label() {
        assert_eq!(short_label("08:00-08:30"), "08:00");
        assert_eq!(short_label("Morning"), "Morning");
    }

    #[test]
    fn test_points_indexed() {
        assert_eq!(points(&[5.0, 7.5]), vec![(0.0, 5.0), (1.0, 7.5)]);
    }
}
