// src/tui/widgets/agents.rs — Agent share of interactions.
//
// Terminals have no pie; each slice is drawn as a proportional bar.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::tui::theme::Theme;
use crate::view::{self, AgentPie};

use super::{panel, render_placeholder};

pub fn render(f: &mut Frame, area: Rect, chart: &view::Chart<AgentPie>) {
    let pie = match chart {
        view::Chart::Ready(pie) => pie,
        view::Chart::Empty { title } => {
            render_placeholder(f, area, title);
            return;
        }
    };

    let name_width = pie
        .slices
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);
    let bar_width = (area.width as usize).saturating_sub(name_width + 20);

    let lines: Vec<Line> = pie
        .slices
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|s| {
            let bar: String = "\u{2588}".repeat(share_len(s.share, bar_width));
            Line::from(vec![
                Span::styled(
                    format!(" {:<width$} ", truncate(&s.label, name_width), width = name_width),
                    Theme::text(),
                ),
                Span::styled(bar, Theme::info()),
                Span::styled(
                    format!(" {} ({:.1}%)", view::format_count(s.value), s.share * 100.0),
                    Theme::text_dim(),
                ),
            ])
        })
        .collect();

    let p = Paragraph::new(lines)
        .block(panel(format!(" {} ", view::AGENT_CHART_TITLE)))
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

fn share_len(share: f64, width: usize) -> usize {
    ((share.clamp(0.0, 1.0) * width as f64).round() as usize).min(width)
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
