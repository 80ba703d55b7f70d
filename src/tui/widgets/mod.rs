// src/tui/widgets/mod.rs — Widget sub-modules for each dashboard panel.

pub mod agents;
pub mod campaigns;
pub mod intervals;
pub mod kpis;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::theme::Theme;

pub(crate) fn panel(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Theme::border())
}

/// Titled empty panel shown in place of a chart with no data.
pub(crate) fn render_placeholder(f: &mut Frame, area: Rect, title: &str) {
    let p = Paragraph::new(Line::from(Span::styled(
        "  Nothing to show for this window.",
        Theme::text_dim(),
    )))
    .block(panel(format!(" {title} ")));
    f.render_widget(p, area);
}
