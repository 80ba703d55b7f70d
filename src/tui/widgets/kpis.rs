// src/tui/widgets/kpis.rs — KPI tile row.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme::Theme;
use crate::view::KpiTile;

use super::panel;

pub fn render(f: &mut Frame, area: Rect, tiles: &[KpiTile]) {
    if tiles.is_empty() {
        return;
    }
    let constraints: Vec<Constraint> = tiles
        .iter()
        .map(|_| Constraint::Ratio(1, tiles.len() as u32))
        .collect();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (tile, cell) in tiles.iter().zip(cells.iter()) {
        let p = Paragraph::new(Line::from(Span::styled(
            tile.value.clone(),
            Theme::band(tile.band),
        )))
        .alignment(Alignment::Center)
        .block(panel(format!(" {} ", tile.label)));
        f.render_widget(p, *cell);
    }
}
