// src/tui/widgets/campaigns.rs — Horizontal campaign bars.

use ratatui::{
    layout::{Direction, Rect},
    text::Line,
    widgets::{Bar, BarChart, BarGroup},
    Frame,
};

use crate::tui::theme::Theme;
use crate::view::{self, CampaignChart};

use super::{panel, render_placeholder};

pub fn render(f: &mut Frame, area: Rect, chart: &view::Chart<CampaignChart>) {
    let data = match chart {
        view::Chart::Ready(data) => data,
        view::Chart::Empty { title } => {
            render_placeholder(f, area, title);
            return;
        }
    };

    // Bars draw top-down; reversed so the smallest sits at the bottom.
    let bars: Vec<Bar> = data
        .bars
        .iter()
        .rev()
        .map(|(name, count)| {
            Bar::default()
                .value(*count)
                .label(Line::from(name.clone()))
                .text_value(view::format_count(*count))
                .style(Theme::info())
                .value_style(Theme::text())
        })
        .collect();

    let chart = BarChart::default()
        .block(panel(format!(" {} ", view::CAMPAIGN_CHART_TITLE)))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}
