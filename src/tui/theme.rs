// src/tui/theme.rs — Color scheme and style definitions for the TUI dashboard.

use ratatui::style::{Color, Modifier, Style};

use crate::view::Band;

/// Dashboard palette.
pub struct Theme;

impl Theme {
    // ── Palette ──────────────────────────────────────────────────
    pub const ACCENT: Color = Color::Rgb(90, 160, 240);
    pub const WHITE: Color = Color::Rgb(240, 240, 240);
    pub const GREEN: Color = Color::Rgb(80, 200, 120);
    pub const RED: Color = Color::Rgb(230, 80, 80);
    pub const AMBER: Color = Color::Rgb(235, 180, 50);
    pub const GRAY: Color = Color::Rgb(120, 120, 140);
    pub const DIM: Color = Color::Rgb(80, 80, 100);
    pub const CYAN: Color = Color::Rgb(80, 200, 220);

    // ── Semantic styles ──────────────────────────────────────────

    /// Main title / header bar.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Theme::DIM)
    }

    pub fn text() -> Style {
        Style::default().fg(Theme::WHITE)
    }

    /// Dimmed / secondary text.
    pub fn text_dim() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    /// Informational / accent.
    pub fn info() -> Style {
        Style::default().fg(Theme::ACCENT)
    }

    pub fn highlight() -> Style {
        Style::default()
            .fg(Theme::CYAN)
            .add_modifier(Modifier::BOLD)
    }

    /// Table header row.
    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::ACCENT)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    /// Header cell of the active sort column.
    pub fn table_sorted() -> Style {
        Theme::table_header().fg(Theme::CYAN)
    }

    /// Key hint in the footer.
    pub fn key_hint() -> Style {
        Style::default().fg(Theme::ACCENT)
    }

    /// Description next to key hint.
    pub fn key_desc() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    /// Answered segment of the interval bars.
    pub fn answered() -> Style {
        Style::default().fg(Theme::GREEN)
    }

    /// Abandoned segment of the interval bars.
    pub fn abandoned() -> Style {
        Style::default().fg(Theme::RED)
    }

    /// Style for a KPI tile value. Unbanded tiles use plain text.
    pub fn band(band: Option<Band>) -> Style {
        match band {
            Some(Band::Favorable) => Style::default().fg(Theme::GREEN),
            Some(Band::Caution) => Style::default().fg(Theme::AMBER),
            Some(Band::Unfavorable) => Style::default().fg(Theme::RED),
            None => Theme::text(),
        }
        .add_modifier(Modifier::BOLD)
    }
}
