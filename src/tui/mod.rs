// src/tui/mod.rs — TUI dashboard module.
//
// Terminal dashboard built with ratatui. Launch via `callboard dashboard`.

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::run_dashboard;
