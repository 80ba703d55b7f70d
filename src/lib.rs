// src/lib.rs — Library root for callboard

pub mod access;
pub mod api;
pub mod catalog;
pub mod cli;
pub mod infra;
pub mod metrics;
pub mod model;
pub mod refresh;
pub mod store;
pub mod tui;
pub mod view;
