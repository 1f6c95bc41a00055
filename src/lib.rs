//! A reusable dialog widget with overlay, escape handling and lifecycle
//! events, rendered to the terminal with ratatui.

pub mod config;
pub mod tui;
