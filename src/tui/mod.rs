//! TUI module: Terminal User Interface using Ratatui.
//!
//! One patient form and one result screen.

mod app;
mod styles;
mod ui;

pub use app::{App, ModelInfo};
pub use styles::MedicalTheme;
