//! Interactive TUI interface

mod app;
mod rendering;

pub use app::{App, Message, MessageStyle, SetupField, SetupForm, Statistics, run_tui};
pub use rendering::ui;
