pub mod config;
pub mod engine;
pub mod ev;
pub mod tui;
