//! Tracker session viewer.
//!
//! Loads a single-subject tracker validation session (CSV), validates it and
//! groups the actual positions by `(tracker, label)` for plotting, either in
//! an interactive window or as a chart image.

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod prompt;
pub mod render;
pub mod state;
pub mod ui;
