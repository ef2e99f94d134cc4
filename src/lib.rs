//! Friend Circle Lite in the terminal.
//!
//! The library half holds everything below the event loop: the cached feed
//! loader, the widget state engine (author filter, pagination, projection)
//! and the configuration, theme and keybinding layers the UI reads.

pub mod app;
pub mod config;
pub mod feed;
pub mod keybindings;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
pub mod widget;
