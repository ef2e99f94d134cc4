//! Terminal user interface.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard dispatch per context
//! - `events` - Background task results
//! - `render` - Layout and overlay stacking
//! - `articles`, `filter`, `author`, `stats`, `status`, `help` - Widgets
//! - `helpers` - Browser opening and geometry

mod articles;
mod author;
mod events;
mod filter;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod stats;
mod status;

pub use loop_runner::{run, Action};
