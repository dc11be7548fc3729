//! Terminal output for build progress.
//!
//! Everything here writes to stderr; stdout carries only command results.

pub mod colors;
pub mod events;
pub mod table;

pub use colors::{colorize_status, status_line};
pub use events::spawn_event_printer;
pub use table::render_summary;
