//! User interface components
//!
//! Terminal progress for live runs, built on indicatif.

mod progress;

pub use progress::create_cursor_progress;
