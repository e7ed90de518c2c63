//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Lesson listing with syntax highlighting and current line indicator
//! - [`stack`]: Call frames and their arenas, including expired slots
//! - [`statics`]: The process-lifetime context
//! - [`terminal`]: Console output from the lesson's `printf` calls
//! - [`status`]: Status bar with keybindings and execution state
//! - `utils`: Shared value formatting
//!
//! Each pane module exports a stateless `render_*` function; scroll state is
//! owned by [`crate::ui::App`].

mod utils;

pub mod source;
pub mod stack;
pub mod statics;
pub mod status;
pub mod terminal;

// Re-export render functions for convenience
pub use source::{render_source_pane, SourceScrollState};
pub use stack::render_stack_pane;
pub use statics::render_statics_pane;
pub use status::render_status_bar;
pub use terminal::render_terminal_pane;
