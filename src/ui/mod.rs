//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* frame snapshots and turns them into cells on
//! the terminal.  No filesystem I/O happens here.

pub mod carousel_view;
pub mod layout;
pub mod paint;
pub mod popup;
pub mod stack_view;
pub mod theme;
