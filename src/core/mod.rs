//! Core interaction model – card order, pose tables, damping, gestures.
//!
//! Nothing in this module depends on any TUI or rendering crate.  State is
//! advanced by explicit `tick(dt)` calls and every pose is derived from the
//! current order or offset, so the UI layer only ever reads snapshots.

pub mod animator;
pub mod caption;
pub mod carousel;
pub mod damping;
pub mod gesture;
pub mod item;
pub mod pulse;
pub mod stack;
pub mod transform;
