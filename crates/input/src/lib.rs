//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::Key`] and provides per-state
//! key bindings that turn keys into state-specific actions.

pub mod keymap;
pub mod map;

pub use xoinvader_types as types;

pub use keymap::{KeyMap, MAX_KEYS_PER_TICK};
pub use map::{map_key_event, should_quit};
