//! Terminal backends for the [`Screen`](xoinvader_core::Screen) trait.
//!
//! Everything draws into a simple framebuffer first; the terminal backend then
//! flushes only what changed since the previous frame.
//!
//! - [`TermScreen`]: crossterm terminal, true color or monochrome
//! - [`HeadlessScreen`]: in-memory buffer with scripted keys, used by tests

pub mod fb;
pub mod renderer;
pub mod screen;

pub use xoinvader_core as core;
pub use xoinvader_input as input;
pub use xoinvader_types as types;

pub use fb::{Cell, FrameBuffer};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use screen::{HeadlessScreen, TermScreen};
