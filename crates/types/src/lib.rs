//! Core types module - shared value types and constants
//!
//! This module defines the small value types used by every other crate in the
//! workspace. All types are plain data with no external dependencies, so they
//! can be used by the render core, the engine, terminal backends and tests.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 30 | Scheduler quantum between two ticks |
//! | `DEFAULT_FPS` | 30 | Desired display rate reported by the application |
//!
//! The tick interval is a scheduler quantum, not the frame rate.
//!
//! # Layout Constants
//!
//! The playing field defaults to a classic 80x24 terminal with a one-cell
//! border on every side.
//!
//! # Examples
//!
//! ```
//! use xoinvader_types::Point;
//!
//! let anchor = Point::new(10, 5);
//! let local = Point::new(1, 2);
//! assert_eq!(anchor + local, Point::new(11, 7));
//! ```

use std::ops::{Add, AddAssign, Sub};

/// Fixed scheduler interval in milliseconds.
pub const TICK_MS: u32 = 30;

/// Default desired frames per second.
pub const DEFAULT_FPS: u32 = 30;

/// Default field width in cells, border included.
pub const FIELD_WIDTH: u16 = 80;

/// Default field height in cells, border included.
pub const FIELD_HEIGHT: u16 = 24;

/// Integer position on the screen or offset inside a surface.
///
/// `x` grows to the right and `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Minimal per-cell styling.
///
/// This is the "style tag" carried by surface cells. Cells without a style
/// are drawn with the screen's default style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl CellStyle {
    pub const fn fg(fg: Rgb) -> Self {
        Self {
            fg,
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::fg(Rgb::new(220, 220, 220))
    }
}

/// Backend-independent key code.
///
/// Terminal backends translate their native events into this type so states
/// never depend on a particular input library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Space,
    Up,
    Down,
    Left,
    Right,
}
