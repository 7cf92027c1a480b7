//! Screen: the minimal drawing and input surface the core depends on.
//!
//! Concrete backends (terminal, monochrome terminal, headless) live in the
//! `xoinvader-term` crate.

use crate::error::Result;
use crate::types::{CellStyle, Key, Point};

/// Backend surface the renderer and states draw into.
pub trait Screen {
    /// Addressable extent as `(width, height)`.
    fn size(&self) -> (u16, u16);

    /// Write one glyph at an absolute position.
    ///
    /// `None` means the backend's default style. Positions outside
    /// [`Screen::size`] fail with [`crate::Error::OutOfBounds`].
    fn put(&mut self, pos: Point, glyph: char, style: Option<CellStyle>) -> Result<()>;

    /// Reset every cell to blank.
    fn clear(&mut self);

    /// Draw a one-cell frame around the whole extent.
    fn draw_border(&mut self) -> Result<()> {
        let (w, h) = self.size();
        if w < 2 || h < 2 {
            return Ok(());
        }
        let (r, b) = (w as i32 - 1, h as i32 - 1);
        for x in 1..r {
            self.put(Point::new(x, 0), '─', None)?;
            self.put(Point::new(x, b), '─', None)?;
        }
        for y in 1..b {
            self.put(Point::new(0, y), '│', None)?;
            self.put(Point::new(r, y), '│', None)?;
        }
        self.put(Point::new(0, 0), '┌', None)?;
        self.put(Point::new(r, 0), '┐', None)?;
        self.put(Point::new(0, b), '└', None)?;
        self.put(Point::new(r, b), '┘', None)?;
        Ok(())
    }

    /// Write a string left to right starting at `pos`.
    fn put_str(&mut self, pos: Point, s: &str, style: Option<CellStyle>) -> Result<()> {
        for (i, ch) in s.chars().enumerate() {
            self.put(Point::new(pos.x + i as i32, pos.y), ch, style)?;
        }
        Ok(())
    }

    /// Show the composed frame.
    fn present(&mut self) -> Result<()>;

    /// Non-blocking key poll: `Ok(None)` when no key is pending.
    fn poll_key(&mut self) -> Result<Option<Key>>;
}

impl<S: Screen + ?Sized> Screen for Box<S> {
    fn size(&self) -> (u16, u16) {
        (**self).size()
    }

    fn put(&mut self, pos: Point, glyph: char, style: Option<CellStyle>) -> Result<()> {
        (**self).put(pos, glyph, style)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn draw_border(&mut self) -> Result<()> {
        (**self).draw_border()
    }

    fn put_str(&mut self, pos: Point, s: &str, style: Option<CellStyle>) -> Result<()> {
        (**self).put_str(pos, s, style)
    }

    fn present(&mut self) -> Result<()> {
        (**self).present()
    }

    fn poll_key(&mut self) -> Result<Option<Key>> {
        (**self).poll_key()
    }
}
