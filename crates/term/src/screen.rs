//! Screen backends: a real terminal and a headless buffer for tests.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};
use tracing::{debug, trace};

use crate::core::{Error, Result, Screen};
use crate::fb::{Cell, FrameBuffer};
use crate::input::{map_key_event, should_quit};
use crate::renderer::TerminalRenderer;
use crate::types::{CellStyle, Key, Point};

/// Terminal screen backed by a framebuffer and a diffing renderer.
pub struct TermScreen {
    fb: FrameBuffer,
    term: TerminalRenderer,
    default_style: CellStyle,
}

impl TermScreen {
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_renderer(width, height, TerminalRenderer::new())
    }

    /// Attribute-only output for terminals without true color.
    pub fn monochrome(width: u16, height: u16) -> Self {
        Self::with_renderer(width, height, TerminalRenderer::monochrome())
    }

    fn with_renderer(width: u16, height: u16, term: TerminalRenderer) -> Self {
        Self {
            fb: FrameBuffer::new(width, height),
            term,
            default_style: CellStyle::default(),
        }
    }

    /// Switch the terminal into raw/alternate-screen mode.
    pub fn enter(&mut self) -> anyhow::Result<()> {
        debug!(mono = self.term.is_mono(), "entering terminal");
        self.term.enter()
    }

    /// Restore the terminal. Safe to call after a failed frame.
    pub fn exit(&mut self) -> anyhow::Result<()> {
        self.term.exit()
    }
}

impl Screen for TermScreen {
    fn size(&self) -> (u16, u16) {
        (self.fb.width(), self.fb.height())
    }

    fn put(&mut self, pos: Point, glyph: char, style: Option<CellStyle>) -> Result<()> {
        self.fb
            .try_put(pos, glyph, style.unwrap_or(self.default_style))
    }

    fn clear(&mut self) {
        self.fb.clear(Cell {
            ch: ' ',
            style: self.default_style,
        });
    }

    fn present(&mut self) -> Result<()> {
        self.term.draw_swap(&mut self.fb)?;
        Ok(())
    }

    /// Drains non-key events until a key arrives or nothing is pending.
    ///
    /// Ctrl-C surfaces as an `Interrupted` I/O error so the loop unwinds
    /// through the normal error path and the terminal gets restored.
    fn poll_key(&mut self) -> Result<Option<Key>> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if should_quit(key) => {
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::Interrupted,
                        "interrupted by user",
                    )));
                }
                Event::Key(key) => {
                    if let Some(k) = map_key_event(key) {
                        trace!(key = ?k, "key");
                        return Ok(Some(k));
                    }
                }
                Event::Resize(w, h) => {
                    debug!(w, h, "terminal resized");
                    self.term.invalidate();
                }
                _ => {}
            }
        }
        Ok(None)
    }
}

/// In-memory screen with scripted keys.
///
/// Frames are kept in place after `present`, so tests can inspect exactly
/// what the last frame showed.
#[derive(Debug, Clone)]
pub struct HeadlessScreen {
    fb: FrameBuffer,
    keys: VecDeque<Key>,
    presented: u64,
    writes: u64,
}

impl HeadlessScreen {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            fb: FrameBuffer::new(width, height),
            keys: VecDeque::new(),
            presented: 0,
            writes: 0,
        }
    }

    pub fn push_key(&mut self, key: Key) {
        self.keys.push_back(key);
    }

    pub fn push_keys<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        self.keys.extend(keys);
    }

    pub fn pending_keys(&self) -> usize {
        self.keys.len()
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.fb
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Number of successful cell writes since creation.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// True when `needle` appears on any row of the current frame.
    pub fn contains_text(&self, needle: &str) -> bool {
        (0..self.fb.height()).any(|y| self.fb.row_text(y).contains(needle))
    }
}

impl Screen for HeadlessScreen {
    fn size(&self) -> (u16, u16) {
        (self.fb.width(), self.fb.height())
    }

    fn put(&mut self, pos: Point, glyph: char, style: Option<CellStyle>) -> Result<()> {
        self.fb.try_put(pos, glyph, style.unwrap_or_default())?;
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) {
        self.fb.clear(Cell::default());
    }

    fn present(&mut self) -> Result<()> {
        self.presented += 1;
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<Key>> {
        Ok(self.keys.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_border_and_text() {
        let mut s = HeadlessScreen::new(10, 4);
        s.draw_border().unwrap();
        s.put_str(Point::new(2, 1), "hi", None).unwrap();

        assert_eq!(s.frame().row_text(0), "┌────────┐");
        assert_eq!(s.frame().row_text(1), "│ hi     │");
        assert_eq!(s.frame().row_text(3), "└────────┘");
        assert!(s.contains_text("hi"));
    }

    #[test]
    fn headless_keys_are_fifo_and_non_blocking() {
        let mut s = HeadlessScreen::new(4, 4);
        s.push_keys([Key::Space, Key::Escape]);
        assert_eq!(s.poll_key().unwrap(), Some(Key::Space));
        assert_eq!(s.poll_key().unwrap(), Some(Key::Escape));
        assert_eq!(s.poll_key().unwrap(), None);
    }

    #[test]
    fn headless_counts_only_successful_writes() {
        let mut s = HeadlessScreen::new(2, 2);
        s.put(Point::new(1, 1), 'x', None).unwrap();
        assert!(s.put(Point::new(2, 1), 'x', None).is_err());
        assert_eq!(s.writes(), 1);
    }
}
