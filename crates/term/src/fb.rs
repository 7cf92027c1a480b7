//! Framebuffer of styled cells shared by every terminal backend.

use crate::core::{Error, Result};
use crate::types::{CellStyle, Point};

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

/// 2D framebuffer of styled character cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize the framebuffer.
    ///
    /// This preserves the underlying allocation when possible.
    pub fn resize(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        let len = (width as usize) * (height as usize);
        self.cells.resize(len, Cell::default());
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Checked write at a signed point.
    ///
    /// Unlike [`FrameBuffer::set`], writes outside the buffer are reported.
    pub fn try_put(&mut self, pos: Point, ch: char, style: CellStyle) -> Result<()> {
        let i = u16::try_from(pos.x)
            .ok()
            .zip(u16::try_from(pos.y).ok())
            .and_then(|(x, y)| self.idx(x, y))
            .ok_or(Error::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            })?;
        self.cells[i] = Cell { ch, style };
        Ok(())
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Glyphs of row `y` as a string (empty when out of range).
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|c| c.ch)
            .collect()
    }

    /// Whole buffer as newline-separated rows.
    pub fn text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_put_rejects_out_of_range() {
        let mut fb = FrameBuffer::new(4, 2);
        let style = CellStyle::default();
        fb.try_put(Point::new(3, 1), 'x', style).unwrap();
        assert_eq!(fb.get(3, 1).unwrap().ch, 'x');

        for p in [Point::new(4, 0), Point::new(0, 2), Point::new(-1, 0)] {
            assert!(matches!(
                fb.try_put(p, 'x', style),
                Err(Error::OutOfBounds { width: 4, height: 2, .. })
            ));
        }
    }

    #[test]
    fn row_text_reads_glyphs() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.set(1, 1, Cell { ch: 'o', style: CellStyle::default() });
        assert_eq!(fb.row_text(1), " o ");
        assert_eq!(fb.text(), "   \n o ");
        assert_eq!(fb.row_text(9), "");
    }
}
