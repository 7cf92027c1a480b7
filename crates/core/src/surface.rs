//! Surface: a small grid of glyphs with optional per-cell styles.
//!
//! Surfaces are built once (or on explicit refresh) by the object that owns
//! them and read lazily by the renderer through [`Surface::cells`].

use crate::types::{CellStyle, Point};

/// One surface cell as yielded to the renderer: local offset, glyph, style.
pub type SurfaceCell = (Point, char, Option<CellStyle>);

/// 2D grid of `(glyph, style)` cells addressed by local offsets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Surface {
    glyphs: Vec<Vec<char>>,
    styles: Vec<Vec<Option<CellStyle>>>,
}

impl Surface {
    /// Build a surface from glyph rows and a matching style grid.
    ///
    /// Missing style entries are treated as "no style".
    pub fn new(glyphs: Vec<Vec<char>>, styles: Vec<Vec<Option<CellStyle>>>) -> Self {
        Self { glyphs, styles }
    }

    /// Build an unstyled surface from text rows.
    pub fn from_rows(rows: &[&str]) -> Self {
        Self {
            glyphs: rows.iter().map(|r| r.chars().collect()).collect(),
            styles: Vec::new(),
        }
    }

    /// Build a surface from text rows with every cell sharing `style`.
    pub fn styled(rows: &[&str], style: CellStyle) -> Self {
        let glyphs: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();
        let styles = glyphs
            .iter()
            .map(|row| vec![Some(style); row.len()])
            .collect();
        Self { glyphs, styles }
    }

    /// Build a single-row surface from `(glyph, style)` pairs.
    pub fn from_line<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (char, Option<CellStyle>)>,
    {
        let (glyphs, styles): (Vec<char>, Vec<Option<CellStyle>>) = cells.into_iter().unzip();
        Self {
            glyphs: vec![glyphs],
            styles: vec![styles],
        }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.glyphs.len()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.glyphs.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Total number of cells the renderer will emit per anchor.
    pub fn len(&self) -> usize {
        self.glyphs.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn style_at(&self, x: usize, y: usize) -> Option<CellStyle> {
        self.styles.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    /// Lazily iterate all cells in row-major order.
    ///
    /// Each call starts a fresh iteration, so the same surface can be painted
    /// every frame and at any number of anchors.
    pub fn cells(&self) -> impl Iterator<Item = SurfaceCell> + '_ {
        self.glyphs.iter().enumerate().flat_map(move |(y, row)| {
            row.iter().enumerate().map(move |(x, &ch)| {
                (Point::new(x as i32, y as i32), ch, self.style_at(x, y))
            })
        })
    }
}
