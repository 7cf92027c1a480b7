//! Renderer: composites registered renderables onto a screen.
//!
//! The renderer does not own what it draws. It keeps weak registrations in
//! insertion order; the state, ship or weapon that created an object owns it.
//! Registration order is paint order: later objects overwrite earlier ones at
//! overlapping cells.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::screen::Screen;
use crate::surface::Surface;
use crate::types::Point;

/// What a renderable hands to the renderer for one frame.
///
/// The same `image` is painted once per anchor.
#[derive(Debug, Clone)]
pub struct RenderData {
    pub anchors: Vec<Point>,
    pub image: Rc<Surface>,
}

impl RenderData {
    pub fn single(anchor: Point, image: Rc<Surface>) -> Self {
        Self {
            anchors: vec![anchor],
            image,
        }
    }

    /// Number of cell writes this data produces.
    pub fn cell_count(&self) -> usize {
        self.anchors.len() * self.image.len()
    }
}

/// Anything the renderer can draw.
pub trait Renderable {
    /// Anchors plus the local cell image for the current frame.
    ///
    /// Every call is independent; nothing is consumed across frames.
    fn get_render_data(&self) -> RenderData;
}

impl<T: Renderable + ?Sized> Renderable for RefCell<T> {
    fn get_render_data(&self) -> RenderData {
        self.borrow().get_render_data()
    }
}

/// Address used to compare registrations by identity.
fn addr<T: ?Sized>(ptr: *const T) -> *const () {
    ptr.cast::<()>()
}

/// Insertion-ordered, non-owning render list.
#[derive(Default)]
pub struct Renderer {
    objects: Vec<Weak<dyn Renderable>>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registrations, including ones whose owner is already gone.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains<R: ?Sized>(&self, obj: &Rc<R>) -> bool {
        self.position(addr(Rc::as_ptr(obj))).is_some()
    }

    fn position(&self, target: *const ()) -> Option<usize> {
        self.objects
            .iter()
            .position(|w| addr(Weak::as_ptr(w)) == target)
    }

    /// Register an object for future frames.
    ///
    /// Registering the same object twice is rejected: the second call is
    /// ignored and logged.
    pub fn add_object<R: Renderable + 'static>(&mut self, obj: &Rc<R>) {
        if self.contains(obj) {
            warn!(object = ?Rc::as_ptr(obj), "duplicate renderer registration ignored");
            return;
        }
        let weak: Weak<dyn Renderable> = Rc::downgrade(obj) as Weak<dyn Renderable>;
        self.objects.push(weak);
        debug!(object = ?Rc::as_ptr(obj), total = self.objects.len(), "add object");
    }

    /// Unregister an object by identity.
    ///
    /// Fails with [`Error::NotRegistered`] (leaving the list untouched) when
    /// the object is not currently registered.
    pub fn remove_object<R: ?Sized>(&mut self, obj: &Rc<R>) -> Result<()> {
        let idx = self
            .position(addr(Rc::as_ptr(obj)))
            .ok_or(Error::NotRegistered)?;
        self.objects.remove(idx);
        debug!(object = ?addr(Rc::as_ptr(obj)), total = self.objects.len(), "remove object");
        Ok(())
    }

    /// Paint every registered object onto `screen`.
    ///
    /// Screen errors (for example out-of-bounds writes) abort the pass and
    /// are returned unchanged.
    pub fn render_all(&mut self, screen: &mut dyn Screen) -> Result<()> {
        let before = self.objects.len();
        self.objects.retain(|w| w.strong_count() > 0);
        if self.objects.len() != before {
            debug!(pruned = before - self.objects.len(), "dropped stale registrations");
        }

        let mut written = 0usize;
        for obj in self.objects.iter().filter_map(Weak::upgrade) {
            let data = obj.get_render_data();
            for &anchor in &data.anchors {
                for (pos, glyph, style) in data.image.cells() {
                    screen.put(anchor + pos, glyph, style)?;
                    written += 1;
                }
            }
        }

        trace!(objects = self.objects.len(), cells = written, "rendered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellStyle, Key};

    struct Sprite {
        anchors: Vec<Point>,
        image: Rc<Surface>,
    }

    impl Renderable for Sprite {
        fn get_render_data(&self) -> RenderData {
            RenderData {
                anchors: self.anchors.clone(),
                image: Rc::clone(&self.image),
            }
        }
    }

    fn sprite(rows: &[&str], anchors: &[Point]) -> Rc<RefCell<Sprite>> {
        Rc::new(RefCell::new(Sprite {
            anchors: anchors.to_vec(),
            image: Rc::new(Surface::from_rows(rows)),
        }))
    }

    #[derive(Default)]
    struct LogScreen {
        writes: Vec<(Point, char)>,
    }

    impl Screen for LogScreen {
        fn size(&self) -> (u16, u16) {
            (20, 10)
        }

        fn put(&mut self, pos: Point, glyph: char, _style: Option<CellStyle>) -> Result<()> {
            let (w, h) = self.size();
            if pos.x < 0 || pos.y < 0 || pos.x >= w as i32 || pos.y >= h as i32 {
                return Err(Error::OutOfBounds {
                    x: pos.x,
                    y: pos.y,
                    width: w,
                    height: h,
                });
            }
            self.writes.push((pos, glyph));
            Ok(())
        }

        fn clear(&mut self) {
            self.writes.clear();
        }

        fn present(&mut self) -> Result<()> {
            Ok(())
        }

        fn poll_key(&mut self) -> Result<Option<Key>> {
            Ok(None)
        }
    }

    #[test]
    fn paints_in_registration_order() {
        let a = sprite(&["a"], &[Point::new(1, 1)]);
        let b = sprite(&["b"], &[Point::new(1, 1)]);
        let mut r = Renderer::new();
        r.add_object(&a);
        r.add_object(&b);

        let mut screen = LogScreen::default();
        r.render_all(&mut screen).unwrap();
        assert_eq!(
            screen.writes,
            vec![(Point::new(1, 1), 'a'), (Point::new(1, 1), 'b')]
        );
    }

    #[test]
    fn duplicate_add_is_ignored() {
        let a = sprite(&["a"], &[Point::new(0, 0)]);
        let mut r = Renderer::new();
        r.add_object(&a);
        r.add_object(&a);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn remove_unregistered_fails_without_mutation() {
        let a = sprite(&["a"], &[Point::new(0, 0)]);
        let b = sprite(&["b"], &[Point::new(0, 0)]);
        let mut r = Renderer::new();
        r.add_object(&a);

        assert!(matches!(r.remove_object(&b), Err(Error::NotRegistered)));
        assert_eq!(r.len(), 1);
        assert!(r.contains(&a));

        r.remove_object(&a).unwrap();
        assert!(matches!(r.remove_object(&a), Err(Error::NotRegistered)));
    }

    #[test]
    fn dropped_owner_is_pruned() {
        let a = sprite(&["a"], &[Point::new(0, 0)]);
        let mut r = Renderer::new();
        r.add_object(&a);
        drop(a);

        let mut screen = LogScreen::default();
        r.render_all(&mut screen).unwrap();
        assert!(screen.writes.is_empty());
        assert!(r.is_empty());
    }

    #[test]
    fn out_of_bounds_write_propagates() {
        let a = sprite(&["abc"], &[Point::new(18, 0)]);
        let mut r = Renderer::new();
        r.add_object(&a);

        let mut screen = LogScreen::default();
        let err = r.render_all(&mut screen).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { x: 20, y: 0, .. }));
        assert_eq!(screen.writes.len(), 2);
    }

    #[test]
    fn multi_anchor_paints_image_at_every_anchor() {
        let anchors = [Point::new(1, 1), Point::new(5, 2), Point::new(9, 3)];
        let a = sprite(&["^", "|", "*"], &anchors);
        assert_eq!(a.get_render_data().cell_count(), 9);

        let mut r = Renderer::new();
        r.add_object(&a);
        let mut screen = LogScreen::default();
        r.render_all(&mut screen).unwrap();

        assert_eq!(screen.writes.len(), 9);
        assert_eq!(screen.writes[3], (Point::new(5, 2), '^'));
        assert_eq!(screen.writes[8], (Point::new(9, 5), '*'));
    }
}
