//! Game objects and the per-state object list.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};
use crate::render::{Renderable, Renderer};

/// Shared, single-threaded handle to a game object.
pub type Shared<T> = Rc<RefCell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// A renderable that also advances every tick.
pub trait GameObject: Renderable {
    /// Advance by one tick of length `dt`.
    fn update(&mut self, _dt: Duration) {}

    /// Expired objects are removed from their list after the update pass.
    fn expired(&self) -> bool {
        false
    }
}

/// Objects owned by one state, kept in step with that state's renderer.
#[derive(Default)]
pub struct ObjectList {
    objects: Vec<Rc<RefCell<dyn GameObject>>>,
}

impl ObjectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Take ownership of `obj` and register it for rendering.
    pub fn add<T: GameObject + 'static>(&mut self, renderer: &mut Renderer, obj: Shared<T>) {
        renderer.add_object(&obj);
        self.objects.push(obj);
    }

    /// Drop `obj` from the list and from the renderer.
    pub fn remove<T: ?Sized>(&mut self, renderer: &mut Renderer, obj: &Rc<T>) -> Result<()> {
        let target = Rc::as_ptr(obj).cast::<()>();
        let idx = self
            .objects
            .iter()
            .position(|o| Rc::as_ptr(o).cast::<()>() == target)
            .ok_or(Error::NotRegistered)?;
        renderer.remove_object(obj)?;
        self.objects.remove(idx);
        Ok(())
    }

    /// Update every object in order, then retire the expired ones.
    pub fn update_all(&mut self, renderer: &mut Renderer, dt: Duration) -> Result<()> {
        for obj in &self.objects {
            obj.borrow_mut().update(dt);
        }

        let expired: Vec<_> = self
            .objects
            .iter()
            .filter(|o| o.borrow().expired())
            .cloned()
            .collect();
        for obj in expired {
            debug!("retiring expired object");
            self.remove(renderer, &obj)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderData;
    use crate::surface::Surface;
    use crate::types::Point;

    struct Fader {
        ttl: u32,
    }

    impl Renderable for Fader {
        fn get_render_data(&self) -> RenderData {
            RenderData::single(Point::new(0, 0), Rc::new(Surface::from_rows(&["~"])))
        }
    }

    impl GameObject for Fader {
        fn update(&mut self, _dt: Duration) {
            self.ttl = self.ttl.saturating_sub(1);
        }

        fn expired(&self) -> bool {
            self.ttl == 0
        }
    }

    #[test]
    fn expired_objects_leave_list_and_renderer() {
        let mut renderer = Renderer::new();
        let mut list = ObjectList::new();
        let short = shared(Fader { ttl: 1 });
        let long = shared(Fader { ttl: 3 });
        list.add(&mut renderer, Rc::clone(&short));
        list.add(&mut renderer, Rc::clone(&long));

        list.update_all(&mut renderer, Duration::from_millis(30)).unwrap();

        assert_eq!(list.len(), 1);
        assert!(!renderer.contains(&short));
        assert!(renderer.contains(&long));
    }

    #[test]
    fn remove_unknown_object_is_not_registered() {
        let mut renderer = Renderer::new();
        let mut list = ObjectList::new();
        let stray = shared(Fader { ttl: 1 });
        assert!(matches!(
            list.remove(&mut renderer, &stray),
            Err(Error::NotRegistered)
        ));
    }
}
