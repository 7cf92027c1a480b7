//! Render core - the object model every state draws through
//!
//! This crate holds the pieces that do not depend on any terminal library:
//!
//! - [`surface`]: glyph/style grids built by game objects
//! - [`render`]: the [`Renderable`] contract and the ordered, non-owning [`Renderer`]
//! - [`object`]: [`GameObject`] (renderable + per-tick update) and [`ObjectList`]
//! - [`screen`]: the [`Screen`] trait backends implement
//! - [`error`]: the shared [`Error`] kinds
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use xoinvader_core::{shared, RenderData, Renderable, Renderer, Surface};
//! use xoinvader_types::Point;
//!
//! struct Star(Rc<Surface>);
//!
//! impl Renderable for Star {
//!     fn get_render_data(&self) -> RenderData {
//!         RenderData::single(Point::new(3, 3), Rc::clone(&self.0))
//!     }
//! }
//!
//! let star = shared(Star(Rc::new(Surface::from_rows(&["*"]))));
//! let mut renderer = Renderer::new();
//! renderer.add_object(&star);
//! assert!(renderer.contains(&star));
//! renderer.remove_object(&star).unwrap();
//! assert!(renderer.is_empty());
//! ```

pub mod error;
pub mod object;
pub mod render;
pub mod screen;
pub mod surface;

pub use xoinvader_types as types;

pub use error::{Error, Result};
pub use object::{shared, GameObject, ObjectList, Shared};
pub use render::{RenderData, Renderable, Renderer};
pub use screen::Screen;
pub use surface::{Surface, SurfaceCell};
