//! Engine module - states and the fixed-tick application loop
//!
//! An [`Application`] owns a registry of named [`State`]s, each paired with
//! its own [`Renderer`](xoinvader_core::Renderer) scene. Every tick it runs
//! `events()`, `update()` and `render()` on the active state, applying the
//! [`Command`]s those hooks queue between phases.
//!
//! # Lifecycle
//!
//! 1. [`Application::new`] installs the instance as [`current`];
//!    [`Application::insert_resource`] provides what states read while
//!    building.
//! 2. [`Application::register_state`] builds a state in two phases
//!    ([`StateBuild::build`], then [`State::postinit`]); the first state
//!    registered becomes active.
//! 3. [`Application::start`] blocks on the scheduler until a state calls
//!    [`Context::stop`] or a [`StopHandle`] is used.
//!
//! # Example
//!
//! ```
//! use xoinvader_core::Result;
//! use xoinvader_engine::{Application, Context, State, StateBuild};
//! # use xoinvader_core::Screen;
//! # use xoinvader_types::{CellStyle, Key, Point};
//! # struct Blank;
//! # impl Screen for Blank {
//! #     fn size(&self) -> (u16, u16) { (10, 5) }
//! #     fn put(&mut self, _: Point, _: char, _: Option<CellStyle>) -> Result<()> { Ok(()) }
//! #     fn clear(&mut self) {}
//! #     fn present(&mut self) -> Result<()> { Ok(()) }
//! #     fn poll_key(&mut self) -> Result<Option<Key>> { Ok(None) }
//! # }
//!
//! struct Idle;
//!
//! impl State for Idle {
//!     fn events(&mut self, ctx: &mut Context<'_>) -> Result<()> {
//!         ctx.stop();
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! impl StateBuild for Idle {
//!     const NAME: &'static str = "Idle";
//!
//!     fn build(_ctx: &mut Context<'_>) -> Result<Self> {
//!         Ok(Idle)
//!     }
//! }
//!
//! let mut app = Application::new(Blank);
//! app.register_state::<Idle>()?;
//! app.start()?;
//! assert_eq!(app.ticks(), 1);
//! # Ok::<(), xoinvader_core::Error>(())
//! ```

pub mod application;
pub mod resources;
pub mod state;

pub use xoinvader_core as core;
pub use xoinvader_types as types;

pub use application::{current, AppId, Application, StopHandle};
pub use resources::Resources;
pub use state::{BuildFn, Command, Context, State, StateArgs, StateBuild};
