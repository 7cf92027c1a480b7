//! State: one screen/mode of the game (menu, in-game, game over, ...).
//!
//! States never hold a pointer back to the application. Everything they may
//! touch during a hook arrives through [`Context`]: their own renderer, the
//! screen, and a command queue for requests (transitions, re-init, stop)
//! that the application applies once the hook returns.

use std::any::Any;
use std::time::Duration;

use tracing::debug;

use crate::core::{Renderer, Result, Screen};
use crate::resources::Resources;

/// Payload handed to [`State::trigger`] on a transition.
pub type StateArgs = Box<dyn Any>;

/// Request queued by a state for the application.
pub enum Command {
    /// Make `name` current, then call its `trigger` hook with `args`.
    Trigger {
        name: String,
        args: Option<StateArgs>,
    },
    /// Rebuild `name` from scratch and make it current.
    Reinit(String),
    /// Stop the scheduler after the current tick.
    Stop,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Trigger { name, args } => f
                .debug_struct("Trigger")
                .field("name", name)
                .field("has_args", &args.is_some())
                .finish(),
            Command::Reinit(name) => f.debug_tuple("Reinit").field(name).finish(),
            Command::Stop => f.write_str("Stop"),
        }
    }
}

/// Everything a state hook may use.
pub struct Context<'a> {
    /// Scene of the state this hook runs for.
    pub renderer: &'a mut Renderer,
    pub screen: &'a mut dyn Screen,
    commands: &'a mut Vec<Command>,
    resources: &'a Resources,
    state: &'static str,
    dt: Duration,
}

impl<'a> Context<'a> {
    pub fn new(
        renderer: &'a mut Renderer,
        screen: &'a mut dyn Screen,
        commands: &'a mut Vec<Command>,
        resources: &'a Resources,
        state: &'static str,
        dt: Duration,
    ) -> Self {
        Self {
            renderer,
            screen,
            commands,
            resources,
            state,
            dt,
        }
    }

    /// Name of the state this context was built for.
    ///
    /// During `build`/`postinit` this is the state under construction, which
    /// is not necessarily the active one.
    pub fn state_name(&self) -> &'static str {
        self.state
    }

    /// Scheduler quantum.
    pub fn dt(&self) -> Duration {
        self.dt
    }

    /// Shared resource of type `T` inserted into the application.
    pub fn resource<T: Any>(&self) -> Result<&'a T> {
        self.resources.require::<T>()
    }

    pub fn trigger_state(&mut self, name: &str) {
        self.push(Command::Trigger {
            name: name.to_string(),
            args: None,
        });
    }

    pub fn trigger_state_with(&mut self, name: &str, args: StateArgs) {
        self.push(Command::Trigger {
            name: name.to_string(),
            args: Some(args),
        });
    }

    pub fn trigger_reinit(&mut self, name: &str) {
        self.push(Command::Reinit(name.to_string()));
    }

    pub fn stop(&mut self) {
        self.push(Command::Stop);
    }

    /// Commands queued so far and not yet applied.
    pub fn pending(&self) -> &[Command] {
        self.commands.as_slice()
    }

    fn push(&mut self, cmd: Command) {
        debug!(state = self.state, command = ?cmd, "queued");
        self.commands.push(cmd);
    }

    /// Clear, frame, composite the scene and present it.
    pub fn render_frame(&mut self) -> Result<()> {
        self.screen.clear();
        self.screen.draw_border()?;
        self.renderer.render_all(&mut *self.screen)?;
        self.screen.present()
    }
}

/// Per-screen controller driven once per tick.
pub trait State {
    /// Second construction phase: wire up objects that need the state's
    /// scene (for example weapons registering their charges).
    fn postinit(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Called right after the state becomes current through a transition.
    fn trigger(&mut self, _ctx: &mut Context<'_>, _args: Option<StateArgs>) -> Result<()> {
        Ok(())
    }

    /// Poll and dispatch input. Must not block.
    fn events(&mut self, ctx: &mut Context<'_>) -> Result<()>;

    /// Advance owned objects by one tick.
    fn update(&mut self, ctx: &mut Context<'_>) -> Result<()>;

    /// Draw the frame.
    fn render(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.render_frame()
    }
}

/// Static shape of a registrable state.
pub trait StateBuild: State + Sized + 'static {
    /// Registry key; unique per application.
    const NAME: &'static str;

    fn build(ctx: &mut Context<'_>) -> Result<Self>;
}

/// Type-erased builder kept by the registry for re-initialization.
pub type BuildFn = fn(&mut Context<'_>) -> Result<Box<dyn State>>;

pub(crate) fn build_boxed<S: StateBuild>(ctx: &mut Context<'_>) -> Result<Box<dyn State>> {
    Ok(Box::new(S::build(ctx)?))
}
