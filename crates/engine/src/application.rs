//! Application: state registry plus the fixed-tick scheduler.
//!
//! One application is "current" per thread at a time. Construction installs
//! the new instance as current and dropping the current instance clears it;
//! [`current`] reports which one that is.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::core::{Error, Renderer, Result, Screen};
use crate::resources::Resources;
use crate::state::{build_boxed, BuildFn, Command, Context, State, StateArgs, StateBuild};
use crate::types::{DEFAULT_FPS, TICK_MS};

/// Identity of an application instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT: Cell<Option<AppId>> = const { Cell::new(None) };
}

/// The current application, or [`Error::NotInitialized`] if none exists.
pub fn current() -> Result<AppId> {
    CURRENT.with(Cell::get).ok_or(Error::NotInitialized)
}

/// Cooperative stop flag shared between the scheduler and its callers.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    /// Ask the scheduler to finish after the tick in flight.
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }

    fn reset(&self) {
        self.0.set(false);
    }
}

struct StateEntry {
    name: &'static str,
    state: Box<dyn State>,
    renderer: Renderer,
    build: BuildFn,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Events,
    Update,
    Render,
}

/// Owns the registered states and drives the active one every tick.
pub struct Application<S: Screen = Box<dyn Screen>> {
    id: AppId,
    screen: S,
    states: Vec<StateEntry>,
    active: Option<&'static str>,
    commands: Vec<Command>,
    resources: Resources,
    tick_interval: Duration,
    fps: u32,
    ticks: u64,
    stop: StopHandle,
}

impl Application {
    /// See [`current`].
    pub fn current() -> Result<AppId> {
        current()
    }
}

impl<S: Screen> Application<S> {
    pub fn new(screen: S) -> Self {
        let id = AppId(NEXT_ID.fetch_add(1, Ordering::Relaxed));
        CURRENT.with(|c| c.set(Some(id)));
        debug!(?id, "application created");

        Self {
            id,
            screen,
            states: Vec::new(),
            active: None,
            commands: Vec::new(),
            resources: Resources::new(),
            tick_interval: Duration::from_millis(TICK_MS as u64),
            fps: DEFAULT_FPS,
            ticks: 0,
            stop: StopHandle::default(),
        }
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn id(&self) -> AppId {
        self.id
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps;
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }

    /// Make `value` available to states through [`Context::resource`].
    ///
    /// Insert resources before registering the states that read them.
    pub fn insert_resource<T: std::any::Any>(&mut self, value: T) -> Option<T> {
        self.resources.insert(value)
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Registered state names in registration order.
    pub fn states(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.states.iter().map(|e| e.name)
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.index(name).is_some()
    }

    /// Name of the active state.
    pub fn state_name(&self) -> Result<&'static str> {
        self.active.ok_or(Error::NoActiveState)
    }

    /// Scene of a registered state.
    pub fn state_renderer(&self, name: &str) -> Option<&Renderer> {
        self.index(name).map(|i| &self.states[i].renderer)
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|e| e.name == name)
    }

    fn entry_index(&self, name: &str) -> Result<usize> {
        self.index(name)
            .ok_or_else(|| Error::UnknownState(name.to_string()))
    }

    /// Build `T` in two phases and add it to the registry.
    ///
    /// The first state ever registered becomes active; later registrations
    /// leave the active state untouched.
    pub fn register_state<T: StateBuild>(&mut self) -> Result<()> {
        self.register_with(T::NAME, build_boxed::<T>)
    }

    fn register_with(&mut self, name: &'static str, build: BuildFn) -> Result<()> {
        if self.has_state(name) {
            return Err(Error::DuplicateState(name.to_string()));
        }

        let entry = self.build_entry(name, build)?;
        self.states.push(entry);
        if self.states.len() == 1 {
            self.active = Some(name);
        }
        debug!(state = name, active = ?self.active, "registered");
        Ok(())
    }

    /// Run both construction phases against a fresh scene.
    fn build_entry(&mut self, name: &'static str, build: BuildFn) -> Result<StateEntry> {
        let mut renderer = Renderer::new();
        let state = {
            let mut ctx = Context::new(
                &mut renderer,
                &mut self.screen,
                &mut self.commands,
                &self.resources,
                name,
                self.tick_interval,
            );
            let mut state = build(&mut ctx)?;
            state.postinit(&mut ctx)?;
            state
        };
        Ok(StateEntry {
            name,
            state,
            renderer,
            build,
        })
    }

    /// Remove a state. Removing the active state leaves none active.
    pub fn deregister_state(&mut self, name: &str) -> Result<()> {
        let idx = self.entry_index(name)?;
        let entry = self.states.remove(idx);
        if self.active == Some(entry.name) {
            self.active = None;
        }
        debug!(state = entry.name, "deregistered");
        Ok(())
    }

    /// Make `name` active without calling its trigger hook.
    pub fn set_state(&mut self, name: &str) -> Result<()> {
        let idx = self.entry_index(name)?;
        self.active = Some(self.states[idx].name);
        Ok(())
    }

    /// Make `name` active, then hand `args` to its trigger hook.
    ///
    /// An unknown name fails with [`Error::UnknownState`] and leaves the
    /// active state unchanged.
    pub fn trigger_state(&mut self, name: &str, args: Option<StateArgs>) -> Result<()> {
        let idx = self.entry_index(name)?;
        let entry = &mut self.states[idx];
        debug!(from = ?self.active, to = entry.name, "transition");
        self.active = Some(entry.name);

        let mut ctx = Context::new(
            &mut entry.renderer,
            &mut self.screen,
            &mut self.commands,
            &self.resources,
            entry.name,
            self.tick_interval,
        );
        entry.state.trigger(&mut ctx, args)
    }

    /// Rebuild `name` with the same builder, then make it active.
    ///
    /// The old instance is replaced only once the rebuild succeeds; on error
    /// the registry and the active state are left as they were.
    pub fn trigger_reinit(&mut self, name: &str) -> Result<()> {
        let idx = self.entry_index(name)?;
        let (name, build) = (self.states[idx].name, self.states[idx].build);
        let entry = self.build_entry(name, build)?;
        self.states[idx] = entry;
        self.active = Some(name);
        debug!(state = name, "re-initialized");
        Ok(())
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Request the scheduler to stop; the tick in flight still completes.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Run one tick: events, update, render on the active state.
    ///
    /// Commands queued by a phase are applied before the next phase, so a
    /// transition requested from `events()` is updated and rendered in the
    /// same tick.
    pub fn tick(&mut self) -> Result<()> {
        for phase in [Phase::Events, Phase::Update, Phase::Render] {
            self.run_phase(phase)?;
            self.apply_commands()?;
        }
        self.ticks += 1;
        Ok(())
    }

    fn run_phase(&mut self, phase: Phase) -> Result<()> {
        let name = self.active.ok_or(Error::NoActiveState)?;
        let idx = self.entry_index(name)?;
        let entry = &mut self.states[idx];
        trace!(state = name, ?phase, tick = self.ticks, "phase");

        let mut ctx = Context::new(
            &mut entry.renderer,
            &mut self.screen,
            &mut self.commands,
            &self.resources,
            name,
            self.tick_interval,
        );
        match phase {
            Phase::Events => entry.state.events(&mut ctx),
            Phase::Update => entry.state.update(&mut ctx),
            Phase::Render => entry.state.render(&mut ctx),
        }
    }

    fn apply_commands(&mut self) -> Result<()> {
        while !self.commands.is_empty() {
            for cmd in std::mem::take(&mut self.commands) {
                match cmd {
                    Command::Trigger { name, args } => self.trigger_state(&name, args)?,
                    Command::Reinit(name) => self.trigger_reinit(&name)?,
                    Command::Stop => self.stop(),
                }
            }
        }
        Ok(())
    }

    /// Run the scheduler until [`Application::stop`] is requested.
    ///
    /// Fails with [`Error::NoActiveState`] before entering the loop when no
    /// state is active. Any error from a tick ends the loop and is returned.
    pub fn start(&mut self) -> Result<()> {
        if self.active.is_none() {
            return Err(Error::NoActiveState);
        }
        info!(state = ?self.active, interval_ms = self.tick_interval.as_millis() as u64, "loop started");

        let mut last_tick: Option<Instant> = None;
        let result = loop {
            if self.stop.is_stopped() {
                break Ok(());
            }

            if let Some(wait) = last_tick.and_then(|t| self.tick_interval.checked_sub(t.elapsed())) {
                thread::sleep(wait);
            }
            last_tick = Some(Instant::now());

            if let Err(e) = self.tick() {
                break Err(e);
            }
        };

        self.stop.reset();
        info!(ticks = self.ticks, ok = result.is_ok(), "loop stopped");
        result
    }
}

impl<S: Screen> Drop for Application<S> {
    fn drop(&mut self) {
        CURRENT.with(|c| {
            if c.get() == Some(self.id) {
                c.set(None);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellStyle, Key, Point};

    #[derive(Default)]
    struct NullScreen {
        presented: u32,
    }

    impl Screen for NullScreen {
        fn size(&self) -> (u16, u16) {
            (80, 24)
        }

        fn put(&mut self, _pos: Point, _glyph: char, _style: Option<CellStyle>) -> Result<()> {
            Ok(())
        }

        fn clear(&mut self) {}

        fn present(&mut self) -> Result<()> {
            self.presented += 1;
            Ok(())
        }

        fn poll_key(&mut self) -> Result<Option<Key>> {
            Ok(None)
        }
    }

    /// Counts its hooks and stops the loop after `loops` renders.
    struct Looper {
        loops: u32,
        events: u32,
        updates: u32,
    }

    impl State for Looper {
        fn events(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
            self.events += 1;
            Ok(())
        }

        fn update(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
            self.updates += 1;
            Ok(())
        }

        fn render(&mut self, ctx: &mut Context<'_>) -> Result<()> {
            self.loops = self.loops.saturating_sub(1);
            if self.loops == 0 {
                ctx.stop();
            }
            ctx.render_frame()
        }
    }

    impl StateBuild for Looper {
        const NAME: &'static str = "Looper";

        fn build(_ctx: &mut Context<'_>) -> Result<Self> {
            Ok(Self {
                loops: 3,
                events: 0,
                updates: 0,
            })
        }
    }

    struct Other;

    impl State for Other {
        fn events(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
            Ok(())
        }

        fn update(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
            Ok(())
        }
    }

    impl StateBuild for Other {
        const NAME: &'static str = "Other";

        fn build(_ctx: &mut Context<'_>) -> Result<Self> {
            Ok(Other)
        }
    }

    struct Lives(u8);

    impl State for Lives {
        fn events(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
            Ok(())
        }

        fn update(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
            Ok(())
        }
    }

    impl StateBuild for Lives {
        const NAME: &'static str = "Lives";

        fn build(ctx: &mut Context<'_>) -> Result<Self> {
            Ok(Lives(*ctx.resource::<u8>()?))
        }
    }

    #[test]
    fn build_reads_resources() {
        let mut app = Application::new(NullScreen::default());
        assert!(matches!(
            app.register_state::<Lives>(),
            Err(Error::MissingResource(_))
        ));
        assert!(!app.has_state(Lives::NAME));

        app.insert_resource(3u8);
        app.register_state::<Lives>().unwrap();
        assert_eq!(app.state_name().unwrap(), Lives::NAME);
    }

    #[test]
    fn current_tracks_latest_live_instance() {
        let a = Application::new(NullScreen::default());
        assert_eq!(current().unwrap(), a.id());
        let b = Application::new(NullScreen::default());
        assert_eq!(current().unwrap(), b.id());

        drop(a);
        assert_eq!(current().unwrap(), b.id());
        drop(b);
        assert!(matches!(current(), Err(Error::NotInitialized)));
    }

    #[test]
    fn start_without_state_fails() {
        let mut app = Application::new(NullScreen::default());
        assert!(matches!(app.start(), Err(Error::NoActiveState)));
        assert_eq!(app.ticks(), 0);
    }

    #[test]
    fn loop_runs_until_state_stops_it() {
        let mut app =
            Application::new(NullScreen::default()).with_tick_interval(Duration::from_millis(1));
        app.register_state::<Looper>().unwrap();
        app.start().unwrap();

        assert_eq!(app.ticks(), 3);
        assert_eq!(app.screen().presented, 3);
    }

    #[test]
    fn stop_before_start_runs_no_ticks() {
        let mut app = Application::new(NullScreen::default());
        app.register_state::<Other>().unwrap();
        app.stop_handle().stop();
        app.start().unwrap();
        assert_eq!(app.ticks(), 0);
        assert!(!app.stop_handle().is_stopped());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut app = Application::new(NullScreen::default());
        app.register_state::<Other>().unwrap();
        assert!(matches!(
            app.register_state::<Other>(),
            Err(Error::DuplicateState(name)) if name == "Other"
        ));
    }

    #[test]
    fn deregistering_active_state_clears_it() {
        let mut app = Application::new(NullScreen::default());
        app.register_state::<Other>().unwrap();
        app.deregister_state("Other").unwrap();
        assert!(matches!(app.state_name(), Err(Error::NoActiveState)));
        assert!(matches!(app.tick(), Err(Error::NoActiveState)));
        assert!(matches!(
            app.deregister_state("Other"),
            Err(Error::UnknownState(_))
        ));
    }

    thread_local! {
        static FLAKY_BUILDS: Cell<u32> = const { Cell::new(0) };
    }

    /// Builds once; every later build fails.
    struct Flaky(u32);

    impl State for Flaky {
        fn events(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
            Ok(())
        }

        fn update(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
            Ok(())
        }
    }

    impl StateBuild for Flaky {
        const NAME: &'static str = "Flaky";

        fn build(_ctx: &mut Context<'_>) -> Result<Self> {
            let n = FLAKY_BUILDS.with(|c| {
                c.set(c.get() + 1);
                c.get()
            });
            if n > 1 {
                return Err(Error::MissingResource("second build"));
            }
            Ok(Flaky(n))
        }
    }

    #[test]
    fn failed_reinit_keeps_previous_instance() {
        FLAKY_BUILDS.with(|c| c.set(0));
        let mut app = Application::new(NullScreen::default());
        app.register_state::<Flaky>().unwrap();
        app.register_state::<Other>().unwrap();

        assert!(matches!(
            app.trigger_reinit("Flaky"),
            Err(Error::MissingResource(_))
        ));
        assert!(app.has_state("Flaky"));
        assert_eq!(app.state_name().unwrap(), "Flaky");
        assert_eq!(app.states().collect::<Vec<_>>(), ["Flaky", "Other"]);
        assert!(app.tick().is_ok());
    }

    #[test]
    fn reinit_replaces_in_place() {
        let mut app = Application::new(NullScreen::default());
        app.register_state::<Looper>().unwrap();
        app.register_state::<Other>().unwrap();
        app.trigger_reinit("Other").unwrap();
        assert_eq!(app.state_name().unwrap(), "Other");
        assert_eq!(app.states().collect::<Vec<_>>(), ["Looper", "Other"]);
    }

    #[test]
    fn fps_is_independent_of_tick_interval() {
        let mut app = Application::new(NullScreen::default());
        assert_eq!(app.fps(), DEFAULT_FPS);
        app.set_fps(60);
        assert_eq!(app.fps(), 60);
        assert_eq!(app.tick_interval(), Duration::from_millis(TICK_MS as u64));
    }
}
