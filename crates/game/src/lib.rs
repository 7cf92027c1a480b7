//! Game module - the XOInvader states, widgets and weapons
//!
//! [`create_game`] assembles an [`Application`] with every state registered:
//! `InGameState` first (so it starts active), then `MainMenuState` and
//! `GameOverState`. The crate is backend-agnostic; any [`Screen`] works.
//!
//! # Example
//!
//! ```
//! use xoinvader_game::{create_game, GameConfig, InGameState};
//! use xoinvader_engine::StateBuild;
//! use xoinvader_term::HeadlessScreen;
//! use xoinvader_types::Key;
//!
//! let mut screen = HeadlessScreen::new(80, 24);
//! screen.push_key(Key::Char('g'));
//!
//! let mut app = create_game(screen, &GameConfig::default())?;
//! assert_eq!(app.state_name()?, InGameState::NAME);
//! app.tick()?;
//! assert!(app.screen().contains_text("Your score: 0"));
//! # Ok::<(), xoinvader_game::GameError>(())
//! ```

pub mod config;
pub mod gui;
pub mod ship;
pub mod states;
pub mod theme;
pub mod weapon;

pub use xoinvader_core as core;
pub use xoinvader_engine as engine;
pub use xoinvader_input as input;
pub use xoinvader_types as types;

pub use config::{Ammo, ConfigError, GameConfig, VideoDriver, WeaponParams, WeaponsConfig};
pub use ship::{Loadout, PlayerShip};
pub use states::{GameOverState, InGameState, MainMenuState, MenuAction};
pub use weapon::{Timer, Weapon, WeaponError, WeaponKind};

use thiserror::Error;
use tracing::info;

use crate::core::Screen;
use crate::engine::Application;

/// Failure while assembling the game.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] crate::core::Error),
}

/// Build the game on `screen` with every state registered.
pub fn create_game<S: Screen>(screen: S, config: &GameConfig) -> Result<Application<S>, GameError> {
    let weapons = config.load_weapons()?;
    let loadout = Loadout::player(&weapons)?;

    let mut app = Application::new(screen).with_tick_interval(config.tick);
    app.set_fps(config.fps);
    app.insert_resource(loadout);
    app.insert_resource(weapons);

    app.register_state::<InGameState>()?;
    app.register_state::<MainMenuState>()?;
    app.register_state::<GameOverState>()?;

    info!(
        driver = ?config.video_driver,
        sound = config.sound,
        fps = config.fps,
        "game created"
    );
    Ok(app)
}
