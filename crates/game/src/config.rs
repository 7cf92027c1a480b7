//! Game configuration: environment settings and the weapon table.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::types::{DEFAULT_FPS, FIELD_HEIGHT, FIELD_WIDTH, TICK_MS};

/// Weapon table shipped with the game.
pub const DEFAULT_WEAPONS_JSON: &str = include_str!("../assets/weapons.json");

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown video driver: '{0}' (expected 'terminal' or 'mono')")]
    UnknownDriver(String),

    #[error("weapon config has no section '{0}'")]
    MissingSection(String),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed weapon config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Screen backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoDriver {
    /// True-color terminal output.
    #[default]
    Terminal,
    /// Attributes only, for terminals without color support.
    Mono,
}

impl VideoDriver {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_lowercase().as_str() {
            "terminal" | "curses" => Ok(Self::Terminal),
            "mono" | "monochrome" => Ok(Self::Mono),
            _ => Err(ConfigError::UnknownDriver(name.to_string())),
        }
    }
}

/// Startup settings. CLI flags are applied on top of [`GameConfig::from_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub video_driver: VideoDriver,
    pub sound: bool,
    pub fps: u32,
    pub tick: Duration,
    pub field_width: u16,
    pub field_height: u16,
    /// External weapon table; the built-in one is used when `None`.
    pub weapons_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            video_driver: VideoDriver::Terminal,
            sound: true,
            fps: DEFAULT_FPS,
            tick: Duration::from_millis(TICK_MS as u64),
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            weapons_path: None,
        }
    }
}

impl GameConfig {
    /// Read `XOINVADER_*` environment variables.
    ///
    /// Unparsable numbers fall back to their defaults; an unknown video
    /// driver is an error since it would silently pick the wrong backend.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GameConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let video_driver = match lookup("XOINVADER_VIDEO_DRIVER") {
            Some(name) => VideoDriver::parse(&name)?,
            None => defaults.video_driver,
        };
        let fps = parse_or(&lookup, "XOINVADER_FPS", defaults.fps);
        let tick = lookup("XOINVADER_TICK_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.tick);
        let weapons_path = lookup("XOINVADER_WEAPONS")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            video_driver,
            fps,
            tick,
            weapons_path,
            ..defaults
        })
    }

    /// Load the weapon table from `weapons_path`, or the built-in one.
    pub fn load_weapons(&self) -> Result<WeaponsConfig, ConfigError> {
        match &self.weapons_path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                WeaponsConfig::from_json(&text)
            }
            None => WeaponsConfig::from_json(DEFAULT_WEAPONS_JSON),
        }
    }
}

fn parse_or<F>(lookup: &F, key: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default, "ignoring unparsable setting");
            default
        }),
        None => default,
    }
}

/// Ammunition count: a number, or `"infinite"` in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "AmmoRepr")]
pub enum Ammo {
    Finite(u32),
    Infinite,
}

impl Ammo {
    /// Count shown in the HUD; infinite ammo shows as 999.
    pub fn display(self) -> u32 {
        match self {
            Ammo::Finite(n) => n,
            Ammo::Infinite => 999,
        }
    }
}

impl fmt::Display for Ammo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmmoRepr {
    Count(u32),
    Word(String),
}

impl TryFrom<AmmoRepr> for Ammo {
    type Error = String;

    fn try_from(repr: AmmoRepr) -> Result<Self, Self::Error> {
        match repr {
            AmmoRepr::Count(n) => Ok(Ammo::Finite(n)),
            AmmoRepr::Word(w) if w.eq_ignore_ascii_case("infinite") => Ok(Ammo::Infinite),
            AmmoRepr::Word(w) => w
                .parse()
                .map(Ammo::Finite)
                .map_err(|_| format!("expected a count or \"infinite\", got \"{w}\"")),
        }
    }
}

/// Parameters of one weapon section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeaponParams {
    pub ammo: Ammo,
    pub max_ammo: Ammo,
    /// Seconds between two shots.
    pub cooldown: f32,
    pub damage: u32,
    pub radius: u32,
    /// Rows a charge climbs per tick; negative values move downwards.
    pub dy: i32,
}

/// Weapon sections keyed by weapon kind name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct WeaponsConfig {
    sections: HashMap<String, WeaponParams>,
}

impl WeaponsConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        for (name, params) in &config.sections {
            if !params.cooldown.is_finite() || params.cooldown < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: format!("{name}.cooldown"),
                    value: params.cooldown.to_string(),
                });
            }
        }
        Ok(config)
    }

    pub fn params(&self, section: &str) -> Result<&WeaponParams, ConfigError> {
        self.sections
            .get(section)
            .ok_or_else(|| ConfigError::MissingSection(section.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = GameConfig::from_lookup(vars(&[])).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn environment_overrides() {
        let config = GameConfig::from_lookup(vars(&[
            ("XOINVADER_VIDEO_DRIVER", "Mono"),
            ("XOINVADER_FPS", "60"),
            ("XOINVADER_TICK_MS", "15"),
            ("XOINVADER_WEAPONS", "/tmp/w.json"),
        ]))
        .unwrap();
        assert_eq!(config.video_driver, VideoDriver::Mono);
        assert_eq!(config.fps, 60);
        assert_eq!(config.tick, Duration::from_millis(15));
        assert_eq!(config.weapons_path, Some(PathBuf::from("/tmp/w.json")));
    }

    #[test]
    fn bad_numbers_fall_back() {
        let config = GameConfig::from_lookup(vars(&[
            ("XOINVADER_FPS", "fast"),
            ("XOINVADER_TICK_MS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.fps, DEFAULT_FPS);
        assert_eq!(config.tick, Duration::from_millis(TICK_MS as u64));
    }

    #[test]
    fn unknown_driver_is_an_error() {
        let err = GameConfig::from_lookup(vars(&[("XOINVADER_VIDEO_DRIVER", "pygame")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDriver(name) if name == "pygame"));
    }

    #[test]
    fn builtin_weapons_have_every_kind() {
        let weapons = WeaponsConfig::from_json(DEFAULT_WEAPONS_JSON).unwrap();
        for section in ["Blaster", "EBlaster", "Laser", "UM"] {
            weapons.params(section).unwrap();
        }
        assert_eq!(weapons.params("Blaster").unwrap().ammo, Ammo::Infinite);
        assert_eq!(weapons.params("UM").unwrap().ammo, Ammo::Finite(10));
    }

    #[test]
    fn ammo_accepts_numbers_and_words() {
        let text = r#"{"X": {"ammo": "12", "max_ammo": "INFINITE",
                             "cooldown": 0, "damage": 1, "radius": 0, "dy": 1}}"#;
        let weapons = WeaponsConfig::from_json(text).unwrap();
        let x = weapons.params("X").unwrap();
        assert_eq!(x.ammo, Ammo::Finite(12));
        assert_eq!(x.max_ammo, Ammo::Infinite);
        assert_eq!(x.max_ammo.display(), 999);
    }

    #[test]
    fn rejects_bad_sections() {
        let bad_ammo = r#"{"X": {"ammo": "lots", "max_ammo": 1,
                                 "cooldown": 0, "damage": 1, "radius": 0, "dy": 1}}"#;
        assert!(matches!(
            WeaponsConfig::from_json(bad_ammo),
            Err(ConfigError::Parse(_))
        ));

        let bad_cooldown = r#"{"X": {"ammo": 1, "max_ammo": 1,
                                     "cooldown": -1, "damage": 1, "radius": 0, "dy": 1}}"#;
        assert!(matches!(
            WeaponsConfig::from_json(bad_cooldown),
            Err(ConfigError::InvalidValue { key, .. }) if key == "X.cooldown"
        ));

        let weapons = WeaponsConfig::from_json("{}").unwrap();
        assert!(matches!(
            weapons.params("Laser"),
            Err(ConfigError::MissingSection(_))
        ));
    }

    #[test]
    fn missing_weapons_file_is_reported() {
        let config = GameConfig {
            weapons_path: Some(PathBuf::from("/nonexistent/xoinvader/weapons.json")),
            ..GameConfig::default()
        };
        assert!(matches!(
            config.load_weapons(),
            Err(ConfigError::Read { .. })
        ));
    }
}
