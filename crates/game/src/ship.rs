//! The player's ship.

use std::rc::Rc;
use std::time::Duration;

use arrayvec::ArrayVec;
use tracing::debug;

use crate::config::{ConfigError, WeaponParams, WeaponsConfig};
use crate::core::{shared, GameObject, RenderData, Renderable, Renderer, Shared, Surface};
use crate::theme;
use crate::types::Point;
use crate::weapon::{Weapon, WeaponError, WeaponKind};

/// Weapon slots on one ship.
pub const MAX_WEAPONS: usize = 4;

/// Weapons a new player ship starts with, in slot order.
pub const PLAYER_WEAPONS: [WeaponKind; 3] = [WeaponKind::Blaster, WeaponKind::Laser, WeaponKind::UM];

/// Resolved weapon parameters for a fresh ship.
#[derive(Debug, Clone, PartialEq)]
pub struct Loadout {
    slots: Vec<(WeaponKind, WeaponParams)>,
}

impl Loadout {
    /// Look up every kind in `config`. Kinds beyond [`MAX_WEAPONS`] are
    /// ignored.
    pub fn new(kinds: &[WeaponKind], config: &WeaponsConfig) -> Result<Self, ConfigError> {
        let slots = kinds
            .iter()
            .take(MAX_WEAPONS)
            .map(|&kind| Ok((kind, config.params(kind.name())?.clone())))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { slots })
    }

    pub fn player(config: &WeaponsConfig) -> Result<Self, ConfigError> {
        Self::new(&PLAYER_WEAPONS, config)
    }

    pub fn kinds(&self) -> impl Iterator<Item = WeaponKind> + '_ {
        self.slots.iter().map(|(kind, _)| *kind)
    }

    /// Mount a fresh weapon of every slot on `ship`.
    pub fn arm(&self, ship: &mut PlayerShip) {
        for (kind, params) in &self.slots {
            if ship.add_weapon(shared(Weapon::new(*kind, params))).is_err() {
                debug!(weapon = %kind, "no free slot");
            }
        }
    }
}

const SPRITE: [&str; 2] = ["  A  ", "<=H=>"];

pub struct PlayerShip {
    pos: Point,
    image: Rc<Surface>,
    weapons: ArrayVec<Shared<Weapon>, MAX_WEAPONS>,
    current: usize,
    /// Horizontal extent the sprite must stay inside, inclusive.
    min_x: i32,
    max_x: i32,
    /// Rows charges may occupy, inclusive.
    top: i32,
    bottom: i32,
    shots: u64,
}

impl PlayerShip {
    /// Ship parked at the bottom centre of a `width` x `height` bordered field.
    pub fn new(width: u16, height: u16) -> Self {
        let image = Surface::styled(&SPRITE, theme::SHIP);
        let (w, h) = (image.width() as i32, image.height() as i32);
        let (width, height) = (i32::from(width), i32::from(height));
        Self {
            pos: Point::new((width - w) / 2, height - 1 - h),
            image: Rc::new(image),
            weapons: ArrayVec::new(),
            current: 0,
            min_x: 1,
            max_x: width - 2,
            top: 1,
            bottom: height - 2,
            shots: 0,
        }
    }

    /// Mount a weapon; fails when every slot is taken.
    pub fn add_weapon(&mut self, weapon: Shared<Weapon>) -> Result<(), Shared<Weapon>> {
        self.weapons
            .try_push(weapon)
            .map_err(|e| e.element())
    }

    pub fn weapons(&self) -> &[Shared<Weapon>] {
        &self.weapons
    }

    /// Register every mounted weapon's charges with `renderer`.
    pub fn register_weapons(&self, renderer: &mut Renderer) {
        for weapon in &self.weapons {
            renderer.add_object(weapon);
        }
    }

    pub fn current_weapon(&self) -> Option<&Shared<Weapon>> {
        self.weapons.get(self.current)
    }

    pub fn next_weapon(&mut self) {
        if !self.weapons.is_empty() {
            self.current = (self.current + 1) % self.weapons.len();
            debug!(slot = self.current, "weapon switched");
        }
    }

    pub fn prev_weapon(&mut self) {
        if !self.weapons.is_empty() {
            let n = self.weapons.len();
            self.current = (self.current + n - 1) % n;
            debug!(slot = self.current, "weapon switched");
        }
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn move_left(&mut self) {
        self.pos.x = (self.pos.x - 1).max(self.min_x);
    }

    pub fn move_right(&mut self) {
        let right = self.max_x - self.image.width() as i32 + 1;
        self.pos.x = (self.pos.x + 1).min(right);
    }

    /// Where charges appear: centred, one row above the sprite.
    pub fn muzzle(&self) -> Point {
        self.pos + Point::new(self.image.width() as i32 / 2, -1)
    }

    /// Fire the selected weapon.
    pub fn fire(&mut self) -> Result<(), WeaponError> {
        let muzzle = self.muzzle();
        let weapon = self.current_weapon().ok_or(WeaponError::NoWeapon)?;
        weapon.borrow_mut().make_shot(muzzle)?;
        self.shots += 1;
        Ok(())
    }

    /// Successful shots so far.
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// HUD line for the selected weapon.
    pub fn weapon_info(&self) -> String {
        self.current_weapon()
            .map(|w| w.borrow().info())
            .unwrap_or_else(|| "unarmed".to_string())
    }

    /// Cooldown progress of the selected weapon in percent, 100 when ready.
    pub fn cooldown_percent(&self) -> f32 {
        self.current_weapon()
            .map(|w| {
                let w = w.borrow();
                let full = w.cooldown().as_secs_f32();
                if full > 0.0 {
                    w.current_cooldown() / full * 100.0
                } else {
                    100.0
                }
            })
            .unwrap_or(0.0)
    }
}

impl Renderable for PlayerShip {
    fn get_render_data(&self) -> RenderData {
        RenderData::single(self.pos, Rc::clone(&self.image))
    }
}

impl GameObject for PlayerShip {
    fn update(&mut self, dt: Duration) {
        for weapon in &self.weapons {
            let mut weapon = weapon.borrow_mut();
            weapon.update(dt);
            weapon.retain_within(self.top, self.bottom);
        }
    }
}
