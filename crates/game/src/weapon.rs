//! Player and enemy weapons.
//!
//! A weapon owns the charges it has fired: each charge is one anchor of the
//! weapon's render data, so a single registration paints them all.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use thiserror::Error;
use tracing::trace;

use crate::config::{Ammo, ConfigError, WeaponParams, WeaponsConfig};
use crate::core::{GameObject, RenderData, Renderable, Surface};
use crate::theme;
use crate::types::Point;

/// Why a shot was declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WeaponError {
    #[error("no ammo left")]
    OutOfAmmo,

    #[error("weapon is cooling down ({remaining:?} left)")]
    NotReady { remaining: Duration },

    #[error("no weapon mounted")]
    NoWeapon,
}

/// One-shot countdown advanced by the tick length.
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    duration: Duration,
    elapsed: Duration,
    running: bool,
}

impl Timer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    /// (Re)start from zero.
    pub fn start(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    /// Advance by `dt`. Returns true on the update that finishes the timer.
    pub fn update(&mut self, dt: Duration) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.running = false;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    Blaster,
    EBlaster,
    Laser,
    UM,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [Self::Blaster, Self::EBlaster, Self::Laser, Self::UM];

    /// Config section and HUD name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Blaster => "Blaster",
            Self::EBlaster => "EBlaster",
            Self::Laser => "Laser",
            Self::UM => "UM",
        }
    }

    /// Sprite of a single charge.
    pub fn image(self) -> Surface {
        match self {
            Self::Blaster => Surface::styled(&["^"], theme::CHARGE),
            Self::EBlaster => Surface::from_rows(&[":"]),
            Self::Laser => Surface::styled(&["|"], theme::CHARGE),
            Self::UM => Surface::styled(&["^", "|", "*"], theme::gui("red")),
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Weapon {
    kind: WeaponKind,
    image: Rc<Surface>,
    ammo: Ammo,
    max_ammo: Ammo,
    cooldown: Duration,
    damage: u32,
    radius: u32,
    dy: i32,
    ready: bool,
    timer: Timer,
    coords: Vec<Point>,
}

impl Weapon {
    pub fn new(kind: WeaponKind, params: &WeaponParams) -> Self {
        let cooldown = Duration::try_from_secs_f32(params.cooldown).unwrap_or_default();
        Self {
            kind,
            image: Rc::new(kind.image()),
            ammo: params.ammo,
            max_ammo: params.max_ammo,
            cooldown,
            damage: params.damage,
            radius: params.radius,
            dy: params.dy,
            ready: true,
            timer: Timer::new(cooldown),
            coords: Vec::new(),
        }
    }

    /// Build `kind` from its section in `config`.
    pub fn from_config(kind: WeaponKind, config: &WeaponsConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(kind, config.params(kind.name())?))
    }

    /// Fire a charge at `pos`.
    ///
    /// Declined shots change nothing. A successful shot spends one round
    /// (unless ammo is infinite) and starts the cooldown.
    pub fn make_shot(&mut self, pos: Point) -> Result<(), WeaponError> {
        if self.ammo == Ammo::Finite(0) {
            return Err(WeaponError::OutOfAmmo);
        }
        if !self.ready {
            return Err(WeaponError::NotReady {
                remaining: self.timer.remaining(),
            });
        }

        if let Ammo::Finite(n) = &mut self.ammo {
            *n -= 1;
        }
        self.coords.push(pos);
        trace!(weapon = %self.kind, x = pos.x, y = pos.y, ammo = %self.ammo, "shot");

        if !self.cooldown.is_zero() {
            self.ready = false;
            self.timer.start();
        }
        Ok(())
    }

    /// Drop the charge at `pos`. Returns false when there is none.
    pub fn remove_obsolete(&mut self, pos: Point) -> bool {
        match self.coords.iter().position(|&c| c == pos) {
            Some(idx) => {
                self.coords.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Drop charges whose sprite no longer fits rows `top..=bottom`.
    ///
    /// Returns how many were dropped.
    pub fn retain_within(&mut self, top: i32, bottom: i32) -> usize {
        let height = self.image.height() as i32;
        let before = self.coords.len();
        self.coords
            .retain(|c| c.y >= top && c.y + height - 1 <= bottom);
        before - self.coords.len()
    }

    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Rounds left; 999 when infinite.
    pub fn ammo(&self) -> u32 {
        self.ammo.display()
    }

    pub fn max_ammo(&self) -> u32 {
        self.max_ammo.display()
    }

    pub fn raw_ammo(&self) -> Ammo {
        self.ammo
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Seconds since the last shot while cooling down, the full cooldown
    /// once ready.
    pub fn current_cooldown(&self) -> f32 {
        if self.ready {
            self.cooldown.as_secs_f32()
        } else {
            self.timer.elapsed().as_secs_f32()
        }
    }

    pub fn ready(&self) -> bool {
        self.ready
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn dy(&self) -> i32 {
        self.dy
    }

    /// Positions of the charges in flight, oldest first.
    pub fn coords(&self) -> &[Point] {
        &self.coords
    }

    /// One-line HUD summary.
    pub fn info(&self) -> String {
        format!(
            "{} {}/{} [{:.1}]",
            self.kind,
            self.ammo(),
            self.max_ammo(),
            self.current_cooldown()
        )
    }
}

impl Renderable for Weapon {
    fn get_render_data(&self) -> RenderData {
        RenderData {
            anchors: self.coords.clone(),
            image: Rc::clone(&self.image),
        }
    }
}

impl GameObject for Weapon {
    /// Move every charge `dy` rows up and advance the cooldown.
    fn update(&mut self, dt: Duration) {
        let step = Point::new(0, -self.dy);
        for c in &mut self.coords {
            *c += step;
        }
        if self.timer.update(dt) {
            self.ready = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: Duration = Duration::from_millis(30);

    fn params(ammo: Ammo, cooldown: f32, dy: i32) -> WeaponParams {
        WeaponParams {
            ammo,
            max_ammo: ammo,
            cooldown,
            damage: 1,
            radius: 0,
            dy,
        }
    }

    #[test]
    fn empty_weapon_declines_without_side_effects() {
        let mut w = Weapon::new(WeaponKind::Laser, &params(Ammo::Finite(0), 0.0, 1));
        assert_eq!(w.make_shot(Point::new(5, 5)), Err(WeaponError::OutOfAmmo));
        assert_eq!(w.ammo(), 0);
        assert!(w.coords().is_empty());
        assert!(w.ready());
    }

    #[test]
    fn last_round_fires_then_runs_dry() {
        let mut w = Weapon::new(WeaponKind::UM, &params(Ammo::Finite(1), 0.0, 1));
        w.make_shot(Point::new(1, 9)).unwrap();
        assert_eq!(w.ammo(), 0);
        assert_eq!(w.make_shot(Point::new(1, 9)), Err(WeaponError::OutOfAmmo));
        assert_eq!(w.coords().len(), 1);
    }

    #[test]
    fn infinite_ammo_never_decrements() {
        let mut w = Weapon::new(WeaponKind::Blaster, &params(Ammo::Infinite, 0.0, 1));
        for i in 0..50 {
            w.make_shot(Point::new(i, 20)).unwrap();
        }
        assert_eq!(w.ammo(), 999);
        assert_eq!(w.raw_ammo(), Ammo::Infinite);
        assert_eq!(w.coords().len(), 50);
    }

    #[test]
    fn charges_climb_dy_per_update() {
        let mut w = Weapon::new(WeaponKind::Laser, &params(Ammo::Infinite, 0.0, 2));
        w.make_shot(Point::new(3, 20)).unwrap();
        for _ in 0..4 {
            w.update(DT);
        }
        assert_eq!(w.coords(), &[Point::new(3, 12)]);
    }

    #[test]
    fn cooldown_blocks_until_timer_fires() {
        let mut w = Weapon::new(WeaponKind::Blaster, &params(Ammo::Infinite, 0.08, 1));
        w.make_shot(Point::new(0, 10)).unwrap();
        assert!(!w.ready());
        assert!(matches!(
            w.make_shot(Point::new(0, 10)),
            Err(WeaponError::NotReady { .. })
        ));
        assert_eq!(w.coords().len(), 1);

        w.update(DT);
        w.update(DT);
        assert!(!w.ready());
        assert!(w.current_cooldown() > 0.0 && w.current_cooldown() < 0.08);

        w.update(DT);
        assert!(w.ready());
        assert!((w.current_cooldown() - 0.08).abs() < 1e-6);
        w.make_shot(Point::new(0, 10)).unwrap();
    }

    #[test]
    fn remove_and_prune_charges() {
        let mut w = Weapon::new(WeaponKind::UM, &params(Ammo::Infinite, 0.0, 1));
        for y in [1, 5, 21, 22] {
            w.make_shot(Point::new(0, y)).unwrap();
        }
        assert!(w.remove_obsolete(Point::new(0, 5)));
        assert!(!w.remove_obsolete(Point::new(0, 5)));

        // three rows tall: y=22 would spill past row 23
        assert_eq!(w.retain_within(1, 23), 1);
        assert_eq!(w.coords(), &[Point::new(0, 1), Point::new(0, 21)]);

        w.update(DT);
        assert_eq!(w.retain_within(1, 23), 1);
        assert_eq!(w.coords(), &[Point::new(0, 20)]);
    }

    #[test]
    fn render_data_has_one_anchor_per_charge() {
        let mut w = Weapon::new(WeaponKind::UM, &params(Ammo::Infinite, 0.0, 1));
        w.make_shot(Point::new(2, 10)).unwrap();
        w.make_shot(Point::new(6, 10)).unwrap();
        let data = w.get_render_data();
        assert_eq!(data.anchors.len(), 2);
        assert_eq!(data.cell_count(), 6);
    }

    #[test]
    fn builds_from_builtin_config() {
        let config = WeaponsConfig::from_json(crate::config::DEFAULT_WEAPONS_JSON).unwrap();
        for kind in WeaponKind::ALL {
            let w = Weapon::from_config(kind, &config).unwrap();
            assert_eq!(w.kind(), kind);
        }
        let laser = Weapon::from_config(WeaponKind::Laser, &config).unwrap();
        assert_eq!(laser.info(), "Laser 50/50 [0.1]");
    }
}
