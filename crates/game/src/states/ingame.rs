use std::rc::Rc;

use tracing::debug;

use crate::core::{shared, ObjectList, Result, Shared};
use crate::engine::{Context, State, StateBuild};
use crate::gui::{Bar, TextWidget, WeaponWidget};
use crate::input::KeyMap;
use crate::ship::{Loadout, PlayerShip};
use crate::states::{GameOverState, MainMenuState};
use crate::theme;
use crate::types::{Key, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Left,
    Right,
    Fire,
    NextWeapon,
    PrevWeapon,
    Menu,
    GameOver,
}

fn keymap() -> KeyMap<Action> {
    KeyMap::new()
        .with(Key::Char('a'), Action::Left)
        .with(Key::Left, Action::Left)
        .with(Key::Char('d'), Action::Right)
        .with(Key::Right, Action::Right)
        .with(Key::Space, Action::Fire)
        .with(Key::Char('e'), Action::NextWeapon)
        .with(Key::Char('q'), Action::PrevWeapon)
        .with(Key::Escape, Action::Menu)
        .with(Key::Char('g'), Action::GameOver)
}

fn score_text(score: u64) -> String {
    format!("Score: {score} ")
}

/// The playing field: ship, score header and weapon HUD.
pub struct InGameState {
    objects: ObjectList,
    ship: Shared<PlayerShip>,
    score: Shared<TextWidget>,
    keys: KeyMap<Action>,
}

impl InGameState {
    /// One point per charge fired.
    pub fn score(&self) -> u64 {
        self.ship.borrow().shots()
    }
}

impl StateBuild for InGameState {
    const NAME: &'static str = "InGameState";

    fn build(ctx: &mut Context<'_>) -> Result<Self> {
        let loadout = ctx.resource::<Loadout>()?;
        let (width, height) = ctx.screen.size();
        let (w, h) = (i32::from(width), i32::from(height));

        let mut ship = PlayerShip::new(width, height);
        loadout.arm(&mut ship);
        let ship = shared(ship);

        let mut objects = ObjectList::new();
        let title = TextWidget::new(Point::new(w / 2 - 4, 0), "XOinvader").with_style(theme::TITLE);
        objects.add(ctx.renderer, shared(title));
        let score = shared(TextWidget::new(Point::new(2, 0), score_text(0)));
        objects.add(ctx.renderer, Rc::clone(&score));
        objects.add(ctx.renderer, Rc::clone(&ship));

        let source = Rc::clone(&ship);
        let info = WeaponWidget::new(Point::new(2, h - 1), move || source.borrow().weapon_info());
        objects.add(ctx.renderer, shared(info));

        let source = Rc::clone(&ship);
        let cooldown = Bar::new(Point::new(w - 17, h - 1))
            .with_prefix("CD ")
            .with_marker('█', Some(theme::GREEN))
            .with_general_style(theme::NORMAL)
            .with_stylemap(vec![(30.0, theme::RED), (99.0, theme::YELLOW)])
            .with_callback(move || source.borrow().cooldown_percent());
        objects.add(ctx.renderer, shared(cooldown));

        Ok(Self {
            objects,
            ship,
            score,
            keys: keymap(),
        })
    }
}

impl State for InGameState {
    /// Charges paint above the ship and HUD.
    fn postinit(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.ship.borrow().register_weapons(ctx.renderer);
        Ok(())
    }

    fn events(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let actions = self.keys.collect(|| ctx.screen.poll_key())?;
        for action in actions {
            match action {
                Action::Left => self.ship.borrow_mut().move_left(),
                Action::Right => self.ship.borrow_mut().move_right(),
                Action::Fire => {
                    if let Err(e) = self.ship.borrow_mut().fire() {
                        debug!(reason = %e, "shot declined");
                    }
                }
                Action::NextWeapon => self.ship.borrow_mut().next_weapon(),
                Action::PrevWeapon => self.ship.borrow_mut().prev_weapon(),
                Action::Menu => ctx.trigger_state(MainMenuState::NAME),
                Action::GameOver => {
                    ctx.trigger_state_with(GameOverState::NAME, Box::new(self.score()))
                }
            }
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.objects.update_all(ctx.renderer, ctx.dt())?;
        let score = self.score();
        self.score.borrow_mut().set_text(score_text(score));
        Ok(())
    }
}
