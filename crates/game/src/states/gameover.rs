use tracing::{debug, warn};

use crate::core::{shared, ObjectList, Result, Shared};
use crate::engine::{Context, State, StateArgs, StateBuild};
use crate::gui::{MenuItemContainer, TextWidget};
use crate::input::KeyMap;
use crate::states::InGameState;
use crate::theme;
use crate::types::{Key, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Agree,
    Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Quit,
    Restart,
    Prev,
    Next,
    Activate,
}

fn keymap() -> KeyMap<Input> {
    KeyMap::new()
        .with(Key::Escape, Input::Quit)
        .with(Key::Char('r'), Input::Restart)
        .with(Key::Char('w'), Input::Prev)
        .with(Key::Up, Input::Prev)
        .with(Key::Char('s'), Input::Next)
        .with(Key::Down, Input::Next)
        .with(Key::Char('f'), Input::Activate)
        .with(Key::Enter, Input::Activate)
}

fn score_text(score: u64) -> String {
    format!("Your score: {score}")
}

/// Shown when a game ends. Expects the final score (`u64`) as trigger payload.
pub struct GameOverState {
    objects: ObjectList,
    score: Shared<TextWidget>,
    menu: Shared<MenuItemContainer<Choice>>,
    keys: KeyMap<Input>,
}

impl StateBuild for GameOverState {
    const NAME: &'static str = "GameOverState";

    fn build(ctx: &mut Context<'_>) -> Result<Self> {
        let mut objects = ObjectList::new();
        let title = TextWidget::new(Point::new(4, 4), "Your soul completely lost this time")
            .with_style(theme::gui("red"));
        objects.add(ctx.renderer, shared(title));

        let score = shared(TextWidget::new(Point::new(4, 5), score_text(0)));
        objects.add(ctx.renderer, score.clone());

        let mut menu = MenuItemContainer::new(Point::new(10, 10))
            .with_item("I agree", Choice::Agree)
            .with_item("No, I want more", Choice::Retry);
        menu.select(0);
        let menu = shared(menu);
        objects.add(ctx.renderer, menu.clone());

        Ok(Self {
            objects,
            score,
            menu,
            keys: keymap(),
        })
    }
}

impl State for GameOverState {
    fn trigger(&mut self, _ctx: &mut Context<'_>, args: Option<StateArgs>) -> Result<()> {
        match args.map(|a| a.downcast::<u64>()) {
            Some(Ok(score)) => {
                debug!(score = *score, "game over");
                self.score.borrow_mut().set_text(score_text(*score));
            }
            Some(Err(_)) => warn!("game over triggered with a non-score payload"),
            None => {}
        }
        Ok(())
    }

    fn events(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let inputs = self.keys.collect(|| ctx.screen.poll_key())?;
        for input in inputs {
            match input {
                Input::Quit => ctx.stop(),
                Input::Restart => ctx.trigger_reinit(InGameState::NAME),
                Input::Prev => self.menu.borrow_mut().prev(),
                Input::Next => self.menu.borrow_mut().next(),
                Input::Activate => {
                    let choice = self.menu.borrow().action();
                    match choice {
                        Some(Choice::Agree) => ctx.stop(),
                        Some(Choice::Retry) => ctx.trigger_reinit(InGameState::NAME),
                        None => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.objects.update_all(ctx.renderer, ctx.dt())
    }
}
