use tracing::debug;

use crate::core::{shared, ObjectList, Renderer, Result, Shared};
use crate::engine::{Context, State, StateBuild};
use crate::gui::{MenuItemContainer, PopUpNotificationWidget, TextWidget};
use crate::input::KeyMap;
use crate::states::InGameState;
use crate::types::{Key, Point};

/// What the pause menu entries do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Back,
    Notify,
    Prev,
    Next,
    Activate,
}

fn keymap() -> KeyMap<Input> {
    KeyMap::new()
        .with(Key::Escape, Input::Back)
        .with(Key::Char('n'), Input::Notify)
        .with(Key::Char('w'), Input::Prev)
        .with(Key::Up, Input::Prev)
        .with(Key::Char('s'), Input::Next)
        .with(Key::Down, Input::Next)
        .with(Key::Char('f'), Input::Activate)
        .with(Key::Enter, Input::Activate)
}

const NOTIFY_POS: Point = Point::new(15, 15);

/// Pause menu.
pub struct MainMenuState {
    objects: ObjectList,
    menu: Shared<MenuItemContainer<MenuAction>>,
    keys: KeyMap<Input>,
}

impl MainMenuState {
    /// Show a short-lived popup; it removes itself once expired.
    fn notify(&mut self, renderer: &mut Renderer, text: &str) {
        debug!(text, "notification");
        self.objects
            .add(renderer, shared(PopUpNotificationWidget::new(NOTIFY_POS, text)));
    }
}

impl StateBuild for MainMenuState {
    const NAME: &'static str = "MainMenuState";

    fn build(ctx: &mut Context<'_>) -> Result<Self> {
        let mut objects = ObjectList::new();
        objects.add(ctx.renderer, shared(TextWidget::new(Point::new(4, 4), "Pause")));

        let mut menu = MenuItemContainer::new(Point::new(10, 10))
            .with_template("=> ", "")
            .with_item("Continue", MenuAction::Continue)
            .with_item("Quit", MenuAction::Quit);
        menu.select(0);
        let menu = shared(menu);
        objects.add(ctx.renderer, menu.clone());

        Ok(Self {
            objects,
            menu,
            keys: keymap(),
        })
    }
}

impl State for MainMenuState {
    fn events(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let inputs = self.keys.collect(|| ctx.screen.poll_key())?;
        for input in inputs {
            match input {
                Input::Back => ctx.trigger_state(InGameState::NAME),
                Input::Notify => self.notify(ctx.renderer, "This is test notification"),
                Input::Prev => self.menu.borrow_mut().prev(),
                Input::Next => self.menu.borrow_mut().next(),
                Input::Activate => {
                    let action = self.menu.borrow().action();
                    match action {
                        Some(MenuAction::Continue) => ctx.trigger_state(InGameState::NAME),
                        Some(MenuAction::Quit) => ctx.stop(),
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
