//! Game states: playing, the pause menu, and the game-over screen.

mod gameover;
mod ingame;
mod menu;

pub use gameover::GameOverState;
pub use ingame::InGameState;
pub use menu::{MainMenuState, MenuAction};

#[cfg(test)]
mod tests {
    use xoinvader_term::HeadlessScreen;

    use super::*;
    use crate::config::GameConfig;
    use crate::create_game;
    use crate::engine::{Application, StateBuild};
    use crate::types::Key;

    fn game() -> Application<HeadlessScreen> {
        match create_game(HeadlessScreen::new(80, 24), &GameConfig::default()) {
            Ok(app) => app,
            Err(e) => panic!("create_game failed: {e}"),
        }
    }

    fn press(app: &mut Application<HeadlessScreen>, key: Key) {
        app.screen_mut().push_key(key);
        app.tick().unwrap();
    }

    #[test]
    fn registers_in_order_with_ingame_active() {
        let app = game();
        let names: Vec<_> = app.states().collect();
        assert_eq!(
            names,
            [InGameState::NAME, MainMenuState::NAME, GameOverState::NAME]
        );
        assert_eq!(app.state_name().unwrap(), InGameState::NAME);
    }

    #[test]
    fn ingame_draws_header_ship_and_hud() {
        let mut app = game();
        app.tick().unwrap();
        let frame = app.screen().frame();
        assert!(frame.row_text(0).contains("Score: 0"));
        assert!(frame.row_text(0).contains("XOinvader"));
        assert!(frame.row_text(22).contains("<=H=>"));
        assert!(frame.row_text(23).contains("Blaster 999/999"));
        assert!(frame.row_text(23).contains("CD ["));
    }

    #[test]
    fn firing_launches_a_charge_and_scores() {
        let mut app = game();
        press(&mut app, Key::Space);
        // muzzle is (39, 20); the charge climbs one row in the same tick
        assert_eq!(app.screen().frame().get(39, 19).map(|c| c.ch), Some('^'));
        assert!(app.screen().contains_text("Score: 1"));

        // still cooling down: a second shot is declined
        press(&mut app, Key::Space);
        assert!(app.screen().contains_text("Score: 1"));
    }

    #[test]
    fn weapon_cycling_updates_the_hud() {
        let mut app = game();
        press(&mut app, Key::Char('e'));
        assert!(app.screen().frame().row_text(23).contains("Laser 50/50"));
        press(&mut app, Key::Char('q'));
        press(&mut app, Key::Char('q'));
        assert!(app.screen().frame().row_text(23).contains("UM 10/10"));
    }

    #[test]
    fn pause_menu_round_trip() {
        let mut app = game();
        press(&mut app, Key::Escape);
        assert_eq!(app.state_name().unwrap(), MainMenuState::NAME);
        assert!(app.screen().contains_text("Pause"));
        assert!(app.screen().contains_text("=> Continue"));
        assert!(!app.screen().contains_text("<=H=>"));

        press(&mut app, Key::Enter);
        assert_eq!(app.state_name().unwrap(), InGameState::NAME);
        assert!(app.screen().contains_text("<=H=>"));
    }

    #[test]
    fn menu_quit_stops_the_loop() {
        let mut app = game();
        press(&mut app, Key::Escape);
        press(&mut app, Key::Char('s'));
        assert!(app.screen().contains_text("=> Quit"));
        app.screen_mut().push_key(Key::Char('f'));
        app.start().unwrap();
        assert_eq!(app.state_name().unwrap(), MainMenuState::NAME);
    }

    #[test]
    fn popup_notification_expires() {
        let mut app = game();
        press(&mut app, Key::Escape);
        press(&mut app, Key::Char('n'));
        assert!(app.screen().contains_text("This is test notification"));

        for _ in 0..60 {
            app.tick().unwrap();
        }
        assert!(!app.screen().contains_text("This is test notification"));
        assert!(app.screen().contains_text("Pause"));
    }

    #[test]
    fn game_over_shows_score_and_restart_resets() {
        let mut app = game();
        press(&mut app, Key::Space);
        press(&mut app, Key::Char('g'));
        assert_eq!(app.state_name().unwrap(), GameOverState::NAME);
        assert!(app.screen().contains_text("Your score: 1"));
        assert!(app.screen().contains_text("* I agree *"));

        press(&mut app, Key::Char('r'));
        assert_eq!(app.state_name().unwrap(), InGameState::NAME);
        assert!(app.screen().contains_text("Score: 0"));
    }

    #[test]
    fn game_over_escape_stops() {
        let mut app = game();
        press(&mut app, Key::Char('g'));
        app.screen_mut().push_key(Key::Escape);
        let before = app.ticks();
        app.start().unwrap();
        assert_eq!(app.ticks(), before + 1);
    }
}
