//! XOInvader (workspace facade crate).
//!
//! Re-exports the member crates under one roof; the implementation lives in
//! dedicated crates under `crates/`.

pub use xoinvader_core as core;
pub use xoinvader_engine as engine;
pub use xoinvader_game as game;
pub use xoinvader_input as input;
pub use xoinvader_term as term;
pub use xoinvader_types as types;

use xoinvader_game::{GameConfig, VideoDriver};
use xoinvader_term::TermScreen;

/// Terminal screen for the configured video driver.
pub fn terminal_screen(config: &GameConfig) -> TermScreen {
    let (w, h) = (config.field_width, config.field_height);
    match config.video_driver {
        VideoDriver::Terminal => TermScreen::new(w, h),
        VideoDriver::Mono => TermScreen::monochrome(w, h),
    }
}
