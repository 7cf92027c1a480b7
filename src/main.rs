//! XOInvader terminal runner (default binary).
//!
//! Logs go to a file because stdout is the game screen.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use xoinvader::core::Error;
use xoinvader::game::{create_game, GameConfig, VideoDriver};
use xoinvader::terminal_screen;

/// Terminal space shooter
#[derive(Parser, Debug)]
#[command(name = "xoinvader")]
#[command(version)]
struct Args {
    /// Disable sounds
    #[arg(long)]
    no_sound: bool,

    /// Attributes only, no colors (overrides XOINVADER_VIDEO_DRIVER)
    #[arg(short, long)]
    mono: bool,

    /// Weapon table in JSON (overrides XOINVADER_WEAPONS)
    #[arg(long)]
    weapons: Option<PathBuf>,

    /// Desired frames per second (overrides XOINVADER_FPS)
    #[arg(long)]
    fps: Option<u32>,

    /// Where to write logs
    #[arg(long, default_value = "xoinvader.log")]
    log_file: PathBuf,

    /// Log level used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn apply(&self, config: &mut GameConfig) {
        if self.no_sound {
            config.sound = false;
        }
        if self.mono {
            config.video_driver = VideoDriver::Mono;
        }
        if let Some(path) = &self.weapons {
            config.weapons_path = Some(path.clone());
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let file = File::create(&args.log_file)
        .with_context(|| format!("create log file {}", args.log_file.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(filter)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut config = GameConfig::from_env()?;
    args.apply(&mut config);
    info!(?config, "starting");

    let mut app = create_game(terminal_screen(&config), &config)?;
    app.screen_mut().enter()?;

    let result = app.start();

    // Always try to restore terminal state.
    let _ = app.screen_mut().exit();

    match result {
        Err(Error::Io(e)) if e.kind() == io::ErrorKind::Interrupted => {
            info!("interrupted");
            Ok(())
        }
        other => other.context("game loop failed"),
    }
}
