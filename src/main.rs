use clap::Parser;
use problematic::config::GameConfig;
use problematic::consts::FIXED_DT;
use problematic::game::{GameWorld, Screen};
use problematic::input::InputIntents;
use problematic::level::{LevelCatalog, LevelId};
use problematic::progress::JsonFileStore;
use problematic::progression::{ChallengeOutcome, PendingChallenge};
use problematic::session::{Services, SessionEvent};
use std::error::Error;
use std::path::PathBuf;

#[cfg(feature = "desktop")]
mod desktop;

#[derive(Parser)]
#[command(version, about = "A tile-based platformer", long_about = None)]
struct Cli {
    /// JSON config file; missing means defaults
    #[arg(long, value_name = "PATH", default_value = "assets/config.json")]
    config: PathBuf,

    /// Directory holding level1.json, level2.json, ...
    #[arg(long, value_name = "DIR")]
    maps: Option<PathBuf>,

    /// Where progress files are written
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Start straight into this level instead of the level select
    #[arg(long, value_name = "ID")]
    level: Option<LevelId>,

    /// Run this many frames without a window, then exit
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = GameConfig::load_or_default(&cli.config)?;
    if let Some(maps) = cli.maps {
        config.paths.maps_dir = maps;
    }
    if let Some(data_dir) = cli.data_dir {
        config.paths.data_dir = Some(data_dir);
    }

    let catalog = LevelCatalog::discover(&config.paths.maps_dir)?;
    if catalog.is_empty() {
        return Err(format!("no levels found in {}", config.paths.maps_dir.display()).into());
    }

    let store = JsonFileStore::open(config.paths.resolved_data_dir())?;
    log::info!("Progress directory: {}", store.directory().display());

    let services = Services::new(config, Box::new(store), Box::new(PendingChallenge::new()));
    let mut world = GameWorld::new(catalog, services);

    match cli.headless {
        Some(frames) => run_headless(&mut world, cli.level, frames),
        None => run_window(&mut world, cli.level),
    }
}

/// Fixed-step run with no input; every death fails the challenge.
fn run_headless(
    world: &mut GameWorld,
    level: Option<LevelId>,
    frames: u32,
) -> Result<(), Box<dyn Error>> {
    let id = world.start(level)?;
    log::info!("Headless run of level {} for {} frames", id, frames);

    for frame in 0..frames {
        match world.frame(FIXED_DT, InputIntents::IDLE) {
            SessionEvent::Died => {
                log::info!("Died on frame {}", frame);
                world.resolve_challenge(ChallengeOutcome::Failed)?;
            }
            SessionEvent::LevelComplete { next } => log::info!("Frame {}: on to level {}", frame, next),
            SessionEvent::GameFinished => {
                log::info!("Frame {}: all levels complete", frame);
                break;
            }
            SessionEvent::None => {}
        }
    }

    if let (Screen::Playing(id), Some(session)) = (world.screen(), world.session()) {
        let player = session.player();
        log::info!(
            "Level {}: player at ({:.2}, {:.2}), {:?}, {} deaths",
            id,
            player.position.x,
            player.position.y,
            player.state(),
            world.progression().deaths()
        );
    }
    Ok(())
}

#[cfg(feature = "desktop")]
fn run_window(world: &mut GameWorld, level: Option<LevelId>) -> Result<(), Box<dyn Error>> {
    if let Some(id) = level {
        world.start(Some(id))?;
    }
    desktop::run(world)?;
    Ok(())
}

#[cfg(not(feature = "desktop"))]
fn run_window(_world: &mut GameWorld, _level: Option<LevelId>) -> Result<(), Box<dyn Error>> {
    Err("built without a window; rebuild with `--features desktop` or pass --headless <FRAMES>".into())
}
