/// Entry point and tick loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use domain::sprite::SpriteId;
use sim::level::build_world;
use sim::step::{step, SpriteInput};
use sim::world::World;
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const LOG_FILE: &str = "bridgeworks.log";

fn main() {
    let _guard = init_logging();
    let config = ServerConfig::load();

    let mut world = match build_world(&config) {
        Ok(world) => world,
        Err(e) => {
            error!(error = %e, "world failed to load");
            eprintln!("bridgeworks: {e}");
            std::process::exit(1);
        }
    };
    info!(maps = world.maps().len(), tick_rate_ms = config.tick_rate_ms, "world ready");

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!(error = %e, "loop aborted");
        eprintln!("bridgeworks: {e}");
    }
    info!(tick = world.tick, "shutdown");
}

/// File-only logging; the terminal belongs to the renderer.
/// `RUST_LOG` overrides the default `info` filter.
fn init_logging() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .init();

    guard
}

fn game_loop(
    world: &mut World,
    renderer: &mut Renderer,
    config: &ServerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let player = SpriteId(0);
    let mut kb = InputState::new();
    let mut pending = SpriteInput::idle(player);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);

    loop {
        kb.drain_events();
        if kb.quit_pressed() {
            break;
        }
        kb.fold_into(&mut pending, &other_map(world, player));

        if last_tick.elapsed() >= tick_rate {
            let input = std::mem::replace(&mut pending, SpriteInput::idle(player));
            let events = step(world, &[input]);
            renderer.record(world.tick, &events);
            last_tick = Instant::now();
        }

        renderer.render(world, player)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// First map the sprite is not standing on; travel target for the T key.
fn other_map(world: &World, sprite: SpriteId) -> String {
    let here = world.sprite(sprite).map(|s| s.map.as_str()).unwrap_or("");
    world.maps().iter()
        .map(|m| m.name.as_str())
        .find(|name| *name != here)
        .unwrap_or(here)
        .to_string()
}
