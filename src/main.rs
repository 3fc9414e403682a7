//! Absorb Arena headless runner
//!
//! Runs the simulation against the recording renderer with an orbiting
//! steering target and logs a summary. Useful for profiling and for
//! checking a settings file.

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Parser)]
#[command(name = "absorb-arena", about = "Run the arena simulation headless")]
struct Args {
    /// Settings JSON file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Override the settings seed
    #[arg(short, long)]
    seed: Option<u64>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use absorb_arena::platform::{Clock, FixedStepClock, OrbitTarget, RecordingRenderer};
    use absorb_arena::sim::{TeamId, World};
    use absorb_arena::Settings;

    env_logger::init();
    let args = Args::parse();
    log::info!("Absorb Arena (headless) starting...");

    let mut settings = match &args.config {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    let bounds = settings.bounds();
    let mut world = World::new(
        settings,
        bounds,
        RecordingRenderer::new(),
        OrbitTarget::new(0.6, 0.02),
        FixedStepClock::default(),
    );

    for _ in 0..args.frames {
        world.clock_mut().advance();
        world.tick();
    }

    log::info!(
        "Simulated {} frames ({:.2}s)",
        world.frame(),
        world.clock().now()
    );
    log::info!(
        "Population: {} food, {} players, {} active effects",
        world.count_team(TeamId::CONSUMABLE),
        world.count_team(TeamId::PLAYER),
        world.effects().len()
    );
    for entity in world.entities().iter().filter(|e| e.is_movable()) {
        log::info!(
            "Player {}: size {:.4} at ({:.3}, {:.3})",
            entity.id.0,
            entity.size.value,
            entity.position.value.x,
            entity.position.value.y
        );
    }
    let renderer = world.renderer();
    log::info!(
        "Visuals: {} live, {} created, {} destroyed",
        renderer.live_count(),
        renderer.created,
        renderer.destroyed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library; there is no wasm entry point
}
