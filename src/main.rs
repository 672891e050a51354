//! Brickfall entry point
//!
//! Natively this runs a headless autopilot game and prints a summary. The
//! browser build is driven from JavaScript through `brickfall::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::collections::BTreeMap;

    use brickfall::Settings;
    use brickfall::settings::QualityPreset;
    use brickfall::consts::FRAME_MS;
    use brickfall::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Brickfall (native) starting...");

    let mut settings = Settings::load();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });
    let max_frames = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(60 * 60 * 10);
    if let Some(arg) = args.next() {
        match QualityPreset::parse(&arg) {
            Some(preset) => settings.quality = preset,
            None => log::warn!(
                "Unknown quality preset {arg:?}, keeping {}",
                settings.quality.as_str()
            ),
        }
    }
    log::info!(
        "Quality {} ({} particles max)",
        settings.quality.as_str(),
        settings.max_particles()
    );

    let mut state = GameState::new(seed);
    state.particle_cap = settings.max_particles();
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut tally: BTreeMap<&'static str, u32> = BTreeMap::new();
    while state.frame < max_frames && state.phase != GamePhase::GameOver {
        tick(&mut state, &input, FRAME_MS);
        for event in &state.events {
            let name = match event {
                GameEvent::BrickDestroyed { splash: false, .. } => "bricks hit",
                GameEvent::BrickDestroyed { splash: true, .. } => "bricks splashed",
                GameEvent::PowerupSpawned { .. } => "power-ups dropped",
                GameEvent::PowerupCollected { .. } => "power-ups collected",
                GameEvent::BricksDescended { .. } => "descents",
                GameEvent::LifeLost { .. } => "lives lost",
                GameEvent::LevelComplete { .. } => "levels cleared",
                _ => continue,
            };
            *tally.entry(name).or_default() += 1;
        }
    }

    println!("Brickfall autopilot run (seed {seed})");
    println!(
        "  frames: {}  ({:.1} s simulated)",
        state.frame,
        state.clock_ms / 1000.0
    );
    println!(
        "  phase: {:?}  level: {}  lives: {}  score: {}",
        state.phase, state.level, state.lives, state.score
    );
    for (name, count) in &tally {
        println!("  {name}: {count}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is brickfall::web::init, this is just to satisfy the compiler
}
