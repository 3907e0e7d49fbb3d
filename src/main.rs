//! Air Raid headless driver
//!
//! Runs one session with the null renderer and silent audio, pumping frames
//! from a manual scheduler until the run ends, then prints the outcome.
//!
//! Usage: `air-raid [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use air_raid::audio::{AudioManager, SilentAudio};
    use air_raid::consts::FRAME_MS;
    use air_raid::render::NullRenderer;
    use air_raid::sim::{Game, GameEvent, ManualScheduler, Session, TickInput};
    use air_raid::{Settings, Tuning};

    /// Stop runaway sessions after ten simulated minutes
    const MAX_FRAMES: u64 = 10 * 60 * 1000 / FRAME_MS;

    env_logger::init();
    log::info!("Air Raid (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);

    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match Tuning::from_json(&json) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("Invalid tuning in {}: {}", path, e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                log::error!("Cannot read {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let session = Session::new(seed, tuning);
    let audio = AudioManager::new(SilentAudio, Settings::default());
    let mut game = Game::new(session, ManualScheduler::new(), NullRenderer, audio);
    log::info!("Game initialized with seed: {}", seed);

    game.restart(0);

    let mut now = 0;
    let mut kills = 0u32;
    // Sweep the ship across the field so it meets more enemies
    let field_width = game.session.tuning.field.width;
    while game.scheduler_mut().take_request() && game.session.frame < MAX_FRAMES {
        now += FRAME_MS;
        let phase = (now as f32 / 4000.0).sin() * 0.5 + 0.5;
        let input = TickInput {
            pointer_x: Some(phase * field_width),
        };

        for event in game.on_frame(now, &input) {
            match event {
                GameEvent::EnemyDestroyed { .. } => kills += 1,
                GameEvent::PlayerHit { lives } => log::info!("Player hit, {} lives left", lives),
                GameEvent::ComboBonus { combo, bonus } => {
                    log::info!("Combo x{}: +{}", combo, bonus)
                }
                GameEvent::EnemyEscaped { id } => log::info!("Enemy {:?} escaped", id),
                _ => {}
            }
        }
    }

    let session = &game.session;
    println!(
        "seed {}: {} frames, score {}, {} kills, game over: {}",
        seed, session.frame, session.score, kills, session.is_game_over
    );
    log::info!("Pool usage: {:?}", session.pool_stats());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `air_raid::sim::Game` directly
}
