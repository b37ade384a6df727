//! Neon Breakout entry point
//!
//! The web build is driven by the host page through `platform::web`.
//! Natively this runs a headless autoplay session and logs what happens.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_breakout::consts::FRAME_MS;
    use neon_breakout::sim::{GameEvent, GameStatus, LevelSet, Session, TickInput};
    use neon_breakout::{QualityPreset, Settings, Tuning};

    env_logger::init();
    log::info!("Neon Breakout (native) starting...");

    // neon-breakout [--quality low|medium|high] [tuning.json] [levels.json]
    let mut quality = QualityPreset::default();
    let mut paths = Vec::new();
    let mut raw = std::env::args().skip(1);
    while let Some(arg) = raw.next() {
        if arg != "--quality" {
            paths.push(arg);
            continue;
        }
        let value = raw.next().unwrap_or_default();
        match QualityPreset::parse(&value) {
            Some(preset) => quality = preset,
            None => {
                log::error!("Unknown quality preset '{}'", value);
                std::process::exit(1);
            }
        }
    }
    log::info!("Quality: {}", quality.as_str());

    let mut args = paths.into_iter();
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let levels = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(Into::into)
            .and_then(|json| LevelSet::from_json(&json))
        {
            Ok(levels) => levels,
            Err(e) => {
                log::error!("{}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => LevelSet::builtin(),
    };

    let mut session = Session::new(0x5eed, tuning, Settings::from_preset(quality), levels);
    let mut now = 0.0;
    session.start_game(now);
    session.finish_intro();

    // Ten simulated minutes at most
    let max_frames = 60 * 60 * 10;
    let mut bricks_hit = 0usize;
    for _ in 0..max_frames {
        now += FRAME_MS;

        // Autopilot: keep the paddle under the lowest falling ball
        let target = session
            .dynamic()
            .balls
            .iter()
            .filter(|b| b.vel.y >= 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .or_else(|| session.dynamic().balls.first())
            .map(|b| b.pos.x);
        let input = TickInput {
            pointer_x: target,
            launch: true,
            fire: true,
            ..Default::default()
        };
        session.frame(now, &input);

        bricks_hit += session
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::BrickHit)
            .count();

        match session.state().status {
            GameStatus::LevelComplete => {
                session.next_level(now);
                session.finish_intro();
            }
            GameStatus::GameOver => break,
            _ => {}
        }
    }

    let state = session.state();
    log::info!(
        "Finished on level {} with score {} ({} bricks, {} lives left)",
        state.level + 1,
        state.score,
        bricks_hit,
        state.lives
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start
}
