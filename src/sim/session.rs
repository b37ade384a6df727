//! One game session
//!
//! Owns everything a running game needs: the state machine, the per-frame
//! entities, a seeded RNG and id counter (scoped to the session, so parallel
//! sessions never collide), tuning, settings and the frame clock.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::level::LevelSet;
use super::machine::{Action, Defaults, StateMachine};
use super::state::{
    Ball, Brick, DynamicState, EntityIds, GameEvent, GameState, GameStatus, Laser, Paddle,
    Particle, ParticleColor, PowerUp,
};
use super::tick::{TickInput, tick};
use crate::platform::FrameClock;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Seeded randomness and id allocation for spawned entities
#[derive(Debug, Clone)]
pub struct Spawner {
    pub rng: Pcg32,
    pub ids: EntityIds,
    /// Live particle limit
    pub particle_cap: usize,
    /// Max per-axis particle speed
    pub particle_spread: f32,
}

impl Spawner {
    pub fn new(seed: u64, particle_cap: usize, particle_spread: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            ids: EntityIds::new(),
            particle_cap,
            particle_spread,
        }
    }

    /// Emit up to `count` particles at `pos`, respecting the cap
    pub fn burst(
        &mut self,
        particles: &mut Vec<Particle>,
        pos: Vec2,
        color: ParticleColor,
        count: usize,
        now: f64,
    ) {
        let room = self.particle_cap.saturating_sub(particles.len());
        for _ in 0..count.min(room) {
            let vel = Vec2::new(self.scatter(), self.scatter());
            particles.push(Particle {
                id: self.ids.next_id(),
                pos,
                vel,
                radius: self.rng.random::<f32>() * 3.0 + 1.0,
                opacity: 1.0,
                created_at: now,
                color,
            });
        }
    }

    fn scatter(&mut self) -> f32 {
        let dir = self.rng.random::<f32>() - 0.5;
        let mag = self.rng.random::<f32>() * self.particle_spread;
        dir * mag
    }
}

/// Read-only view handed to the renderer each frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub particles: Vec<Particle>,
    pub power_ups: Vec<PowerUp>,
    pub lasers: Vec<Laser>,
    pub bricks: Vec<Brick>,
    pub score: u64,
    /// 1-based level number for display
    pub level: u32,
    pub lives: u8,
    pub status: GameStatus,
    pub power_ball_active: bool,
    /// Board translation for screen shake (pixels)
    pub shake_offset: Vec2,
}

/// A single game from title screen to game over
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) machine: StateMachine,
    pub(crate) dynamic: DynamicState,
    pub(crate) spawner: Spawner,
    pub(crate) tuning: Tuning,
    pub(crate) settings: Settings,
    pub(crate) clock: FrameClock,
    /// Remaining shake frames (also the jitter magnitude)
    pub(crate) shake: u32,
    pub(crate) shake_offset: Vec2,
    /// Timestamp of the last laser volley (ms)
    pub(crate) last_laser_at: Option<f64>,
    pub(crate) events: Vec<GameEvent>,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning, settings: Settings, levels: LevelSet) -> Self {
        let defaults = Defaults {
            lives: tuning.initial_lives,
            paddle_width: tuning.paddle_width,
        };
        let mut spawner = Spawner::new(
            seed,
            settings.max_particles(),
            tuning.particle_max_speed,
        );
        let dynamic = DynamicState::fresh(
            &mut spawner.ids,
            tuning.paddle_width,
            false,
            tuning.ball_speed,
            &mut spawner.rng,
            Vec::new(),
        );
        Self {
            machine: StateMachine::new(levels, defaults),
            dynamic,
            spawner,
            clock: FrameClock::new(tuning.max_frame_ms),
            tuning,
            settings,
            shake: 0,
            shake_offset: Vec2::ZERO,
            last_laser_at: None,
            events: Vec::new(),
        }
    }

    /// Session with default tuning, settings and the built-in levels
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, Tuning::default(), Settings::default(), LevelSet::builtin())
    }

    pub fn state(&self) -> &GameState {
        self.machine.state()
    }

    pub fn dynamic(&self) -> &DynamicState {
        &self.dynamic
    }

    /// Mutable per-frame entities (scripting and tests)
    pub fn dynamic_mut(&mut self) -> &mut DynamicState {
        &mut self.dynamic
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.spawner.particle_cap = settings.max_particles();
        self.settings = settings;
    }

    pub fn levels(&self) -> &LevelSet {
        self.machine.levels()
    }

    /// Apply a state-machine action, queueing any audio cue it raises
    pub fn dispatch(&mut self, action: Action) {
        if let Some(event) = self.machine.dispatch(action) {
            self.events.push(event);
        }
    }

    /// New game from level 0 (also used to restart after game over)
    pub fn start_game(&mut self, now: f64) {
        self.dispatch(Action::Start);
        self.reset_dynamic(false, false);
        self.events.push(GameEvent::GameStart);
        self.clock.resume(now);
        log::info!("Game started");
    }

    /// Continue from a completed level. Returns false if no level is complete.
    pub fn next_level(&mut self, now: f64) -> bool {
        if self.state().status != GameStatus::LevelComplete {
            return false;
        }
        self.reset_dynamic(true, false);
        self.dispatch(Action::AdvanceLevel);
        self.clock.resume(now);
        log::info!("Advancing to level {}", self.state().level + 1);
        true
    }

    /// Level intro finished: begin play
    pub fn finish_intro(&mut self) {
        if self.state().status == GameStatus::LevelStarting {
            self.dispatch(Action::SetStatus(GameStatus::Playing));
        }
    }

    /// Back to the title screen
    pub fn reset(&mut self) {
        self.dispatch(Action::Reset);
        self.reset_dynamic(false, false);
    }

    /// Lose a life: fresh paddle and resting ball, in-flight particles kept
    pub(crate) fn lose_life(&mut self) {
        self.events.push(GameEvent::LifeLost);
        self.dispatch(Action::LoseLife);
        self.reset_dynamic(false, true);
        log::info!("Life lost, {} remaining", self.state().lives);
    }

    fn reset_dynamic(&mut self, launched: bool, keep_particles: bool) {
        let particles = if keep_particles {
            std::mem::take(&mut self.dynamic.particles)
        } else {
            Vec::new()
        };
        self.dynamic = DynamicState::fresh(
            &mut self.spawner.ids,
            self.tuning.paddle_width,
            launched,
            self.tuning.ball_speed,
            &mut self.spawner.rng,
            particles,
        );
        self.shake = 0;
        self.shake_offset = Vec2::ZERO;
        self.last_laser_at = None;
    }

    /// Resume the frame loop at `now` (ms)
    pub fn resume(&mut self, now: f64) {
        self.clock.resume(now);
    }

    /// Stop the frame loop; later frames are ignored until `resume`
    pub fn stop(&mut self) {
        self.clock.stop();
    }

    /// Display-refresh callback. Returns false if the loop is stopped.
    pub fn frame(&mut self, now: f64, input: &TickInput) -> bool {
        let Some(raw_ms) = self.clock.frame(now) else {
            return false;
        };
        tick(self, input, raw_ms, now);
        true
    }

    /// Take the audio cues raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    /// Owned copy of everything the renderer draws
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state();
        Snapshot {
            paddle: self.dynamic.paddle.clone(),
            balls: self.dynamic.balls.clone(),
            particles: self.dynamic.particles.clone(),
            power_ups: self.dynamic.power_ups.clone(),
            lasers: self.dynamic.lasers.clone(),
            bricks: state.bricks.clone(),
            score: state.score,
            level: state.level + 1,
            lives: state.lives,
            status: state.status,
            power_ball_active: state.power_ball_active(),
            shake_offset: self.shake_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_game_resets_dynamic() {
        let mut session = Session::with_seed(1);
        session.start_game(0.0);

        let dynamic = session.dynamic();
        assert_eq!(dynamic.balls.len(), 1);
        assert!(dynamic.balls[0].is_stuck());
        assert!(dynamic.particles.is_empty());
        assert_eq!(session.drain_events(), vec![GameEvent::GameStart]);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_next_level_only_from_complete() {
        let mut session = Session::with_seed(1);
        session.start_game(0.0);
        assert!(!session.next_level(0.0));

        session.finish_intro();
        let mut bricks = session.state().bricks.clone();
        bricks.iter_mut().for_each(|b| b.destroyed = true);
        session.dispatch(Action::BrickUpdate {
            bricks,
            score_delta: 0,
        });
        assert!(session.next_level(0.0));
        assert_eq!(session.state().level, 1);
        assert_eq!(session.state().status, GameStatus::LevelStarting);
        // The next level starts with the ball already in flight
        assert!(!session.dynamic().balls[0].is_stuck());
    }

    #[test]
    fn test_burst_respects_cap() {
        let mut spawner = Spawner::new(5, 12, 8.0);
        let mut particles = Vec::new();
        spawner.burst(&mut particles, Vec2::ZERO, ParticleColor::Accent, 30, 0.0);
        assert_eq!(particles.len(), 12);
        assert!(particles.iter().all(|p| p.vel.x.abs() <= 4.0 && p.vel.y.abs() <= 4.0));
        assert!(particles.iter().all(|p| (1.0..=4.0).contains(&p.radius)));
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = Session::with_seed(42);
        let mut b = Session::with_seed(42);
        a.start_game(0.0);
        b.start_game(0.0);
        assert_eq!(a.dynamic().balls[0].id, b.dynamic().balls[0].id);
    }

    #[test]
    fn test_snapshot_is_display_ready() {
        let mut session = Session::with_seed(3);
        session.start_game(0.0);
        let snap = session.snapshot();
        assert_eq!(snap.level, 1);
        assert_eq!(snap.lives, 3);
        assert_eq!(snap.bricks.len(), session.state().bricks.len());
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"status\":\"level-starting\""));
    }
}
