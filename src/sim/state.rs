//! Game state and core simulation types
//!
//! `GameState` is the persistent part owned by the state machine;
//! `DynamicState` is the per-frame part owned by the tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Current status of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
    /// Title screen, nothing loaded
    Start,
    /// Level intro is showing
    LevelStarting,
    /// Active gameplay
    Playing,
    /// Every brick destroyed, waiting for the player to continue
    LevelComplete,
    /// Out of lives
    GameOver,
}

/// Discrete audio triggers emitted by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameEvent {
    PaddleHit,
    WallHit,
    /// Brick destroyed
    BrickHit,
    /// Silver brick cracked but still standing
    BrickDamaged,
    PowerUpCollected,
    LaserFired,
    LevelComplete,
    GameOver,
    LifeLost,
    GameStart,
}

/// Hands out entity ids for one game session
#[derive(Debug, Clone)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Laser cannons mounted
    pub laser: bool,
}

impl Paddle {
    /// Fresh paddle horizontally centered on the board
    pub fn centered(width: f32) -> Self {
        let width = width.min(BOARD_WIDTH);
        Self {
            pos: Vec2::new((BOARD_WIDTH - width) / 2.0, PADDLE_Y),
            width,
            height: PADDLE_HEIGHT,
            laser: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(self.width, self.height))
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Keep the paddle fully on the board
    pub fn clamp_to_board(&mut self) {
        self.width = self.width.min(BOARD_WIDTH);
        self.pos.x = self.pos.x.clamp(0.0, BOARD_WIDTH - self.width);
    }

    /// Center the paddle on a board x coordinate
    pub fn center_on(&mut self, x: f32) {
        self.pos.x = x - self.width / 2.0;
        self.clamp_to_board();
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Recent positions for rendering (oldest first)
    pub trail: Vec<Vec2>,
}

impl Ball {
    /// Ball resting just above the paddle center, optionally already launched
    pub fn on_paddle<R: Rng>(
        id: u32,
        paddle_x: f32,
        paddle_width: f32,
        launched: bool,
        speed: f32,
        rng: &mut R,
    ) -> Self {
        let vel = if launched {
            launch_velocity(speed, rng)
        } else {
            Vec2::ZERO
        };
        Self {
            id,
            pos: Vec2::new(paddle_x + paddle_width / 2.0, PADDLE_Y - BALL_RADIUS),
            vel,
            radius: BALL_RADIUS,
            trail: Vec::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Resting on the paddle, waiting for launch
    pub fn is_stuck(&self) -> bool {
        self.vel == Vec2::ZERO
    }

    /// Record current position to trail (call each tick)
    pub fn record_trail(&mut self) {
        self.trail.push(self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.remove(0);
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }
}

/// Upward launch at `speed` per axis with a random horizontal sign
pub fn launch_velocity<R: Rng>(speed: f32, rng: &mut R) -> Vec2 {
    let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    Vec2::new(sign * speed, -speed)
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrickKind {
    Standard,
    /// Takes two hits
    Silver,
}

impl BrickKind {
    pub fn initial_hits(&self) -> u8 {
        match self {
            BrickKind::Standard => 1,
            BrickKind::Silver => 2,
        }
    }
}

/// A brick entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: BrickKind,
    pub hits_left: u8,
    pub destroyed: bool,
}

impl Brick {
    pub fn new(id: u32, pos: Vec2, kind: BrickKind) -> Self {
        Self {
            id,
            pos,
            width: BRICK_WIDTH,
            height: BRICK_HEIGHT,
            kind,
            hits_left: kind.initial_hits(),
            destroyed: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(self.width, self.height))
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }
}

/// Particle color category (resolved against the theme by the renderer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticleColor {
    Accent,
    Primary,
    Silver,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// 1.0 at birth, linear fade to 0 over the lifespan
    pub opacity: f32,
    /// Creation timestamp (ms)
    pub created_at: f64,
    pub color: ParticleColor,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerUpKind {
    Extend,
    Laser,
    MultiBall,
    PowerBall,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Extend,
        PowerUpKind::Laser,
        PowerUpKind::MultiBall,
        PowerUpKind::PowerBall,
    ];
}

/// A falling power-up capsule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(self.width, self.height))
    }
}

/// A laser bolt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub id: u32,
    pub pos: Vec2,
}

/// Persistent game state, changed only through the state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    /// Current level index (0-based, cycles through the layout table)
    pub level: u32,
    pub lives: u8,
    pub status: GameStatus,
    /// Power-ball expiry timestamp (ms), `None` when inactive
    pub power_ball_until: Option<f64>,
    pub paddle_width: f32,
    pub paddle_laser: bool,
    pub bricks: Vec<Brick>,
}

impl GameState {
    /// Title-screen state
    pub fn new(initial_lives: u8, paddle_width: f32) -> Self {
        Self {
            score: 0,
            level: 0,
            lives: initial_lives,
            status: GameStatus::Start,
            power_ball_until: None,
            paddle_width,
            paddle_laser: false,
            bricks: Vec::new(),
        }
    }

    pub fn power_ball_active(&self) -> bool {
        self.power_ball_until.is_some()
    }

    /// Bricks still standing
    pub fn bricks_remaining(&self) -> usize {
        self.bricks.iter().filter(|b| !b.destroyed).count()
    }
}

/// Per-frame entities, owned by the tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicState {
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub particles: Vec<Particle>,
    pub power_ups: Vec<PowerUp>,
    pub lasers: Vec<Laser>,
}

impl DynamicState {
    /// Fresh paddle with a single ball on it; particles are handed over
    pub fn fresh<R: Rng>(
        ids: &mut EntityIds,
        paddle_width: f32,
        launched: bool,
        ball_speed: f32,
        rng: &mut R,
        particles: Vec<Particle>,
    ) -> Self {
        let paddle = Paddle::centered(paddle_width);
        let ball = Ball::on_paddle(
            ids.next_id(),
            paddle.pos.x,
            paddle.width,
            launched,
            ball_speed,
            rng,
        );
        Self {
            paddle,
            balls: vec![ball],
            particles,
            power_ups: Vec::new(),
            lasers: Vec::new(),
        }
    }
}
