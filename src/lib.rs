//! Neon Breakout - arcade brick breaker with a deterministic core
//!
//! Core modules:
//! - `sim`: Simulation (entities, per-frame tick, game state machine)
//! - `input`: Keyboard/pointer events normalized into a control signal
//! - `platform`: Frame clock and the browser binding
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance

pub mod input;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use input::InputState;
pub use settings::{QualityPreset, Settings};
pub use sim::{Session, Snapshot};
pub use tuning::{ConfigError, Tuning};

/// Board and brick-grid geometry. Gameplay balance lives in [`Tuning`].
pub mod consts {
    /// Board dimensions (origin top-left, y grows downward)
    pub const BOARD_WIDTH: f32 = 800.0;
    pub const BOARD_HEIGHT: f32 = 600.0;

    /// Paddle rests this far above the board bottom
    pub const PADDLE_Y: f32 = BOARD_HEIGHT - 40.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;

    pub const BALL_RADIUS: f32 = 10.0;

    /// Brick grid
    pub const BRICK_COLS: usize = 10;
    pub const BRICK_WIDTH: f32 = 75.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_GAP: f32 = 5.0;
    pub const BRICK_OFFSET_TOP: f32 = 100.0;

    /// Raw milliseconds per normalized frame (60 Hz baseline)
    pub const FRAME_MS: f64 = 16.67;

    /// Maximum recorded trail positions per ball
    pub const TRAIL_LENGTH: usize = 5;
}

/// Left edge of a brick grid `cols` wide, centered on the board
#[inline]
pub fn brick_offset_left(cols: usize) -> f32 {
    use consts::*;
    let grid_width = cols as f32 * (BRICK_WIDTH + BRICK_GAP) - BRICK_GAP;
    (BOARD_WIDTH - grid_width) / 2.0
}

/// Convert a raw frame delta in milliseconds to normalized frames
#[inline]
pub fn normalize_delta(raw_ms: f64) -> f32 {
    (raw_ms / consts::FRAME_MS) as f32
}
