//! Gameplay simulation
//!
//! All gameplay logic lives here. No rendering or browser dependencies:
//! - Timestamps and frame deltas come in from the caller
//! - Seeded RNG only, owned by the session
//! - Persistent state changes only through the state machine

pub mod collision;
pub mod level;
pub mod machine;
pub mod rect;
pub mod session;
pub mod state;
pub mod tick;

pub use level::{LevelError, LevelSet};
pub use machine::{Action, Defaults, StateMachine, Transition, reduce};
pub use rect::Rect;
pub use session::{Session, Snapshot, Spawner};
pub use state::{
    Ball, Brick, BrickKind, DynamicState, GameEvent, GameState, GameStatus, Laser, Paddle,
    Particle, ParticleColor, PowerUp, PowerUpKind,
};
pub use tick::{TickInput, tick};
