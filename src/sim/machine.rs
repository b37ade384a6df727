//! Game state machine
//!
//! `start → level-starting → playing → {level-complete | game-over}`,
//! `level-complete → level-starting` on advance, `game-over → level-starting`
//! on restart. Transitions are a pure function of state and action.

use super::level::LevelSet;
use super::state::{Brick, GameEvent, GameState, GameStatus};

/// Discrete transitions applied to the persistent state
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// New game from level 0
    Start,
    /// Back to the title screen
    Reset,
    /// Load the next level
    AdvanceLevel,
    /// Replace the brick collection and add score
    BrickUpdate { bricks: Vec<Brick>, score_delta: u64 },
    LoseLife,
    SetStatus(GameStatus),
    /// Narrow setter for power-up paddle overrides
    SetPaddleProps {
        width: Option<f32>,
        laser: Option<bool>,
    },
    /// `Some(expiry_ms)` enables power-ball, `None` clears it
    SetPowerBall(Option<f64>),
}

/// Outcome of one transition
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GameState,
    /// Audio cue raised by the transition itself
    pub event: Option<GameEvent>,
}

/// Defaults restored by `start`, `advance-level` and `lose-life`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Defaults {
    pub lives: u8,
    pub paddle_width: f32,
}

/// Pure reducer: `(state, action) -> state`
pub fn reduce(
    state: &GameState,
    action: Action,
    levels: &LevelSet,
    defaults: Defaults,
) -> Transition {
    let mut next = state.clone();
    let mut event = None;

    match action {
        Action::Start => {
            next = GameState::new(defaults.lives, defaults.paddle_width);
            next.bricks = levels.bricks(0);
            next.status = GameStatus::LevelStarting;
        }
        Action::Reset => {
            next = GameState::new(defaults.lives, defaults.paddle_width);
        }
        Action::AdvanceLevel => {
            next.level = state.level + 1;
            next.bricks = levels.bricks(next.level);
            next.status = GameStatus::LevelStarting;
            clear_overrides(&mut next, defaults);
        }
        Action::BrickUpdate {
            bricks,
            score_delta,
        } => {
            let all_destroyed = bricks.iter().all(|b| b.destroyed);
            next.bricks = bricks;
            next.score = state.score.saturating_add(score_delta);
            if all_destroyed && state.status == GameStatus::Playing {
                next.status = GameStatus::LevelComplete;
                event = Some(GameEvent::LevelComplete);
            }
        }
        // A board cleared in the same frame the last ball drops wins
        Action::LoseLife if state.status != GameStatus::Playing => {}
        Action::LoseLife => {
            next.lives = state.lives.saturating_sub(1);
            if next.lives == 0 {
                next.status = GameStatus::GameOver;
                event = Some(GameEvent::GameOver);
            } else {
                next.status = GameStatus::Playing;
                clear_overrides(&mut next, defaults);
            }
        }
        Action::SetStatus(status) => {
            next.status = status;
        }
        Action::SetPaddleProps { width, laser } => {
            if let Some(width) = width {
                next.paddle_width = width;
            }
            if let Some(laser) = laser {
                next.paddle_laser = laser;
            }
        }
        Action::SetPowerBall(until) => {
            next.power_ball_until = until;
        }
    }

    Transition { state: next, event }
}

fn clear_overrides(state: &mut GameState, defaults: Defaults) {
    state.power_ball_until = None;
    state.paddle_width = defaults.paddle_width;
    state.paddle_laser = false;
}

/// Owns the persistent state and the level table
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: GameState,
    levels: LevelSet,
    defaults: Defaults,
}

impl StateMachine {
    pub fn new(levels: LevelSet, defaults: Defaults) -> Self {
        Self {
            state: GameState::new(defaults.lives, defaults.paddle_width),
            levels,
            defaults,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    /// Apply an action, returning the transition's audio cue if any
    pub fn dispatch(&mut self, action: Action) -> Option<GameEvent> {
        let from = self.state.status;
        let Transition { state, event } = reduce(&self.state, action, &self.levels, self.defaults);
        self.state = state;

        if self.state.status != from {
            log::info!(
                "Status {:?} -> {:?} (level {}, lives {}, score {})",
                from,
                self.state.status,
                self.state.level + 1,
                self.state.lives,
                self.state.score
            );
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: Defaults = Defaults {
        lives: 3,
        paddle_width: 120.0,
    };

    fn machine() -> StateMachine {
        StateMachine::new(LevelSet::builtin(), DEFAULTS)
    }

    fn playing() -> StateMachine {
        let mut m = machine();
        m.dispatch(Action::Start);
        m.dispatch(Action::SetStatus(GameStatus::Playing));
        m
    }

    #[test]
    fn test_start_loads_level_zero() {
        let mut m = machine();
        assert_eq!(m.state().status, GameStatus::Start);

        m.dispatch(Action::Start);
        let s = m.state();
        assert_eq!(s.status, GameStatus::LevelStarting);
        assert_eq!(s.lives, 3);
        assert_eq!(s.score, 0);
        assert_eq!(s.level, 0);
        assert_eq!(s.bricks, m.levels().bricks(0));
    }

    #[test]
    fn test_brick_update_completes_level_once() {
        let mut m = playing();
        let mut bricks = m.state().bricks.clone();
        for b in &mut bricks {
            b.destroyed = true;
        }

        let event = m.dispatch(Action::BrickUpdate {
            bricks: bricks.clone(),
            score_delta: 10,
        });
        assert_eq!(event, Some(GameEvent::LevelComplete));
        assert_eq!(m.state().status, GameStatus::LevelComplete);

        let again = m.dispatch(Action::BrickUpdate {
            bricks,
            score_delta: 0,
        });
        assert_eq!(again, None);
        assert_eq!(m.state().status, GameStatus::LevelComplete);
    }

    #[test]
    fn test_brick_update_adds_score() {
        let mut m = playing();
        let mut bricks = m.state().bricks.clone();
        bricks[0].destroyed = true;
        m.dispatch(Action::BrickUpdate {
            bricks,
            score_delta: 10,
        });
        assert_eq!(m.state().score, 10);
        assert_eq!(m.state().status, GameStatus::Playing);
    }

    #[test]
    fn test_advance_level_clears_overrides() {
        let mut m = playing();
        m.dispatch(Action::SetPaddleProps {
            width: Some(200.0),
            laser: Some(true),
        });
        m.dispatch(Action::SetPowerBall(Some(5_000.0)));
        m.dispatch(Action::AdvanceLevel);

        let s = m.state();
        assert_eq!(s.level, 1);
        assert_eq!(s.status, GameStatus::LevelStarting);
        assert_eq!(s.paddle_width, 120.0);
        assert!(!s.paddle_laser);
        assert!(!s.power_ball_active());
        assert_eq!(s.bricks, m.levels().bricks(1));
    }

    #[test]
    fn test_lose_life_until_game_over() {
        let mut m = playing();
        m.dispatch(Action::SetPaddleProps {
            width: None,
            laser: Some(true),
        });

        assert_eq!(m.dispatch(Action::LoseLife), None);
        assert_eq!(m.state().lives, 2);
        assert_eq!(m.state().status, GameStatus::Playing);
        assert!(!m.state().paddle_laser);

        m.dispatch(Action::LoseLife);
        assert_eq!(m.dispatch(Action::LoseLife), Some(GameEvent::GameOver));
        assert_eq!(m.state().lives, 0);
        assert_eq!(m.state().status, GameStatus::GameOver);
    }

    #[test]
    fn test_lose_life_ignored_after_level_complete() {
        let mut m = playing();
        let mut bricks = m.state().bricks.clone();
        bricks.iter_mut().for_each(|b| b.destroyed = true);
        m.dispatch(Action::BrickUpdate {
            bricks,
            score_delta: 0,
        });

        assert_eq!(m.dispatch(Action::LoseLife), None);
        assert_eq!(m.state().status, GameStatus::LevelComplete);
        assert_eq!(m.state().lives, 3);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut m = playing();
        for _ in 0..3 {
            m.dispatch(Action::LoseLife);
        }
        m.dispatch(Action::Start);
        assert_eq!(m.state().status, GameStatus::LevelStarting);
        assert_eq!(m.state().lives, 3);
    }

    #[test]
    fn test_clearing_power_ball_is_idempotent() {
        let mut m = playing();
        m.dispatch(Action::SetPowerBall(None));
        m.dispatch(Action::SetPowerBall(None));
        assert!(!m.state().power_ball_active());
    }

    #[test]
    fn test_reducer_is_pure() {
        let m = playing();
        let before = m.state().clone();
        let t = reduce(m.state(), Action::LoseLife, m.levels(), DEFAULTS);
        assert_eq!(t.state.lives, before.lives - 1);
        assert_eq!(m.state().lives, before.lives);
    }

    #[test]
    fn test_reset_returns_to_title() {
        let mut m = playing();
        m.dispatch(Action::Reset);
        assert_eq!(m.state().status, GameStatus::Start);
        assert!(m.state().bricks.is_empty());
    }
}
