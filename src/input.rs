//! Keyboard and pointer input
//!
//! Event handlers write held-key flags and one-shot events here; the frame
//! loop turns them into a `TickInput` once per frame.

use crate::sim::TickInput;

/// Logical controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    /// Fire lasers / launch the ball
    Fire,
}

impl Control {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Control::Left),
            "ArrowRight" => Some(Control::Right),
            " " => Some(Control::Fire),
            _ => None,
        }
    }
}

/// Control signal shared between event handlers and the frame loop
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    fire: bool,
    launch: bool,
    pointer_x: Option<f32>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle key down. Returns true if the key is a game control
    /// (the caller should prevent the browser default).
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(control) = Control::from_key(key) else {
            return false;
        };
        match control {
            Control::Left => self.left = true,
            Control::Right => self.right = true,
            Control::Fire => {
                self.fire = true;
                self.launch = true;
            }
        }
        true
    }

    /// Handle key up. Returns true if the key is a game control.
    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(control) = Control::from_key(key) else {
            return false;
        };
        match control {
            Control::Left => self.left = false,
            Control::Right => self.right = false,
            Control::Fire => self.fire = false,
        }
        true
    }

    /// Pointer moved to board-relative x
    pub fn pointer_move(&mut self, x: f32) {
        self.pointer_x = Some(x);
    }

    /// Click/tap launches a resting ball
    pub fn click(&mut self) {
        self.launch = true;
    }

    /// Read held flags and consume one-shot events
    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            fire: self.fire,
            launch: std::mem::take(&mut self.launch),
            pointer_x: self.pointer_x.take(),
        }
    }

    /// Forget everything (focus lost, loop torn down)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
