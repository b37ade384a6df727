//! Axis-aligned rectangle geometry
//!
//! Every solid thing on the board (paddle, bricks, power-ups) is a box.
//! Balls are tested against boxes using their bounding square.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle defined by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Closed overlap test (touching edges count)
    pub fn touches(&self, other: &Rect) -> bool {
        other.right() >= self.left()
            && other.left() <= self.right()
            && other.bottom() >= self.top()
            && other.top() <= self.bottom()
    }

    /// Open overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        other.right() > self.left()
            && other.left() < self.right()
            && other.bottom() > self.top()
            && other.top() < self.bottom()
    }

    /// Point containment, edges included
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Bounding square of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self {
            pos: center - Vec2::splat(radius),
            size: Vec2::splat(radius * 2.0),
        }
    }
}
