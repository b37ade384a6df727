//! Collision detection and response
//!
//! Arcade approximations over axis-aligned boxes: balls are treated as their
//! bounding squares, velocities are flipped per axis.

use glam::Vec2;
use rand::Rng;

use super::state::{Ball, Brick, Laser, Paddle, PowerUp};
use crate::consts::*;
use crate::tuning::Tuning;

/// Which walls a ball bounced off this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallBounce {
    pub side: bool,
    pub top: bool,
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce a ball off the left/right/top walls, clamping it back in bounds
pub fn ball_wall_collision(ball: &mut Ball) -> WallBounce {
    let mut bounce = WallBounce::default();

    // Velocity always ends up pointing back into the board
    if ball.pos.x - ball.radius <= 0.0 {
        ball.vel.x = ball.vel.x.abs();
        ball.pos.x = ball.radius;
        bounce.side = true;
    } else if ball.pos.x + ball.radius >= BOARD_WIDTH {
        ball.vel.x = -ball.vel.x.abs();
        ball.pos.x = BOARD_WIDTH - ball.radius;
        bounce.side = true;
    }
    if ball.pos.y - ball.radius <= 0.0 {
        ball.vel.y = ball.vel.y.abs();
        ball.pos.y = ball.radius;
        bounce.top = true;
    }

    bounce
}

/// Bounce a falling ball off the paddle.
///
/// The outgoing angle is a linear function of where the ball struck,
/// from straight up at the center to `paddle_max_angle` at either edge.
/// Speed is preserved. Returns true on contact.
pub fn ball_paddle_collision<R: Rng>(
    ball: &mut Ball,
    paddle: &Paddle,
    tuning: &Tuning,
    rng: &mut R,
) -> bool {
    if ball.vel.y <= 0.0 || !paddle.rect().touches(&ball.bounds()) {
        return false;
    }

    ball.pos.y = paddle.pos.y - ball.radius;

    let half_width = paddle.width / 2.0;
    let hit_offset = (ball.pos.x - paddle.center_x()) / half_width;
    let angle = hit_offset * tuning.paddle_max_angle;
    let speed = ball.vel.length();
    ball.vel = Vec2::new(speed * angle.sin(), -speed * angle.cos());

    // Too flat: force a minimum climb so the ball can't loop sideways
    let min_vy = tuning.min_vertical_ratio * speed;
    if ball.vel.y.abs() < min_vy {
        ball.vel.y = -min_vy * rng.random_range(0.75..1.25);
    }

    true
}

/// Ball has fallen past the bottom of the board
#[inline]
pub fn ball_out_of_bounds(ball: &Ball) -> bool {
    ball.pos.y - ball.radius >= BOARD_HEIGHT
}

/// Strict overlap between a ball's bounding square and a brick
#[inline]
pub fn ball_brick_contact(ball: &Ball, brick: &Brick) -> bool {
    brick.rect().overlaps(&ball.bounds())
}

/// Reflect a ball off a brick it overlaps.
///
/// The approach side is judged from where the ball was one radius back
/// along its path: above/below flips vy, left/right flips vx.
pub fn ball_brick_bounce(ball: &mut Ball, brick: &Brick) {
    let speed = ball.vel.length();
    if speed == 0.0 {
        return;
    }
    let prev = ball.pos - ball.vel / speed * ball.radius;
    let rect = brick.rect();

    let from_top = prev.y + ball.radius <= rect.top();
    let from_bottom = prev.y - ball.radius >= rect.bottom();
    let from_left = prev.x + ball.radius <= rect.left();
    let from_right = prev.x - ball.radius >= rect.right();

    if from_top || from_bottom {
        ball.vel = reflect_velocity(ball.vel, Vec2::Y);
    }
    if from_left || from_right {
        ball.vel = reflect_velocity(ball.vel, Vec2::X);
    }
}

/// Laser tip inside a brick
#[inline]
pub fn laser_brick_contact(laser: &Laser, brick: &Brick) -> bool {
    brick.rect().contains(laser.pos)
}

/// Power-up capsule touching the paddle
#[inline]
pub fn power_up_caught(power_up: &PowerUp, paddle: &Paddle) -> bool {
    paddle.rect().touches(&power_up.rect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BrickKind;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ball_at(pos: Vec2, vel: Vec2) -> Ball {
        Ball {
            id: 1,
            pos,
            vel,
            radius: BALL_RADIUS,
            trail: Vec::new(),
        }
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_side_wall_bounce_clamps() {
        let mut ball = ball_at(Vec2::new(BOARD_WIDTH + 3.0, 300.0), Vec2::new(4.0, -4.0));
        let bounce = ball_wall_collision(&mut ball);
        assert!(bounce.side && !bounce.top);
        assert_eq!(ball.vel, Vec2::new(-4.0, -4.0));
        assert_eq!(ball.pos.x, BOARD_WIDTH - BALL_RADIUS);
    }

    #[test]
    fn test_ball_leaving_wall_keeps_heading() {
        let mut ball = ball_at(Vec2::new(5.0, 300.0), Vec2::new(3.0, -4.0));
        ball_wall_collision(&mut ball);
        assert_eq!(ball.vel, Vec2::new(3.0, -4.0));
        assert_eq!(ball.pos.x, BALL_RADIUS);
    }

    #[test]
    fn test_top_wall_bounce() {
        let mut ball = ball_at(Vec2::new(400.0, 4.0), Vec2::new(1.0, -4.0));
        let bounce = ball_wall_collision(&mut ball);
        assert!(bounce.top);
        assert_eq!(ball.vel.y, 4.0);
        assert_eq!(ball.pos.y, BALL_RADIUS);
    }

    #[test]
    fn test_paddle_center_hit_goes_straight_up() {
        let paddle = Paddle::centered(120.0);
        let mut ball = ball_at(Vec2::new(paddle.center_x(), PADDLE_Y - 5.0), Vec2::new(3.0, 4.0));
        let mut rng = Pcg32::seed_from_u64(3);

        assert!(ball_paddle_collision(&mut ball, &paddle, &Tuning::default(), &mut rng));
        assert_eq!(ball.pos.y, PADDLE_Y - BALL_RADIUS);
        assert!(ball.vel.x.abs() < 1e-5);
        assert!((ball.vel.y + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_paddle_edge_hit_deflects() {
        let paddle = Paddle::centered(120.0);
        let mut ball = ball_at(Vec2::new(paddle.pos.x + paddle.width, PADDLE_Y), Vec2::new(0.0, 5.0));
        let mut rng = Pcg32::seed_from_u64(3);

        assert!(ball_paddle_collision(&mut ball, &paddle, &Tuning::default(), &mut rng));
        let angle = ball.vel.x.atan2(-ball.vel.y);
        assert!((angle - std::f32::consts::PI / 2.5).abs() < 1e-4);
        assert!((ball.vel.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_rising_ball_ignores_paddle() {
        let paddle = Paddle::centered(120.0);
        let mut ball = ball_at(Vec2::new(paddle.center_x(), PADDLE_Y), Vec2::new(0.0, -4.0));
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(!ball_paddle_collision(&mut ball, &paddle, &Tuning::default(), &mut rng));
    }

    #[test]
    fn test_flat_rebound_gets_minimum_climb() {
        let paddle = Paddle::centered(120.0);
        let tuning = Tuning {
            paddle_max_angle: std::f32::consts::FRAC_PI_2,
            ..Tuning::default()
        };
        let mut ball = ball_at(Vec2::new(paddle.pos.x + paddle.width, PADDLE_Y), Vec2::new(0.0, 5.0));
        let mut rng = Pcg32::seed_from_u64(9);

        assert!(ball_paddle_collision(&mut ball, &paddle, &tuning, &mut rng));
        assert!(ball.vel.y < 0.0);
        assert!(ball.vel.y.abs() >= 0.2 * 5.0 * 0.75 - 1e-5);
    }

    #[test]
    fn test_brick_bounce_from_below_flips_vy() {
        let brick = Brick::new(1, Vec2::new(100.0, 100.0), BrickKind::Standard);
        let mut ball = ball_at(Vec2::new(137.0, 128.0), Vec2::new(1.0, -4.0));
        assert!(ball_brick_contact(&ball, &brick));
        ball_brick_bounce(&mut ball, &brick);
        assert_eq!(ball.vel, Vec2::new(1.0, 4.0));
    }

    #[test]
    fn test_brick_bounce_from_side_flips_vx() {
        let brick = Brick::new(1, Vec2::new(100.0, 100.0), BrickKind::Standard);
        let mut ball = ball_at(Vec2::new(93.0, 110.0), Vec2::new(4.0, 0.0));
        assert!(ball_brick_contact(&ball, &brick));
        ball_brick_bounce(&mut ball, &brick);
        assert_eq!(ball.vel, Vec2::new(-4.0, 0.0));
    }

    #[test]
    fn test_laser_contact() {
        let brick = Brick::new(1, Vec2::new(100.0, 100.0), BrickKind::Silver);
        let hit = Laser { id: 1, pos: Vec2::new(110.0, 119.0) };
        let miss = Laser { id: 2, pos: Vec2::new(99.0, 110.0) };
        assert!(laser_brick_contact(&hit, &brick));
        assert!(!laser_brick_contact(&miss, &brick));
    }

    #[test]
    fn test_out_of_bounds() {
        let gone = ball_at(Vec2::new(10.0, BOARD_HEIGHT + BALL_RADIUS), Vec2::ZERO);
        let low = ball_at(Vec2::new(10.0, BOARD_HEIGHT), Vec2::ZERO);
        assert!(ball_out_of_bounds(&gone));
        assert!(!ball_out_of_bounds(&low));
    }

    proptest! {
        #[test]
        fn prop_wall_bounce_preserves_speed(
            x in -20.0f32..820.0,
            y in -20.0f32..590.0,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
        ) {
            let mut ball = ball_at(Vec2::new(x, y), Vec2::new(vx, vy));
            let before = ball.vel.length();
            ball_wall_collision(&mut ball);
            prop_assert!((ball.vel.length() - before).abs() < 1e-4);
        }

        #[test]
        fn prop_brick_bounce_preserves_speed(
            dx in -12.0f32..87.0,
            dy in -12.0f32..32.0,
            vx in -8.0f32..8.0,
            vy in -8.0f32..8.0,
        ) {
            let brick = Brick::new(1, Vec2::new(200.0, 200.0), BrickKind::Standard);
            let mut ball = ball_at(Vec2::new(200.0 + dx, 200.0 + dy), Vec2::new(vx, vy));
            let before = ball.vel.length();
            ball_brick_bounce(&mut ball, &brick);
            prop_assert!((ball.vel.length() - before).abs() < 1e-4);
        }
    }
}
