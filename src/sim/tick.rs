//! Per-frame simulation tick
//!
//! Advances paddle, balls, particles, power-ups and lasers by one display
//! frame and resolves every interaction. The step order is significant.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;

use super::collision::{
    ball_brick_bounce, ball_brick_contact, ball_out_of_bounds, ball_paddle_collision,
    ball_wall_collision, laser_brick_contact, power_up_caught,
};
use super::machine::{Action, StateMachine};
use super::session::Session;
use super::state::{
    Ball, BrickKind, GameEvent, GameStatus, Laser, ParticleColor, PowerUp, PowerUpKind,
    launch_velocity,
};
use crate::consts::*;
use crate::normalize_delta;

/// Control signal for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Move paddle left (held)
    pub left: bool,
    /// Move paddle right (held)
    pub right: bool,
    /// Fire lasers (held)
    pub fire: bool,
    /// Launch a resting ball (one-shot)
    pub launch: bool,
    /// Center paddle on this board x (one-shot)
    pub pointer_x: Option<f32>,
}

fn apply(machine: &mut StateMachine, action: Action, events: &mut Vec<GameEvent>) {
    if let Some(event) = machine.dispatch(action) {
        events.push(event);
    }
}

/// Advance the session by one frame.
///
/// `raw_ms` is the time since the previous frame, `now` the current
/// timestamp; both in milliseconds. Does nothing unless the game is playing.
pub fn tick(session: &mut Session, input: &TickInput, raw_ms: f64, now: f64) {
    if session.state().status != GameStatus::Playing {
        session.shake = 0;
        session.shake_offset = Vec2::ZERO;
        return;
    }

    // Power-ball runs out on the wall clock
    if let Some(until) = session.state().power_ball_until {
        if now >= until {
            session.dispatch(Action::SetPowerBall(None));
        }
    }

    let dt = normalize_delta(raw_ms);
    // Persistent state is read-only for the rest of the tick
    let state = session.state().clone();
    let power_ball = state.power_ball_active();

    let Session {
        machine,
        dynamic,
        spawner,
        tuning,
        settings,
        shake,
        shake_offset,
        last_laser_at,
        events,
        ..
    } = &mut *session;

    // --- Pointer and launch events ---
    if let Some(x) = input.pointer_x {
        dynamic.paddle.center_on(x);
    }
    if input.launch && dynamic.balls.len() == 1 && dynamic.balls[0].is_stuck() {
        dynamic.balls[0].vel = launch_velocity(tuning.ball_speed, &mut spawner.rng);
        events.push(GameEvent::PaddleHit);
    }

    // --- 1. Paddle movement ---
    let paddle = &mut dynamic.paddle;
    if input.left {
        paddle.pos.x -= tuning.paddle_speed * dt;
    }
    if input.right {
        paddle.pos.x += tuning.paddle_speed * dt;
    }
    paddle.width = state.paddle_width;
    paddle.laser = state.paddle_laser;
    paddle.clamp_to_board();

    // --- 2. Resting ball rides the paddle ---
    if dynamic.balls.len() == 1 && dynamic.balls[0].is_stuck() {
        dynamic.balls[0].pos.x = dynamic.paddle.center_x();
    }

    // --- 3. Laser volley ---
    let cooled = last_laser_at.is_none_or(|t| now - t > tuning.laser_cooldown_ms);
    if input.fire && dynamic.paddle.laser && cooled {
        let paddle = &dynamic.paddle;
        for x in [
            paddle.pos.x + tuning.laser_inset,
            paddle.pos.x + paddle.width - tuning.laser_inset,
        ] {
            dynamic.lasers.push(Laser {
                id: spawner.ids.next_id(),
                pos: Vec2::new(x, paddle.pos.y),
            });
        }
        *last_laser_at = Some(now);
        events.push(GameEvent::LaserFired);
    }

    // --- 4. Particle aging ---
    let lifespan = tuning.particle_lifespan_ms;
    dynamic.particles.retain_mut(|p| {
        let age = now - p.created_at;
        if age > lifespan {
            return false;
        }
        p.pos += p.vel * dt;
        p.opacity = (1.0 - age / lifespan) as f32;
        true
    });

    // --- 5. Power-ups fall ---
    dynamic.power_ups.retain_mut(|p| {
        p.pos.y += tuning.power_up_fall_speed * dt;
        p.pos.y < BOARD_HEIGHT
    });

    // --- 6. Lasers rise ---
    dynamic.lasers.retain_mut(|l| {
        l.pos.y -= tuning.laser_speed * dt;
        l.pos.y > 0.0
    });

    // --- 7. Ball motion ---
    let speed_multiplier = if power_ball {
        tuning.power_ball_multiplier
    } else {
        1.0
    };
    for ball in &mut dynamic.balls {
        ball.record_trail();
        ball.pos += ball.vel * speed_multiplier * dt;
    }

    // --- 8. Power-up collection ---
    let mut caught = Vec::new();
    dynamic.power_ups.retain(|p| {
        if power_up_caught(p, &dynamic.paddle) {
            caught.push(p.kind);
            false
        } else {
            true
        }
    });
    for kind in caught {
        events.push(GameEvent::PowerUpCollected);
        *shake = tuning.shake_power_up;
        log::debug!("Collected {:?}", kind);

        match kind {
            PowerUpKind::Extend => {
                let width = (machine.state().paddle_width + tuning.extend_increment)
                    .min(tuning.extend_max_width);
                apply(
                    machine,
                    Action::SetPaddleProps {
                        width: Some(width),
                        laser: None,
                    },
                    events,
                );
            }
            PowerUpKind::Laser => apply(
                machine,
                Action::SetPaddleProps {
                    width: None,
                    laser: Some(true),
                },
                events,
            ),
            PowerUpKind::MultiBall => {
                let mut spawned = Vec::with_capacity(dynamic.balls.len() * 2);
                for existing in &dynamic.balls {
                    for _ in 0..2 {
                        let climb = if existing.vel.y != 0.0 {
                            existing.vel.y.abs()
                        } else {
                            tuning.ball_speed
                        };
                        let vx = (spawner.rng.random::<f32>() - 0.5) * tuning.ball_speed;
                        spawned.push(Ball {
                            id: spawner.ids.next_id(),
                            vel: Vec2::new(vx, -climb).clamp_length_max(tuning.max_ball_speed),
                            ..existing.clone()
                        });
                    }
                }
                dynamic.balls.extend(spawned);
            }
            PowerUpKind::PowerBall => apply(
                machine,
                Action::SetPowerBall(Some(now + tuning.power_ball_duration_ms)),
                events,
            ),
        }
    }

    // --- 9-10. Walls and paddle ---
    for ball in &mut dynamic.balls {
        let bounce = ball_wall_collision(ball);
        for _ in [bounce.side, bounce.top].into_iter().filter(|&hit| hit) {
            spawner.burst(
                &mut dynamic.particles,
                ball.pos,
                ParticleColor::Primary,
                tuning.particle_burst,
                now,
            );
            events.push(GameEvent::WallHit);
        }

        if ball_paddle_collision(ball, &dynamic.paddle, tuning, &mut spawner.rng) {
            spawner.burst(
                &mut dynamic.particles,
                ball.pos,
                ParticleColor::Primary,
                tuning.paddle_particle_burst,
                now,
            );
            events.push(GameEvent::PaddleHit);
            *shake = tuning.shake_paddle;
        }
    }

    // --- 11. Balls lost off the bottom ---
    let ball_count = dynamic.balls.len();
    dynamic.balls.retain(|b| !ball_out_of_bounds(b));
    let life_lost = ball_count > 0 && dynamic.balls.is_empty();

    // --- 12. Lasers against bricks ---
    let mut bricks = state.bricks.clone();
    let mut hit: HashSet<u32> = HashSet::new();
    dynamic.lasers.retain(|laser| {
        let target = bricks
            .iter()
            .find(|b| !b.destroyed && !hit.contains(&b.id) && laser_brick_contact(laser, b));
        match target {
            Some(brick) => {
                hit.insert(brick.id);
                false
            }
            None => true,
        }
    });

    // --- 13. Balls against bricks ---
    for ball in &mut dynamic.balls {
        for brick in &bricks {
            if brick.destroyed || hit.contains(&brick.id) || !ball_brick_contact(ball, brick) {
                continue;
            }
            hit.insert(brick.id);
            if !power_ball {
                ball_brick_bounce(ball, brick);
            }
        }
    }

    // --- 14. Brick damage ---
    let mut score_delta = 0;
    let mut destroyed = 0;
    for brick in bricks.iter_mut().filter(|b| hit.contains(&b.id)) {
        *shake = tuning.shake_brick;
        let center = brick.center();

        if brick.kind == BrickKind::Silver && brick.hits_left > 1 && !power_ball {
            brick.hits_left -= 1;
            events.push(GameEvent::BrickDamaged);
            spawner.burst(
                &mut dynamic.particles,
                center,
                ParticleColor::Silver,
                tuning.damage_particle_burst,
                now,
            );
            continue;
        }

        brick.hits_left = 0;
        brick.destroyed = true;
        destroyed += 1;
        score_delta += tuning.score_per_brick;
        events.push(GameEvent::BrickHit);
        spawner.burst(
            &mut dynamic.particles,
            center,
            ParticleColor::Accent,
            tuning.particle_burst,
            now,
        );

        if spawner.rng.random::<f64>() < tuning.power_up_drop_chance {
            let kind = PowerUpKind::ALL[spawner.rng.random_range(0..PowerUpKind::ALL.len())];
            dynamic.power_ups.push(PowerUp {
                id: spawner.ids.next_id(),
                pos: Vec2::new(center.x - tuning.power_up_width / 2.0, center.y),
                width: tuning.power_up_width,
                height: tuning.power_up_height,
                kind,
            });
        }
    }

    // --- 15. Report brick changes ---
    if !hit.is_empty() {
        if destroyed > 0 {
            log::debug!("{} bricks destroyed (+{})", destroyed, score_delta);
        }
        apply(
            machine,
            Action::BrickUpdate {
                bricks,
                score_delta,
            },
            events,
        );
    }

    // --- 16. Screen shake ---
    if *shake > 0 {
        let magnitude = *shake as f32;
        *shake_offset = if settings.effective_screen_shake() {
            let mut jitter = || (spawner.rng.random::<f32>() * magnitude - magnitude / 2.0).round();
            Vec2::new(jitter(), jitter())
        } else {
            Vec2::ZERO
        };
        *shake -= 1;
    } else {
        *shake_offset = Vec2::ZERO;
    }

    // --- 17. Life loss ---
    // Skipped if this frame's brick update already completed the level
    if life_lost && session.state().status == GameStatus::Playing {
        session.lose_life();
    }
}
