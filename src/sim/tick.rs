//! Per-frame simulation tick
//!
//! Core game loop: drains due scheduled events, advances power-up timers,
//! then runs ball physics, pickups and win/loss detection while Playing.

use glam::Vec2;
use rand::Rng;

use super::collision::{self, BrickHit, PaddleContact};
use super::level;
use super::powerup;
use super::schedule::ScheduledEvent;
use super::state::{
    AudioCue, Ball, GameEvent, GamePhase, GameState, ParticleTint, Powerup, PowerupKind,
};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Target paddle center x (from mouse/touch position)
    pub paddle_x: Option<f32>,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot steers the paddle
    pub idle_mode: bool,
}

/// Advance the game state by one frame of `dt_ms` elapsed milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    state.events.clear();

    if state.phase == GamePhase::GameOver {
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => state.phase = GamePhase::Paused,
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    state.clock_ms += dt_ms;
    state.frame += 1;

    run_scheduled(state);

    match state.phase {
        GamePhase::Playing => state.effects.countdown(dt_ms),
        GamePhase::LevelTransition => state.transition_elapsed_ms += dt_ms,
        _ => {}
    }

    state.update_particles();

    if state.phase != GamePhase::Playing {
        return;
    }

    // Paddle
    let target = if input.idle_mode {
        autopilot_target(state)
    } else {
        input.paddle_x
    };
    if let Some(x) = target {
        state.paddle.move_to(x);
    }

    step_balls(state);
    if state.phase != GamePhase::Playing {
        return;
    }

    if state.balls.is_empty() {
        lose_life(state);
        if state.phase != GamePhase::Playing {
            return;
        }
    }

    step_powerups(state);
}

/// Fire every scheduled event whose deadline has passed
fn run_scheduled(state: &mut GameState) {
    while let Some(event) = state.scheduler.pop_due(state.clock_ms) {
        match event {
            ScheduledEvent::Revert(kind) => powerup::revert(state, kind),
            ScheduledEvent::Descent => {
                if matches!(state.phase, GamePhase::Paused | GamePhase::LevelTransition) {
                    state
                        .scheduler
                        .schedule(state.clock_ms + DESCENT_RETRY_MS, ScheduledEvent::Descent);
                } else if state.descent_count < MAX_DESCENT {
                    descend_bricks(state);
                }
            }
            ScheduledEvent::FinishLevelTransition => finish_level_transition(state),
        }
    }
}

fn descend_bricks(state: &mut GameState) {
    let moved = state.bricks.descend(BRICK_HEIGHT + BRICK_PADDING);
    state.descent_count += 1;
    state.cue(AudioCue::BrickBreak);
    state.events.push(GameEvent::BricksDescended {
        descent_count: state.descent_count,
    });
    log::debug!(
        "Bricks descended ({}/{}), {} moved",
        state.descent_count,
        MAX_DESCENT,
        moved
    );

    if state.descent_count < MAX_DESCENT {
        state.arm_descent();
    }
}

/// Physics pass over every ball, back to front so removal is stable
fn step_balls(state: &mut GameState) {
    let magnetic = state.effects.magnetic.active;
    let paddle_center = state.paddle.center();
    let mut wall_bounce = false;
    let mut paddle_bounce = false;

    let mut i = state.balls.len();
    while i > 0 {
        i -= 1;
        let ball = &mut state.balls[i];

        ball.record_trail();
        if magnetic {
            collision::apply_magnetic(ball, paddle_center);
        }
        wall_bounce |= collision::resolve_walls(ball);

        match collision::resolve_paddle(ball, &state.paddle) {
            PaddleContact::Lost => {
                state.balls.remove(i);
                continue;
            }
            PaddleContact::Bounced => paddle_bounce = true,
            PaddleContact::Clear => {}
        }

        let hits = collision::resolve_bricks(ball, &mut state.bricks);
        ball.integrate();

        if !hits.is_empty() {
            apply_brick_hits(state, &hits);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
    }

    if wall_bounce {
        state.cue(AudioCue::BallWallBounce);
    }
    if paddle_bounce {
        state.cue(AudioCue::PaddleBounce);
    }
}

/// Score, effects and drops for bricks destroyed this frame
fn apply_brick_hits(state: &mut GameState, hits: &[BrickHit]) {
    for hit in hits {
        state.bricks_remaining = state.bricks_remaining.saturating_sub(1);
        state.events.push(GameEvent::BrickDestroyed {
            column: hit.column,
            row: hit.row,
            splash: hit.splash,
        });

        if hit.splash {
            state.award(SPLASH_SCORE);
            state.burst(hit.center, ParticleTint::Fire, SPLASH_PARTICLES);
        } else {
            state.award(BRICK_SCORE);
            state.cue(AudioCue::BrickBreak);
            state.burst(hit.center, ParticleTint::Row(hit.row as u8), BRICK_PARTICLES);
            roll_powerup_drop(state, hit.center);
        }
    }

    if state.bricks_remaining == 0 {
        begin_level_transition(state);
    }
}

fn roll_powerup_drop(state: &mut GameState, pos: Vec2) {
    if !state.rng.random_bool(POWERUP_PROBABILITY) {
        return;
    }
    let kind = PowerupKind::random(&mut state.rng);
    state.powerups.push(Powerup::new(kind, pos));
    state.events.push(GameEvent::PowerupSpawned { kind, pos });
}

/// Falling pickups: collect on paddle contact, drop off the bottom
fn step_powerups(state: &mut GameState) {
    let mut i = state.powerups.len();
    while i > 0 {
        i -= 1;
        if state.paddle.catches(&state.powerups[i]) {
            let kind = state.powerups.remove(i).kind;
            state.cue(AudioCue::PowerupPickup);
            state.events.push(GameEvent::PowerupCollected { kind });
            powerup::activate(state, kind);
        } else if state.powerups[i].pos.y > HEIGHT {
            state.powerups.remove(i);
        } else {
            let pickup = &mut state.powerups[i];
            pickup.pos.y += pickup.fall_speed;
        }
    }
}

/// Every ball is gone: spend a life or end the run
fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::LifeLost {
        lives_remaining: state.lives,
    });

    if state.lives > 0 {
        state.balls.push(Ball::at_start(state.ball_speed()));
        state.paddle.recenter();
        log::debug!("Life lost, {} remaining", state.lives);
    } else {
        state.phase = GamePhase::GameOver;
        state.scheduler.cancel(ScheduledEvent::Descent);
        state.cue(AudioCue::GameOver);
        state.events.push(GameEvent::GameOver {
            final_score: state.score,
        });
        log::info!(
            "Game over at level {} with score {}",
            state.level,
            state.score
        );
    }
}

fn begin_level_transition(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.scheduler.cancel(ScheduledEvent::Descent);
    state.phase = GamePhase::LevelTransition;
    state.transition_elapsed_ms = 0.0;
    state.cue(AudioCue::LevelComplete);
    state.events.push(GameEvent::LevelComplete { level: state.level });
    state.burst(
        Vec2::new(WIDTH / 2.0, HEIGHT / 2.0),
        ParticleTint::Firework(0),
        FIREWORK_PARTICLES,
    );
    state.scheduler.schedule(
        state.clock_ms + LEVEL_TRANSITION_MS,
        ScheduledEvent::FinishLevelTransition,
    );
    log::info!("Level {} complete, score {}", state.level, state.score);
}

fn finish_level_transition(state: &mut GameState) {
    let next = level::next_level(state.level);
    state.reset_level(next);
    state.phase = GamePhase::Playing;
    state.transition_elapsed_ms = 0.0;
    state.arm_descent();
    state.events.push(GameEvent::LevelStarted { level: next });
    log::info!("Level {} started", next);
}

/// Where the ball will cross the paddle line, folding in side-wall bounces
fn predict_landing_x(ball: &Ball) -> f32 {
    if ball.vel.y <= 0.0 {
        return ball.pos.x;
    }
    let frames = ((PADDLE_Y - ball.radius - ball.pos.y) / ball.vel.y).max(0.0);
    let span = (WIDTH - 2.0 * ball.radius).max(1.0);
    let period = 2.0 * span;
    let folded = (ball.pos.x + ball.vel.x * frames - ball.radius).rem_euclid(period);
    ball.radius + if folded > span { period - folded } else { folded }
}

/// Paddle target for idle/demo mode
///
/// Chases the lowest descending ball. When no ball is coming down in the
/// lower half, goes for the lowest falling power-up instead.
pub fn autopilot_target(state: &GameState) -> Option<f32> {
    let threat = state
        .balls
        .iter()
        .filter(|b| b.vel.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    // Small sway so the ball comes off different parts of the paddle
    let sway = (state.frame as f32 * 0.05).sin() * state.paddle.width * 0.3;

    if let Some(ball) = threat {
        if ball.pos.y > HEIGHT / 2.0 || state.powerups.is_empty() {
            return Some(predict_landing_x(ball) + sway);
        }
    }

    state
        .powerups
        .iter()
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|p| p.pos.x)
        .or_else(|| state.balls.first().map(|b| b.pos.x))
}
