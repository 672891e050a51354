//! Power-up lifecycle: activation, countdown and reversion
//!
//! Timed effects keep exactly one pending reversion each. Reactivating an
//! active effect cancels its pending reversion and re-arms the full duration.
//! MultiBall is instantaneous and never arms anything.

use serde::{Deserialize, Serialize};

use super::schedule::ScheduledEvent;
use super::state::{Ball, GameEvent, GameState, PowerupKind};
use crate::consts::*;
use crate::rotate;

/// Power-ups that stay active for a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedPowerup {
    LongPaddle,
    MegaBall,
    FireBall,
    Magnetic,
}

impl TimedPowerup {
    pub const ALL: [TimedPowerup; 4] = [
        TimedPowerup::LongPaddle,
        TimedPowerup::MegaBall,
        TimedPowerup::FireBall,
        TimedPowerup::Magnetic,
    ];

    pub fn duration_ms(self) -> f64 {
        match self {
            TimedPowerup::LongPaddle => LONG_PADDLE_DURATION_MS,
            TimedPowerup::MegaBall => MEGA_BALL_DURATION_MS,
            TimedPowerup::FireBall => FIRE_BALL_DURATION_MS,
            TimedPowerup::Magnetic => MAGNETIC_DURATION_MS,
        }
    }

    pub fn from_kind(kind: PowerupKind) -> Option<Self> {
        match kind {
            PowerupKind::LongPaddle => Some(TimedPowerup::LongPaddle),
            PowerupKind::MegaBall => Some(TimedPowerup::MegaBall),
            PowerupKind::FireBall => Some(TimedPowerup::FireBall),
            PowerupKind::Magnetic => Some(TimedPowerup::Magnetic),
            PowerupKind::MultiBall => None,
        }
    }
}

/// Countdown for one timed effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectTimer {
    pub active: bool,
    pub remaining_ms: f64,
}

/// Progress of one active effect, for HUD bars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerupProgress {
    pub kind: TimedPowerup,
    /// remaining / duration, in [0, 1]
    pub ratio: f32,
}

/// Active power-up effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivePowerups {
    pub long_paddle: EffectTimer,
    pub mega_ball: EffectTimer,
    pub fire_ball: EffectTimer,
    pub magnetic: EffectTimer,
}

impl ActivePowerups {
    pub fn timer(&self, kind: TimedPowerup) -> &EffectTimer {
        match kind {
            TimedPowerup::LongPaddle => &self.long_paddle,
            TimedPowerup::MegaBall => &self.mega_ball,
            TimedPowerup::FireBall => &self.fire_ball,
            TimedPowerup::Magnetic => &self.magnetic,
        }
    }

    pub fn timer_mut(&mut self, kind: TimedPowerup) -> &mut EffectTimer {
        match kind {
            TimedPowerup::LongPaddle => &mut self.long_paddle,
            TimedPowerup::MegaBall => &mut self.mega_ball,
            TimedPowerup::FireBall => &mut self.fire_ball,
            TimedPowerup::Magnetic => &mut self.magnetic,
        }
    }

    pub fn is_active(&self, kind: TimedPowerup) -> bool {
        self.timer(kind).active
    }

    /// Tick down active timers, floored at zero
    pub fn countdown(&mut self, dt_ms: f64) {
        for kind in TimedPowerup::ALL {
            let timer = self.timer_mut(kind);
            if timer.active {
                timer.remaining_ms = (timer.remaining_ms - dt_ms).max(0.0);
            }
        }
    }

    /// Progress ratios of the active effects
    pub fn progress(&self) -> Vec<PowerupProgress> {
        TimedPowerup::ALL
            .into_iter()
            .filter(|&kind| self.is_active(kind))
            .map(|kind| PowerupProgress {
                kind,
                ratio: (self.timer(kind).remaining_ms / kind.duration_ms()).clamp(0.0, 1.0) as f32,
            })
            .collect()
    }
}

/// Apply a collected power-up
pub fn activate(state: &mut GameState, kind: PowerupKind) {
    log::debug!("Power-up {:?} at level {}", kind, state.level);
    match TimedPowerup::from_kind(kind) {
        Some(timed) => {
            apply(state, timed);
            arm(state, timed);
        }
        None => {
            if !state.balls.is_empty() {
                split_multiball(state, 0);
            }
        }
    }
}

/// Immediate effect of a timed power-up
fn apply(state: &mut GameState, kind: TimedPowerup) {
    match kind {
        TimedPowerup::LongPaddle => {
            let width = state.base_paddle_width() * 2.0;
            state.paddle.set_width(width);
        }
        TimedPowerup::MegaBall => {
            for ball in state.balls.iter_mut() {
                ball.set_mega(true);
            }
        }
        TimedPowerup::FireBall => {
            for ball in state.balls.iter_mut() {
                ball.fire = true;
            }
        }
        // Attraction is applied by the physics pass while the timer is active
        TimedPowerup::Magnetic => {}
    }
}

/// Cancel-and-replace the reversion for `kind`, restarting the full duration
fn arm(state: &mut GameState, kind: TimedPowerup) {
    state.scheduler.cancel(ScheduledEvent::Revert(kind));
    let duration = kind.duration_ms();
    *state.effects.timer_mut(kind) = EffectTimer {
        active: true,
        remaining_ms: duration,
    };
    state
        .scheduler
        .schedule(state.clock_ms + duration, ScheduledEvent::Revert(kind));
}

/// Undo a timed power-up against whatever state exists now
pub fn revert(state: &mut GameState, kind: TimedPowerup) {
    match kind {
        TimedPowerup::LongPaddle => {
            // Recompute from the current level so a level change can't leave a stale width
            let width = state.base_paddle_width();
            state.paddle.set_width(width);
        }
        TimedPowerup::MegaBall => {
            for ball in state.balls.iter_mut() {
                ball.set_mega(false);
            }
        }
        TimedPowerup::FireBall => {
            for ball in state.balls.iter_mut() {
                ball.fire = false;
            }
        }
        TimedPowerup::Magnetic => {}
    }
    *state.effects.timer_mut(kind) = EffectTimer::default();
    state.events.push(GameEvent::PowerupExpired { kind });
    log::debug!("Power-up {:?} expired", kind);
}

/// Spawn two children at the source ball, velocity rotated ±30°
fn split_multiball(state: &mut GameState, source: usize) {
    let Some(parent) = state.balls.get(source) else {
        return;
    };
    let children = [MULTIBALL_SPLIT_ANGLE, -MULTIBALL_SPLIT_ANGLE].map(|angle| Ball {
        pos: parent.pos,
        vel: rotate(parent.vel, angle),
        radius: parent.radius,
        mega: parent.mega,
        fire: parent.fire,
        trail: Vec::new(),
    });
    state.balls.extend(children);
}
