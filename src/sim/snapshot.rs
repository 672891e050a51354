//! Read-only render contract handed to the drawing layer each frame

use serde::Serialize;

use super::powerup::PowerupProgress;
use super::state::{Ball, Brick, GamePhase, GameState, PaddleRect, Particle, Powerup};
use crate::consts::LEVEL_TRANSITION_MS;

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub bricks_remaining: u32,
    pub balls: &'a [Ball],
    pub bricks: &'a [Brick],
    pub paddle: PaddleRect,
    pub powerups: &'a [Powerup],
    pub particles: &'a [Particle],
    /// Active timed effects with remaining/duration ratios
    pub effects: Vec<PowerupProgress>,
    /// 0..1 through the level-complete celebration, when it is running
    pub transition_progress: Option<f32>,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot<'_> {
        let transition_progress = (self.phase == GamePhase::LevelTransition)
            .then(|| (self.transition_elapsed_ms / LEVEL_TRANSITION_MS).clamp(0.0, 1.0) as f32);

        Snapshot {
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            level: self.level,
            bricks_remaining: self.bricks_remaining,
            balls: &self.balls,
            bricks: self.bricks.as_slice(),
            paddle: self.paddle.rect(),
            powerups: &self.powerups,
            particles: &self.particles,
            effects: self.effects.progress(),
            transition_progress,
        }
    }
}
