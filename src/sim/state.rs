//! Game state and core simulation types
//!
//! Everything the frame driver needs to advance, render, or inspect the game
//! lives in [`GameState`]. There are no process-wide singletons.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level;
use super::powerup::{ActivePowerups, TimedPowerup};
use super::schedule::{ScheduledEvent, Scheduler};
use crate::consts::*;
use crate::hash01;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Physics, descent and power-up countdowns are frozen
    Paused,
    /// Level cleared, celebration running before the next level starts
    LevelTransition,
    /// Run ended, waiting for an external restart
    GameOver,
}

/// Named sound cues for the audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    BallWallBounce,
    PaddleBounce,
    BrickBreak,
    PowerupPickup,
    LevelComplete,
    GameOver,
}

/// Events emitted during a tick, drained by the rendering/audio layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    BrickDestroyed { column: usize, row: usize, splash: bool },
    ParticleBurst { pos: Vec2, tint: ParticleTint, count: u32 },
    PowerupSpawned { kind: PowerupKind, pos: Vec2 },
    PowerupCollected { kind: PowerupKind },
    PowerupExpired { kind: TimedPowerup },
    BricksDescended { descent_count: u32 },
    LifeLost { lives_remaining: u8 },
    LevelComplete { level: u32 },
    LevelStarted { level: u32 },
    GameOver { final_score: u64 },
    Sound(AudioCue),
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Velocity in pixels per frame
    pub vel: Vec2,
    pub radius: f32,
    /// Mega mode (enlarged, passes through bricks)
    pub mega: bool,
    /// Fire mode (splash-destroys neighbouring bricks)
    pub fire: bool,
    /// Recent positions, oldest first
    pub trail: Vec<Vec2>,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            mega: false,
            fire: false,
            trail: Vec::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Fresh ball at the serve position, heading up and to the right
    pub fn at_start(speed: f32) -> Self {
        Self::new(
            Vec2::new(BALL_START_X, BALL_START_Y),
            Vec2::new(speed, -speed),
        )
    }

    /// Record current position to the trail (call once per frame)
    pub fn record_trail(&mut self) {
        self.trail.push(self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.remove(0);
        }
    }

    /// Advance by one frame of velocity
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    pub fn set_mega(&mut self, mega: bool) {
        self.mega = mega;
        self.radius = if mega { MEGA_BALL_RADIUS } else { BALL_RADIUS };
    }
}

/// Axis-aligned paddle rectangle, as handed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The player's paddle (fixed height, moves horizontally along `PADDLE_Y`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    pub width: f32,
}

impl Paddle {
    /// Centered paddle of the given width
    pub fn new(width: f32) -> Self {
        Self {
            x: (WIDTH - width) / 2.0,
            width,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Geometric center, used as the magnet's anchor
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), PADDLE_Y + PADDLE_HEIGHT / 2.0)
    }

    pub fn rect(&self) -> PaddleRect {
        PaddleRect {
            x: self.x,
            y: PADDLE_Y,
            width: self.width,
            height: PADDLE_HEIGHT,
        }
    }

    /// Center the paddle on `target_x`, keeping it fully on-screen
    pub fn move_to(&mut self, target_x: f32) {
        self.x = (target_x - self.width / 2.0).clamp(0.0, (WIDTH - self.width).max(0.0));
    }

    /// Change width, keeping the left edge unless that would push it off-screen
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
        self.x = self.x.clamp(0.0, (WIDTH - width).max(0.0));
    }

    pub fn recenter(&mut self) {
        self.x = (WIDTH - self.width) / 2.0;
    }

    /// Whether a falling pickup touches the paddle
    pub fn catches(&self, powerup: &Powerup) -> bool {
        powerup.pos.y + powerup.radius >= PADDLE_Y
            && powerup.pos.y - powerup.radius <= HEIGHT - PADDLE_BOTTOM_MARGIN
            && powerup.pos.x >= self.x
            && powerup.pos.x <= self.right()
    }
}

/// Brick liveness (destroyed bricks never come back within a level)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickStatus {
    Alive,
    Destroyed,
}

/// A brick cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub column: usize,
    pub row: usize,
    /// Top-left corner
    pub pos: Vec2,
    pub status: BrickStatus,
}

impl Brick {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.status == BrickStatus::Alive
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(BRICK_WIDTH / 2.0, BRICK_HEIGHT / 2.0)
    }
}

/// Fixed-size brick grid, stored column-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickGrid {
    columns: usize,
    rows: usize,
    bricks: Vec<Brick>,
}

impl Default for BrickGrid {
    fn default() -> Self {
        Self::new(BRICK_COLUMNS, BRICK_ROWS)
    }
}

impl BrickGrid {
    /// Fully alive grid laid out from the top-left offset
    pub fn new(columns: usize, rows: usize) -> Self {
        let mut bricks = Vec::with_capacity(columns * rows);
        for column in 0..columns {
            for row in 0..rows {
                bricks.push(Brick {
                    column,
                    row,
                    pos: Vec2::new(
                        BRICK_OFFSET_LEFT + column as f32 * (BRICK_WIDTH + BRICK_PADDING),
                        BRICK_OFFSET_TOP + row as f32 * (BRICK_HEIGHT + BRICK_PADDING),
                    ),
                    status: BrickStatus::Alive,
                });
            }
        }
        Self {
            columns,
            rows,
            bricks,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn index(&self, column: usize, row: usize) -> Option<usize> {
        (column < self.columns && row < self.rows).then(|| column * self.rows + row)
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&Brick> {
        self.index(column, row).map(|i| &self.bricks[i])
    }

    /// Mark a brick destroyed. Returns false if it was already gone (or out of range).
    pub fn destroy(&mut self, column: usize, row: usize) -> bool {
        let Some(i) = self.index(column, row) else {
            return false;
        };
        let brick = &mut self.bricks[i];
        if brick.is_alive() {
            brick.status = BrickStatus::Destroyed;
            true
        } else {
            false
        }
    }

    /// Moore neighbourhood of a cell, clamped to the grid, excluding the cell itself
    pub fn neighbors(&self, column: usize, row: usize) -> Vec<(usize, usize)> {
        let mut cells = Vec::with_capacity(8);
        let last_column = self.columns.saturating_sub(1);
        let last_row = self.rows.saturating_sub(1);
        for nc in column.saturating_sub(1)..=(column + 1).min(last_column) {
            for nr in row.saturating_sub(1)..=(row + 1).min(last_row) {
                if (nc, nr) != (column, row) {
                    cells.push((nc, nr));
                }
            }
        }
        cells
    }

    /// Shift every alive brick down. Returns how many moved.
    pub fn descend(&mut self, dy: f32) -> usize {
        let mut moved = 0;
        for brick in self.bricks.iter_mut().filter(|b| b.is_alive()) {
            brick.pos.y += dy;
            moved += 1;
        }
        moved
    }

    pub fn alive_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.is_alive()).count()
    }

    /// All bricks in scan order (column by column, top to bottom)
    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn as_slice(&self) -> &[Brick] {
        &self.bricks
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    LongPaddle,
    MultiBall,
    MegaBall,
    FireBall,
    Magnetic,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 5] = [
        PowerupKind::LongPaddle,
        PowerupKind::MultiBall,
        PowerupKind::MegaBall,
        PowerupKind::FireBall,
        PowerupKind::Magnetic,
    ];

    /// Uniformly random kind
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub pos: Vec2,
    /// Fall speed in pixels per frame
    pub fall_speed: f32,
    pub radius: f32,
}

impl Powerup {
    pub fn new(kind: PowerupKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            fall_speed: POWERUP_FALL_SPEED,
            radius: POWERUP_RADIUS,
        }
    }
}

/// Particle coloring hint for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleTint {
    /// Brick row hue (row index)
    Row(u8),
    /// Fire-ball splash
    Fire,
    /// Level-complete fireworks (palette index)
    Firework(u8),
}

/// A particle for visual effects (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    /// 1.0 at spawn, removed at 0
    pub life: f32,
    pub decay: f32,
    pub size: f32,
    pub tint: ParticleTint,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 512;

/// Number of firework palette entries
pub const FIREWORK_COLORS: u8 = 8;

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG (drop rolls and power-up kinds only)
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    /// Simulation clock in milliseconds (advances while paused too)
    pub clock_ms: f64,
    /// Frame counter
    pub frame: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Current level (1-based)
    pub level: u32,
    pub bricks_remaining: u32,
    pub descent_count: u32,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: BrickGrid,
    pub powerups: Vec<Powerup>,
    /// Timed power-up effects
    pub effects: ActivePowerups,
    /// Deferred one-shot events (reversions, descent, level transition)
    pub scheduler: Scheduler,
    /// Time spent in the current level transition
    pub transition_elapsed_ms: f64,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Particle cap (lowered by settings)
    #[serde(skip, default = "default_particle_cap")]
    pub particle_cap: usize,
    /// Events produced by the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Burst counter, feeds particle jitter
    fx_seed: u32,
}

fn default_particle_cap() -> usize {
    MAX_PARTICLES
}

impl GameState {
    /// Create a new game at level 1 with the descent timer armed
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock_ms: 0.0,
            frame: 0,
            phase: GamePhase::Playing,
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            bricks_remaining: 0,
            descent_count: 0,
            paddle: Paddle::new(PADDLE_WIDTH_BASE),
            balls: Vec::new(),
            bricks: BrickGrid::default(),
            powerups: Vec::new(),
            effects: ActivePowerups::default(),
            scheduler: Scheduler::default(),
            transition_elapsed_ms: 0.0,
            particles: Vec::new(),
            particle_cap: MAX_PARTICLES,
            events: Vec::new(),
            fx_seed: seed as u32,
        };

        state.reset_level(1);
        state.arm_descent();
        log::info!("New game (seed {seed}), level 1");

        state
    }

    /// Rebuild grid, ball, paddle and power-up state for `level`
    ///
    /// Pending power-up reversions are cancelled; the effects they would undo
    /// are cleared here.
    pub fn reset_level(&mut self, level: u32) {
        self.level = level;
        self.paddle = Paddle::new(self.base_paddle_width());
        self.balls.clear();
        self.balls.push(Ball::at_start(self.ball_speed()));
        self.bricks = BrickGrid::default();
        self.bricks_remaining = self.bricks.alive_count() as u32;
        self.powerups.clear();
        self.particles.clear();
        self.descent_count = 0;
        self.effects = ActivePowerups::default();
        self.scheduler
            .cancel_where(|event| matches!(event, ScheduledEvent::Revert(_)));
    }

    /// Schedule the next brick descent one full interval from now
    pub fn arm_descent(&mut self) {
        self.scheduler
            .schedule(self.clock_ms + DESCENT_INTERVAL_MS, ScheduledEvent::Descent);
    }

    /// Ball speed for the current level
    pub fn ball_speed(&self) -> f32 {
        BALL_SPEED_BASE * level::config_for(self.level).speed_ratio
    }

    /// Paddle width for the current level without power-ups
    pub fn base_paddle_width(&self) -> f32 {
        PADDLE_WIDTH_BASE * level::config_for(self.level).paddle_ratio
    }

    pub fn award(&mut self, points: u64) {
        self.score += points;
        self.events.push(GameEvent::ScoreChanged { score: self.score });
    }

    pub fn cue(&mut self, cue: AudioCue) {
        self.events.push(GameEvent::Sound(cue));
    }

    /// Emit a particle burst event and spawn its particles
    pub fn burst(&mut self, pos: Vec2, tint: ParticleTint, count: u32) {
        self.events.push(GameEvent::ParticleBurst { pos, tint, count });
        self.fx_seed = self.fx_seed.wrapping_add(1);
        let seed = self.fx_seed.wrapping_mul(31337);
        let firework = matches!(tint, ParticleTint::Firework(_));
        let spread = if firework { 8.0 } else { 4.0 };

        for i in 0..count {
            if self.particles.len() >= self.particle_cap {
                if self.particle_cap == 0 {
                    return;
                }
                self.particles.remove(0);
            }
            let r1 = hash01(seed, i * 3);
            let r2 = hash01(seed, i * 3 + 1);
            let r3 = hash01(seed, i * 3 + 2);
            let tint = match tint {
                ParticleTint::Firework(_) => {
                    ParticleTint::Firework((r3 * FIREWORK_COLORS as f32) as u8 % FIREWORK_COLORS)
                }
                other => other,
            };
            let (gravity, decay, size) = if firework {
                (0.15, 0.015, r3 * 4.0 + 2.0)
            } else {
                (0.3, 0.02, r3 * 3.0 + 1.0)
            };
            let lift = if firework { 2.0 } else { 0.0 };
            self.particles.push(Particle {
                pos,
                vel: Vec2::new((r1 - 0.5) * spread, (r2 - 0.5) * spread - lift),
                gravity,
                life: 1.0,
                decay,
                size,
                tint,
            });
        }
    }

    /// Drop recorded ball trails (trails switched off in settings)
    pub fn clear_trails(&mut self) {
        for ball in self.balls.iter_mut() {
            ball.trail.clear();
        }
    }

    /// Advance particles by one frame
    pub fn update_particles(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.vel.y += particle.gravity;
            particle.life -= particle.decay;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_layout() {
        let state = GameState::new(1);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.bricks_remaining, 48);
        assert_eq!(state.balls[0].pos, Vec2::new(240.0, 668.0));
        assert_eq!(state.balls[0].vel, Vec2::new(4.0, -4.0));
        assert_eq!(state.paddle.x, 190.0);
        assert!(state.scheduler.is_pending(ScheduledEvent::Descent));
    }

    #[test]
    fn test_grid_positions() {
        let grid = BrickGrid::default();
        let first = grid.get(0, 0).unwrap();
        assert_eq!(first.pos, Vec2::new(15.0, 120.0));
        let last = grid.get(5, 7).unwrap();
        assert_eq!(last.pos, Vec2::new(15.0 + 5.0 * 75.0, 120.0 + 7.0 * 30.0));
        assert!(grid.get(6, 0).is_none());
        assert!(grid.get(0, 8).is_none());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut grid = BrickGrid::default();
        assert!(grid.destroy(2, 3));
        assert!(!grid.destroy(2, 3));
        assert!(!grid.destroy(9, 9));
        assert_eq!(grid.alive_count(), 47);
    }

    #[test]
    fn test_neighbors_clamped() {
        let grid = BrickGrid::default();
        assert_eq!(grid.neighbors(0, 0).len(), 3);
        assert_eq!(grid.neighbors(5, 7).len(), 3);
        assert_eq!(grid.neighbors(0, 4).len(), 5);
        let inner = grid.neighbors(2, 3);
        assert_eq!(inner.len(), 8);
        assert!(!inner.contains(&(2, 3)));
    }

    #[test]
    fn test_descend_skips_destroyed() {
        let mut grid = BrickGrid::default();
        grid.destroy(1, 1);
        let before = grid.get(1, 1).unwrap().pos.y;
        assert_eq!(grid.descend(30.0), 47);
        assert_eq!(grid.get(1, 1).unwrap().pos.y, before);
        assert_eq!(grid.get(0, 0).unwrap().pos.y, 150.0);
    }

    #[test]
    fn test_trail_is_bounded_most_recent_last() {
        let mut ball = Ball::at_start(4.0);
        for _ in 0..8 {
            ball.record_trail();
            ball.integrate();
        }
        assert_eq!(ball.trail.len(), TRAIL_LENGTH);
        let newest = *ball.trail.last().unwrap();
        assert_eq!(newest, ball.pos - ball.vel);
    }

    #[test]
    fn test_clear_trails() {
        let mut state = GameState::new(2);
        state.balls.push(Ball::at_start(4.0));
        for ball in state.balls.iter_mut() {
            ball.record_trail();
            ball.record_trail();
        }
        state.clear_trails();
        assert!(state.balls.iter().all(|b| b.trail.is_empty()));
        assert!(state.snapshot().balls.iter().all(|b| b.trail.is_empty()));
    }

    #[test]
    fn test_paddle_move_clamped() {
        let mut paddle = Paddle::new(100.0);
        paddle.move_to(-50.0);
        assert_eq!(paddle.x, 0.0);
        paddle.move_to(10_000.0);
        assert_eq!(paddle.x, WIDTH - 100.0);
        paddle.move_to(240.0);
        assert_eq!(paddle.center_x(), 240.0);
    }

    #[test]
    fn test_particle_cap() {
        let mut state = GameState::new(3);
        state.particle_cap = 20;
        state.burst(Vec2::new(100.0, 100.0), ParticleTint::Fire, 50);
        assert_eq!(state.particles.len(), 20);

        state.particle_cap = 0;
        state.particles.clear();
        state.burst(Vec2::ZERO, ParticleTint::Fire, 10);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particles_fade_out() {
        let mut state = GameState::new(3);
        state.burst(Vec2::new(100.0, 100.0), ParticleTint::Row(0), 15);
        for _ in 0..60 {
            state.update_particles();
        }
        assert!(state.particles.is_empty());
    }
}
