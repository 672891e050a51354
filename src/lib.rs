//! Brickfall - A portrait brick-breaker arcade game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (physics, collisions, power-ups, game state)
//! - `settings`: Player preferences
//! - `audio`: Procedural Web Audio cues (wasm only)
//! - `web`: Browser frame driver exported through wasm-bindgen (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (portrait)
    pub const WIDTH: f32 = 480.0;
    pub const HEIGHT: f32 = 768.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH_BASE: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    /// Gap between the paddle's bottom edge and the bottom of the playfield
    pub const PADDLE_BOTTOM_MARGIN: f32 = 10.0;
    /// Y coordinate of the paddle's top edge
    pub const PADDLE_Y: f32 = HEIGHT - PADDLE_HEIGHT - PADDLE_BOTTOM_MARGIN;
    /// Horizontal deflection added at the paddle's outer edge
    pub const PADDLE_DEFLECTION: f32 = 2.0;

    /// Ball defaults (velocities are in pixels per frame)
    pub const BALL_RADIUS: f32 = 8.0;
    pub const MEGA_BALL_RADIUS: f32 = 24.0;
    pub const BALL_SPEED_BASE: f32 = 4.0;
    pub const BALL_START_X: f32 = WIDTH / 2.0;
    pub const BALL_START_Y: f32 = HEIGHT - 100.0;
    /// Number of trail points kept per ball
    pub const TRAIL_LENGTH: usize = 5;
    /// Multi-ball split angle (30 degrees)
    pub const MULTIBALL_SPLIT_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

    /// Brick grid layout
    pub const BRICK_COLUMNS: usize = 6;
    pub const BRICK_ROWS: usize = 8;
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 25.0;
    pub const BRICK_PADDING: f32 = 5.0;
    pub const BRICK_OFFSET_TOP: f32 = 120.0;
    pub const BRICK_OFFSET_LEFT: f32 = 15.0;

    /// Scoring
    pub const BRICK_SCORE: u64 = 10;
    pub const SPLASH_SCORE: u64 = 5;
    pub const STARTING_LIVES: u8 = 3;

    /// Power-ups
    pub const POWERUP_PROBABILITY: f64 = 0.15;
    pub const POWERUP_RADIUS: f32 = 12.0;
    pub const POWERUP_FALL_SPEED: f32 = 2.0;
    pub const LONG_PADDLE_DURATION_MS: f64 = 15_000.0;
    pub const MEGA_BALL_DURATION_MS: f64 = 10_000.0;
    pub const FIRE_BALL_DURATION_MS: f64 = 12_000.0;
    pub const MAGNETIC_DURATION_MS: f64 = 10_000.0;
    pub const MAGNETIC_RANGE: f32 = 150.0;
    pub const MAGNETIC_FORCE: f32 = 0.8;

    /// Brick descent
    pub const DESCENT_INTERVAL_MS: f64 = 30_000.0;
    pub const DESCENT_RETRY_MS: f64 = 1_000.0;
    pub const MAX_DESCENT: u32 = 3;

    /// Level-complete celebration length
    pub const LEVEL_TRANSITION_MS: f64 = 3_000.0;

    /// Particle burst sizes
    pub const BRICK_PARTICLES: u32 = 15;
    pub const SPLASH_PARTICLES: u32 = 10;
    pub const FIREWORK_PARTICLES: u32 = 80;

    /// Nominal frame length at 60 Hz
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Rotate a vector by `angle` radians (counter-clockwise in math coordinates)
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Cheap deterministic hash in `[0, 1)` for visual-only jitter
#[inline]
pub fn hash01(seed: u32, salt: u32) -> f32 {
    let hash = seed.wrapping_mul(2654435761).wrapping_add(salt.wrapping_mul(7919));
    let hash = hash ^ (hash >> 15);
    (hash % 1000) as f32 / 1000.0
}
