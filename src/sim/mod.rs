//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay platform-free:
//! - Advances only through `tick`, once per frame
//! - Seeded RNG only
//! - Timed actions go through the scheduler, never through callbacks
//! - No rendering or audio dependencies

pub mod collision;
pub mod level;
pub mod powerup;
pub mod schedule;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{BrickHit, PaddleContact};
pub use level::{LevelConfig, config_for, next_level};
pub use powerup::{ActivePowerups, PowerupProgress, TimedPowerup};
pub use schedule::{ScheduledEvent, Scheduler};
pub use snapshot::Snapshot;
pub use state::{
    AudioCue, Ball, Brick, BrickGrid, BrickStatus, GameEvent, GamePhase, GameState, Paddle,
    Particle, ParticleTint, Powerup, PowerupKind,
};
pub use tick::{TickInput, autopilot_target, tick};
