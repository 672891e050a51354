//! Per-level difficulty table

use serde::{Deserialize, Serialize};

/// Speed and paddle scaling for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Multiplier on the base ball speed
    pub speed_ratio: f32,
    /// Multiplier on the base paddle width
    pub paddle_ratio: f32,
}

/// Indexed by level. Entry 0 mirrors level 1 and is never played.
pub const LEVEL_CONFIGS: [LevelConfig; 6] = [
    LevelConfig { speed_ratio: 1.0, paddle_ratio: 1.0 },
    LevelConfig { speed_ratio: 1.0, paddle_ratio: 1.0 },
    LevelConfig { speed_ratio: 1.1, paddle_ratio: 0.95 },
    LevelConfig { speed_ratio: 1.2, paddle_ratio: 0.9 },
    LevelConfig { speed_ratio: 1.3, paddle_ratio: 0.85 },
    LevelConfig { speed_ratio: 1.4, paddle_ratio: 0.8 },
];

/// Number of playable levels before wrapping back to 1
pub const LEVEL_COUNT: u32 = (LEVEL_CONFIGS.len() - 1) as u32;

/// Config for a level; out-of-range levels use the hardest entry
pub fn config_for(level: u32) -> LevelConfig {
    LEVEL_CONFIGS
        .get(level as usize)
        .copied()
        .unwrap_or(LEVEL_CONFIGS[LEVEL_CONFIGS.len() - 1])
}

/// Level that follows `level` (1-based, wraps after the last configured level)
pub fn next_level(level: u32) -> u32 {
    level % LEVEL_COUNT + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_zero_mirrors_level_one() {
        assert_eq!(config_for(0), config_for(1));
    }

    #[test]
    fn test_out_of_range_uses_last() {
        assert_eq!(config_for(99), LEVEL_CONFIGS[5]);
    }

    #[test]
    fn test_next_level_wraps() {
        assert_eq!(next_level(1), 2);
        assert_eq!(next_level(4), 5);
        assert_eq!(next_level(5), 1);
    }

    #[test]
    fn test_difficulty_ramps() {
        for pair in LEVEL_CONFIGS[1..].windows(2) {
            assert!(pair[1].speed_ratio > pair[0].speed_ratio);
            assert!(pair[1].paddle_ratio < pair[0].paddle_ratio);
        }
    }
}
