use std::collections::HashSet;

use brickfall::consts::*;
use brickfall::sim::collision::{resolve_bricks, resolve_walls};
use brickfall::sim::powerup::activate;
use brickfall::sim::{Ball, BrickGrid, GameState, Paddle, PowerupKind, ScheduledEvent, TimedPowerup};
use glam::Vec2;
use proptest::prelude::*;

proptest! {
    #[test]
    fn ball_stays_inside_side_walls(
        x in BALL_RADIUS..=(WIDTH - BALL_RADIUS),
        y in 100.0f32..700.0,
        dx in -12.0f32..=12.0,
        dy in -12.0f32..=12.0,
    ) {
        let mut ball = Ball::new(Vec2::new(x, y), Vec2::new(dx, dy));
        resolve_walls(&mut ball);
        ball.integrate();
        prop_assert!(ball.pos.x >= 0.0 && ball.pos.x <= WIDTH);
        prop_assert!(ball.pos.y >= 0.0);
    }

    #[test]
    fn brick_destruction_is_idempotent(cells in prop::collection::vec((0usize..8, 0usize..10), 0..100)) {
        let mut grid = BrickGrid::default();
        let mut seen = HashSet::new();
        let mut destroyed = 0;
        for (column, row) in cells {
            let first = column < BRICK_COLUMNS && row < BRICK_ROWS && seen.insert((column, row));
            prop_assert_eq!(grid.destroy(column, row), first);
            if first {
                destroyed += 1;
            }
        }
        prop_assert_eq!(grid.alive_count(), BRICK_COLUMNS * BRICK_ROWS - destroyed);
    }

    #[test]
    fn fire_splash_never_repeats_or_leaves_grid(
        column in 0usize..BRICK_COLUMNS,
        row in 0usize..BRICK_ROWS,
        holes in prop::collection::vec((0usize..BRICK_COLUMNS, 0usize..BRICK_ROWS), 0..20),
        mega in any::<bool>(),
    ) {
        let mut grid = BrickGrid::default();
        for (c, r) in holes {
            if (c, r) != (column, row) {
                grid.destroy(c, r);
            }
        }
        let alive_before = grid.alive_count();
        let center = grid.get(column, row).map(|b| b.center()).unwrap_or_default();

        let mut ball = Ball::new(center, Vec2::new(0.0, -4.0));
        ball.fire = true;
        ball.set_mega(mega);
        let hits = resolve_bricks(&mut ball, &mut grid);

        let cells: HashSet<_> = hits.iter().map(|h| (h.column, h.row)).collect();
        prop_assert_eq!(cells.len(), hits.len());
        prop_assert!(hits.iter().all(|h| h.column < BRICK_COLUMNS && h.row < BRICK_ROWS));
        prop_assert_eq!(grid.alive_count(), alive_before - hits.len());
        prop_assert!(hits.iter().any(|h| !h.splash));
    }

    #[test]
    fn long_paddle_never_stacks(gaps in prop::collection::vec(0.0f64..20_000.0, 1..6)) {
        let mut state = GameState::new(11);
        let base = state.base_paddle_width();
        for gap in gaps {
            state.clock_ms += gap;
            state.effects.countdown(gap);
            activate(&mut state, PowerupKind::LongPaddle);
            prop_assert_eq!(state.paddle.width, base * 2.0);
            prop_assert_eq!(state.effects.long_paddle.remaining_ms, LONG_PADDLE_DURATION_MS);
            prop_assert_eq!(
                state.scheduler.due_at(ScheduledEvent::Revert(TimedPowerup::LongPaddle)),
                Some(state.clock_ms + LONG_PADDLE_DURATION_MS)
            );
        }
        prop_assert_eq!(state.scheduler.len(), 2); // revert + descent
    }

    #[test]
    fn paddle_stays_on_screen(width in 40.0f32..=200.0, target in -500.0f32..1000.0) {
        let mut paddle = Paddle::new(width);
        paddle.move_to(target);
        prop_assert!(paddle.x >= 0.0);
        prop_assert!(paddle.right() <= WIDTH + 1e-3);
    }
}
