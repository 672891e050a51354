//! Collision detection and response for the rectangular playfield
//!
//! Pure geometry over balls, the paddle and the brick grid. Scoring, events
//! and power-up drops are applied by `tick` from the returned hit lists.

use glam::Vec2;

use super::state::{Ball, Brick, BrickGrid, Paddle};
use crate::consts::*;

/// Outcome of the paddle pass for one ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleContact {
    /// Ball is above the paddle line, or passing beside the paddle
    Clear,
    /// Ball bounced off the paddle
    Bounced,
    /// Ball left through the bottom of the playfield
    Lost,
}

/// A destroyed brick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickHit {
    pub column: usize,
    pub row: usize,
    pub center: Vec2,
    /// Destroyed by fire-ball splash rather than direct contact
    pub splash: bool,
}

/// Attraction strength at `distance` from the paddle center
///
/// Linear falloff from `MAGNETIC_FORCE` at the paddle to zero at `MAGNETIC_RANGE`.
#[inline]
pub fn magnetic_strength(distance: f32) -> f32 {
    if distance >= MAGNETIC_RANGE {
        0.0
    } else {
        (1.0 - distance / MAGNETIC_RANGE) * MAGNETIC_FORCE
    }
}

/// Velocity change pulling a ball toward the paddle, if it is in range
///
/// Only balls in the lower half of the playfield are attracted.
pub fn magnetic_force(ball_pos: Vec2, paddle_center: Vec2) -> Option<Vec2> {
    if ball_pos.y <= HEIGHT / 2.0 {
        return None;
    }
    let to_paddle = paddle_center - ball_pos;
    let distance = to_paddle.length();
    if distance >= MAGNETIC_RANGE {
        return None;
    }
    Some(to_paddle.normalize_or_zero() * magnetic_strength(distance))
}

pub fn apply_magnetic(ball: &mut Ball, paddle_center: Vec2) {
    if let Some(force) = magnetic_force(ball.pos, paddle_center) {
        ball.vel += force;
    }
}

/// Reflect off the side and top walls, looking one frame ahead
///
/// Returns true if the ball bounced.
pub fn resolve_walls(ball: &mut Ball) -> bool {
    let next = ball.pos + ball.vel;
    let mut bounced = false;

    if next.x > WIDTH - ball.radius {
        ball.vel.x = -ball.vel.x.abs();
        ball.pos.x = WIDTH - ball.radius;
        bounced = true;
    } else if next.x < ball.radius {
        ball.vel.x = ball.vel.x.abs();
        ball.pos.x = ball.radius;
        bounced = true;
    }

    if next.y < ball.radius {
        ball.vel.y = ball.vel.y.abs();
        ball.pos.y = ball.radius;
        bounced = true;
    }

    bounced
}

/// Paddle bounce with aim control, or loss through the bottom
pub fn resolve_paddle(ball: &mut Ball, paddle: &Paddle) -> PaddleContact {
    if ball.pos.y + ball.radius < PADDLE_Y {
        return PaddleContact::Clear;
    }

    if ball.pos.x >= paddle.x && ball.pos.x <= paddle.right() && ball.vel.y > 0.0 {
        ball.vel.y = -ball.vel.y.abs();
        ball.pos.y = PADDLE_Y - ball.radius;

        // Normalize hit position: 0 = center, -1/+1 = edges
        let half_width = paddle.width / 2.0;
        let hit_offset = if half_width > 0.0 {
            ((ball.pos.x - paddle.center_x()) / half_width).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        ball.vel.x += hit_offset * PADDLE_DEFLECTION;
        PaddleContact::Bounced
    } else if ball.pos.y > HEIGHT {
        PaddleContact::Lost
    } else {
        PaddleContact::Clear
    }
}

/// Bounding-box overlap between a ball and a brick
#[inline]
pub fn ball_brick_overlap(ball_pos: Vec2, ball_radius: f32, brick: &Brick) -> bool {
    ball_pos.x + ball_radius > brick.pos.x
        && ball_pos.x - ball_radius < brick.pos.x + BRICK_WIDTH
        && ball_pos.y + ball_radius > brick.pos.y
        && ball_pos.y - ball_radius < brick.pos.y + BRICK_HEIGHT
}

/// Flip the velocity axis the ball most likely came in on
///
/// If last frame's position was horizontally outside the brick the hit is
/// treated as a side hit, otherwise as a top/bottom hit.
pub fn reflect_off_brick(ball: &mut Ball, brick_pos: Vec2) {
    let prev = ball.pos - ball.vel;
    if prev.x <= brick_pos.x || prev.x >= brick_pos.x + BRICK_WIDTH {
        ball.vel.x = -ball.vel.x;
    } else {
        ball.vel.y = -ball.vel.y;
    }
}

/// Scan the grid and destroy what the ball touches
///
/// Normal balls stop at the first brick and reflect. Mega balls keep scanning
/// and never reflect. Fire balls also take out the alive Moore neighbours of
/// each brick they hit.
pub fn resolve_bricks(ball: &mut Ball, grid: &mut BrickGrid) -> Vec<BrickHit> {
    let mut hits = Vec::new();

    for column in 0..grid.columns() {
        for row in 0..grid.rows() {
            let Some(brick) = grid.get(column, row) else {
                continue;
            };
            if !brick.is_alive() || !ball_brick_overlap(ball.pos, ball.radius, brick) {
                continue;
            }
            let brick_pos = brick.pos;
            let center = brick.center();

            if !grid.destroy(column, row) {
                continue;
            }
            hits.push(BrickHit {
                column,
                row,
                center,
                splash: false,
            });

            if ball.fire {
                for (nc, nr) in grid.neighbors(column, row) {
                    let Some(neighbor_center) = grid.get(nc, nr).map(Brick::center) else {
                        continue;
                    };
                    if grid.destroy(nc, nr) {
                        hits.push(BrickHit {
                            column: nc,
                            row: nr,
                            center: neighbor_center,
                            splash: true,
                        });
                    }
                }
            }

            if !ball.mega {
                reflect_off_brick(ball, brick_pos);
                return hits;
            }
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(x: f32, y: f32, dx: f32, dy: f32) -> Ball {
        Ball::new(Vec2::new(x, y), Vec2::new(dx, dy))
    }

    #[test]
    fn test_right_wall_reflects_and_clamps() {
        let mut ball = ball_at(470.0, 400.0, 4.0, 4.0);
        assert!(resolve_walls(&mut ball));
        assert_eq!(ball.vel.x, -4.0);
        assert_eq!(ball.pos.x, WIDTH - BALL_RADIUS);
    }

    #[test]
    fn test_left_wall_reflects_and_clamps() {
        let mut ball = ball_at(10.0, 400.0, -4.0, 4.0);
        assert!(resolve_walls(&mut ball));
        assert_eq!(ball.vel.x, 4.0);
        assert_eq!(ball.pos.x, BALL_RADIUS);
    }

    #[test]
    fn test_top_wall_reflects() {
        let mut ball = ball_at(200.0, 10.0, 4.0, -4.0);
        assert!(resolve_walls(&mut ball));
        assert_eq!(ball.vel.y, 4.0);
        assert_eq!(ball.pos.y, BALL_RADIUS);
    }

    #[test]
    fn test_no_wall_contact_midfield() {
        let mut ball = ball_at(240.0, 400.0, 4.0, -4.0);
        assert!(!resolve_walls(&mut ball));
        assert_eq!(ball.vel, Vec2::new(4.0, -4.0));
    }

    #[test]
    fn test_paddle_center_hit_goes_straight_up() {
        let paddle = Paddle::new(100.0);
        let mut ball = ball_at(240.0, PADDLE_Y - 4.0, 0.0, 4.0);
        assert_eq!(resolve_paddle(&mut ball, &paddle), PaddleContact::Bounced);
        assert_eq!(ball.vel, Vec2::new(0.0, -4.0));
        assert_eq!(ball.pos.y, PADDLE_Y - BALL_RADIUS);
    }

    #[test]
    fn test_paddle_edge_hit_deflects() {
        let paddle = Paddle::new(100.0);
        let mut right = ball_at(paddle.right(), PADDLE_Y, 0.0, 4.0);
        resolve_paddle(&mut right, &paddle);
        assert!((right.vel.x - PADDLE_DEFLECTION).abs() < 1e-5);

        let mut left = ball_at(paddle.x + 25.0, PADDLE_Y, 1.0, 4.0);
        resolve_paddle(&mut left, &paddle);
        assert!((left.vel.x - 0.0).abs() < 1e-5);
    }

    #[test]
    fn test_paddle_ignores_upward_ball() {
        let paddle = Paddle::new(100.0);
        let mut ball = ball_at(240.0, PADDLE_Y, 0.0, -4.0);
        assert_eq!(resolve_paddle(&mut ball, &paddle), PaddleContact::Clear);
        assert_eq!(ball.vel.y, -4.0);
    }

    #[test]
    fn test_ball_lost_below_bottom() {
        let paddle = Paddle::new(100.0);
        let mut ball = ball_at(20.0, HEIGHT + 1.0, 0.0, 4.0);
        assert_eq!(resolve_paddle(&mut ball, &paddle), PaddleContact::Lost);

        let mut beside = ball_at(20.0, PADDLE_Y + 5.0, 0.0, 4.0);
        assert_eq!(resolve_paddle(&mut beside, &paddle), PaddleContact::Clear);
    }

    #[test]
    fn test_magnetic_only_in_lower_half() {
        let paddle = Paddle::new(100.0);
        let center = paddle.center();
        assert!(magnetic_force(Vec2::new(center.x, HEIGHT / 2.0 - 1.0), center).is_none());
        assert!(magnetic_force(Vec2::new(center.x, center.y - 200.0), center).is_none());

        let force = magnetic_force(Vec2::new(center.x, center.y - 75.0), center).unwrap();
        assert!(force.y > 0.0);
        assert!((force.length() - 0.4).abs() < 1e-4);
    }

    #[test]
    fn test_magnetic_strength_falloff() {
        assert!((magnetic_strength(0.0) - MAGNETIC_FORCE).abs() < 1e-6);
        assert!(magnetic_strength(149.9) < 0.001);
        assert_eq!(magnetic_strength(150.0), 0.0);
    }

    #[test]
    fn test_brick_hit_from_below_flips_dy() {
        let mut grid = BrickGrid::default();
        let brick = grid.get(0, 7).unwrap().clone();
        let mut ball = ball_at(brick.center().x, brick.pos.y + BRICK_HEIGHT + 4.0, 1.0, -4.0);

        let hits = resolve_bricks(&mut ball, &mut grid);
        assert_eq!(hits.len(), 1);
        assert_eq!((hits[0].column, hits[0].row), (0, 7));
        assert_eq!(ball.vel, Vec2::new(1.0, 4.0));
    }

    #[test]
    fn test_brick_hit_from_side_flips_dx() {
        let mut grid = BrickGrid::default();
        let brick = grid.get(1, 7).unwrap().clone();
        // Previous position on the brick's left edge
        let mut ball = ball_at(brick.pos.x + 4.0, brick.center().y + 8.0, 4.0, 1.0);
        let hits = resolve_bricks(&mut ball, &mut grid);
        assert_eq!(hits.len(), 1);
        assert_eq!((hits[0].column, hits[0].row), (1, 7));
        assert_eq!(ball.vel.x, -4.0);
        assert_eq!(ball.vel.y, 1.0);
    }

    #[test]
    fn test_mega_ball_passes_through_several() {
        let mut grid = BrickGrid::default();
        let a = grid.get(2, 7).unwrap().clone();
        let mut ball = ball_at(a.pos.x + BRICK_WIDTH + BRICK_PADDING / 2.0, a.center().y, 0.0, -4.0);
        ball.set_mega(true);

        let hits = resolve_bricks(&mut ball, &mut grid);
        assert!(hits.len() >= 2);
        assert_eq!(ball.vel, Vec2::new(0.0, -4.0));
    }

    #[test]
    fn test_fire_splash_stays_in_grid() {
        let mut grid = BrickGrid::default();
        let corner = grid.get(0, 0).unwrap().clone();
        let mut ball = ball_at(corner.center().x, corner.center().y, 0.0, -4.0);
        ball.fire = true;

        let hits = resolve_bricks(&mut ball, &mut grid);
        assert_eq!(hits.len(), 4);
        assert_eq!(hits.iter().filter(|h| h.splash).count(), 3);
        assert_eq!(grid.alive_count(), 44);
    }

    #[test]
    fn test_fire_splash_skips_destroyed_neighbors() {
        let mut grid = BrickGrid::default();
        grid.destroy(1, 2);
        grid.destroy(3, 4);
        let target = grid.get(2, 3).unwrap().clone();
        let mut ball = ball_at(target.center().x, target.center().y, 0.0, -4.0);
        ball.fire = true;

        let hits = resolve_bricks(&mut ball, &mut grid);
        assert_eq!(hits.len(), 7);
        let mut cells: Vec<_> = hits.iter().map(|h| (h.column, h.row)).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 7);
    }
}
