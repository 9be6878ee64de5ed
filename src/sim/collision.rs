//! Collision detection and response
//!
//! Everything is an axis-aligned bounding-box overlap test: the ball is
//! treated as its bounding box, and a hit resolves against whichever axis
//! has the smaller overlap.

use glam::Vec2;

use super::rect::Aabb;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, MAX_BOUNCE_ANGLE};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between the ball and a rectangle
///
/// Overlap is measured per axis; the axis with the smaller overlap decides
/// whether the bounce is horizontal or vertical, and which face was hit is
/// decided by which side the overlap is smaller on.
pub fn ball_rect_collision(ball_pos: Vec2, ball_radius: f32, rect: &Aabb) -> CollisionResult {
    let ball_box = Aabb::from_circle(ball_pos, ball_radius);
    if !ball_box.overlaps(rect) {
        return CollisionResult::miss();
    }

    // Overlap past each face of the rectangle
    let left = ball_box.max.x - rect.min.x;
    let right = rect.max.x - ball_box.min.x;
    let top = ball_box.max.y - rect.min.y;
    let bottom = rect.max.y - ball_box.min.y;

    let overlap_x = left.min(right);
    let overlap_y = top.min(bottom);

    if overlap_x < overlap_y {
        // Horizontal bounce
        let (normal, face_x) = if left < right {
            (Vec2::new(-1.0, 0.0), rect.min.x)
        } else {
            (Vec2::new(1.0, 0.0), rect.max.x)
        };
        CollisionResult {
            hit: true,
            point: Vec2::new(face_x, ball_pos.y.clamp(rect.min.y, rect.max.y)),
            normal,
            penetration: overlap_x,
        }
    } else {
        // Vertical bounce (-y is up in playfield coordinates)
        let (normal, face_y) = if top < bottom {
            (Vec2::new(0.0, -1.0), rect.min.y)
        } else {
            (Vec2::new(0.0, 1.0), rect.max.y)
        };
        CollisionResult {
            hit: true,
            point: Vec2::new(ball_pos.x.clamp(rect.min.x, rect.max.x), face_y),
            normal,
            penetration: overlap_y,
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce direction off the paddle face
///
/// `hit_offset` is the normalized contact position: 0 = paddle center
/// (straight up), ±1 = paddle edges (steepest angle). Speed is preserved and
/// the result always points upward.
pub fn paddle_deflect(hit_offset: f32, speed: f32) -> Vec2 {
    let angle = hit_offset.clamp(-1.0, 1.0) * MAX_BOUNCE_ANGLE;
    Vec2::new(angle.sin(), -angle.cos()) * speed
}

/// Check collision with the left/right/top playfield walls
pub fn ball_wall_collision(ball_pos: Vec2, ball_radius: f32) -> CollisionResult {
    if ball_pos.x - ball_radius < 0.0 {
        return CollisionResult {
            hit: true,
            point: Vec2::new(0.0, ball_pos.y),
            normal: Vec2::new(1.0, 0.0),
            penetration: ball_radius - ball_pos.x,
        };
    }
    if ball_pos.x + ball_radius > ARENA_WIDTH {
        return CollisionResult {
            hit: true,
            point: Vec2::new(ARENA_WIDTH, ball_pos.y),
            normal: Vec2::new(-1.0, 0.0),
            penetration: ball_pos.x + ball_radius - ARENA_WIDTH,
        };
    }
    if ball_pos.y - ball_radius < 0.0 {
        return CollisionResult {
            hit: true,
            point: Vec2::new(ball_pos.x, 0.0),
            normal: Vec2::new(0.0, 1.0),
            penetration: ball_radius - ball_pos.y,
        };
    }

    CollisionResult::miss()
}

/// Check if the ball fell past the bottom edge
pub fn ball_lost(ball_pos: Vec2, ball_radius: f32) -> bool {
    ball_pos.y - ball_radius > ARENA_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ball_rect_collision_from_above() {
        let brick = Aabb::from_pos_size(Vec2::new(100.0, 100.0), Vec2::new(58.0, 20.0));

        // Ball just above the brick top, slightly overlapping
        let result = ball_rect_collision(Vec2::new(120.0, 96.0), 7.0, &brick);
        assert!(result.hit);
        // Normal should point up (toward the ball, -y)
        assert_eq!(result.normal, Vec2::new(0.0, -1.0));
        assert!(result.penetration > 0.0);
    }

    #[test]
    fn test_ball_rect_collision_from_side() {
        let brick = Aabb::from_pos_size(Vec2::new(100.0, 100.0), Vec2::new(58.0, 20.0));

        // Ball to the left of the brick, overlapping the left face at mid-height
        let result = ball_rect_collision(Vec2::new(96.0, 110.0), 7.0, &brick);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_ball_rect_collision_miss() {
        let brick = Aabb::from_pos_size(Vec2::new(100.0, 100.0), Vec2::new(58.0, 20.0));

        let result = ball_rect_collision(Vec2::new(50.0, 50.0), 7.0, &brick);
        assert!(!result.hit);
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_paddle_deflect_center_goes_straight_up() {
        let v = paddle_deflect(0.0, 300.0);
        assert!(v.x.abs() < 0.001);
        assert!((v.y - (-300.0)).abs() < 0.001);
    }

    #[test]
    fn test_wall_collisions() {
        // Ball inside - no collision
        assert!(!ball_wall_collision(Vec2::new(300.0, 200.0), 7.0).hit);

        // Left wall
        let result = ball_wall_collision(Vec2::new(5.0, 200.0), 7.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(1.0, 0.0));

        // Top wall
        let result = ball_wall_collision(Vec2::new(300.0, 3.0), 7.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_ball_lost() {
        assert!(!ball_lost(Vec2::new(100.0, 400.0), 7.0));
        assert!(ball_lost(Vec2::new(100.0, 490.0), 7.0));
    }

    proptest! {
        #[test]
        fn reflect_preserves_speed(vx in -500.0f32..500.0, vy in -500.0f32..500.0) {
            let v = Vec2::new(vx, vy);
            for normal in [
                Vec2::new(1.0, 0.0),
                Vec2::new(-1.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(0.0, -1.0),
            ] {
                let r = reflect_velocity(v, normal);
                prop_assert!((r.length() - v.length()).abs() < 0.01);
            }
        }

        #[test]
        fn paddle_deflect_preserves_speed_and_points_up(
            offset in -2.0f32..2.0,
            speed in 100.0f32..600.0,
        ) {
            let v = paddle_deflect(offset, speed);
            prop_assert!((v.length() - speed).abs() < 0.01);
            prop_assert!(v.y < 0.0);
        }

        #[test]
        fn collision_normal_is_axis_aligned_unit(
            x in 0.0f32..640.0,
            y in 0.0f32..480.0,
        ) {
            let brick = Aabb::from_pos_size(Vec2::new(300.0, 200.0), Vec2::new(58.0, 20.0));
            let result = ball_rect_collision(Vec2::new(x, y), 7.0, &brick);
            if result.hit {
                prop_assert!((result.normal.length() - 1.0).abs() < 0.001);
                prop_assert!(result.normal.x == 0.0 || result.normal.y == 0.0);
                prop_assert!(result.penetration >= 0.0);
            }
        }
    }
}
