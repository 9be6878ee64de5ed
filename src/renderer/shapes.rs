//! Shape generation for 2D primitives
//!
//! The whole frame is tessellated into one flat triangle list each frame and
//! uploaded in a single buffer.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::Settings;
use crate::consts::{BALL_MAX_SPEED, BALL_MIN_SPEED};
use crate::sim::rect::Aabb;
use crate::sim::state::{Brick, BrickKind, GameState, PADDLE_SPARK, TrailPoint};

/// Generate vertices for a filled rectangle (two triangles)
pub fn rect(bounds: &Aabb, color: [f32; 4]) -> Vec<Vertex> {
    let (min, max) = (bounds.min, bounds.max);
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Interpolate color based on velocity (slow=blue, medium=green, fast=red)
fn velocity_color(speed: f32, alpha: f32) -> [f32; 4] {
    let t = ((speed - BALL_MIN_SPEED) / (BALL_MAX_SPEED - BALL_MIN_SPEED)).clamp(0.0, 1.0);

    let (r, g, b) = if t < 0.25 {
        // Blue to cyan
        let u = t / 0.25;
        (0.2, 0.4 + 0.4 * u, 1.0)
    } else if t < 0.5 {
        // Cyan to green
        let u = (t - 0.25) / 0.25;
        (0.2, 0.8, 1.0 - 0.6 * u)
    } else if t < 0.75 {
        // Green to yellow
        let u = (t - 0.5) / 0.25;
        (0.2 + 0.8 * u, 0.8, 0.4 - 0.2 * u)
    } else {
        // Yellow to red/orange
        let u = (t - 0.75) / 0.25;
        (1.0, 0.8 - 0.5 * u, 0.2)
    };

    [r, g, b, alpha]
}

/// Generate vertices for a ball trail with velocity-based colors
pub fn ball_trail(trail: &[TrailPoint], ball_radius: f32) -> Vec<Vertex> {
    if trail.len() < 2 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity(trail.len() * 6);
    let trail_len = trail.len() as f32;

    for i in 0..trail.len() - 1 {
        let p1 = &trail[i];
        let p2 = &trail[i + 1];

        // Fade alpha and size along trail
        let t1 = i as f32 / trail_len;
        let t2 = (i + 1) as f32 / trail_len;

        let alpha1 = (1.0 - t1) * 0.8;
        let alpha2 = (1.0 - t2) * 0.8;

        let width1 = ball_radius * (1.0 - t1 * 0.7);
        let width2 = ball_radius * (1.0 - t2 * 0.7);

        let color1 = velocity_color(p1.speed, alpha1);
        let color2 = velocity_color(p2.speed, alpha2);

        // Direction from p1 to p2
        let dir = (p2.pos - p1.pos).normalize_or_zero();
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x);

        // Quad corners
        let v1a = p1.pos + perp * width1;
        let v1b = p1.pos - perp * width1;
        let v2a = p2.pos + perp * width2;
        let v2b = p2.pos - perp * width2;

        // Two triangles
        vertices.push(Vertex::new(v1a.x, v1a.y, color1));
        vertices.push(Vertex::new(v1b.x, v1b.y, color1));
        vertices.push(Vertex::new(v2a.x, v2a.y, color2));

        vertices.push(Vertex::new(v2a.x, v2a.y, color2));
        vertices.push(Vertex::new(v1b.x, v1b.y, color1));
        vertices.push(Vertex::new(v2b.x, v2b.y, color2));
    }

    vertices
}

/// Brick fill color: row palette, dimmed while damaged, gray for solid
fn brick_color(brick: &Brick) -> [f32; 4] {
    match brick.kind {
        BrickKind::Solid => colors::BRICK_SOLID,
        _ => {
            let base = colors::BRICK_ROWS[brick.row as usize % colors::BRICK_ROWS.len()];
            if brick.kind == BrickKind::Tough && brick.hp == 1 {
                [base[0] * 0.55, base[1] * 0.55, base[2] * 0.55, base[3]]
            } else {
                base
            }
        }
    }
}

fn particle_color(color_index: u32, life: f32) -> [f32; 4] {
    let base = if color_index == PADDLE_SPARK {
        colors::SPARK
    } else {
        colors::BRICK_ROWS[color_index as usize % colors::BRICK_ROWS.len()]
    };
    [base[0], base[1], base[2], life.clamp(0.0, 1.0)]
}

/// Tessellate the whole game snapshot into one vertex list
pub fn scene_vertices(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(state.bricks.len() * 6 + 256);

    for brick in &state.bricks {
        vertices.extend(rect(&brick.rect, brick_color(brick)));
    }

    vertices.extend(rect(&state.paddle.rect(), colors::PADDLE));

    if settings.effective_trails() {
        vertices.extend(ball_trail(&state.ball.trail, state.ball.radius));
    }

    vertices.extend(circle(state.ball.pos, state.ball.radius, colors::BALL, 24));

    if settings.effective_particles() {
        for p in &state.particles {
            let half = Vec2::splat(p.size / 2.0);
            vertices.extend(rect(
                &Aabb::new(p.pos - half, p.pos + half),
                particle_color(p.color, p.life),
            ));
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_two_triangles() {
        let verts = rect(
            &Aabb::from_pos_size(Vec2::ZERO, Vec2::new(10.0, 5.0)),
            [1.0; 4],
        );
        assert_eq!(verts.len(), 6);
    }

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::ZERO, 5.0, [1.0; 4], 16);
        assert_eq!(verts.len(), 48);
    }

    #[test]
    fn test_scene_has_paddle_and_ball() {
        let state = GameState::new(1);
        let verts = scene_vertices(&state, &Settings::default());
        // 6 for the paddle plus 24*3 for the ball, no bricks yet
        assert_eq!(verts.len(), 6 + 72);
    }
}
