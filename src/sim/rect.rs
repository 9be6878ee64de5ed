//! Axis-aligned rectangle geometry for bricks, paddle and the playfield
//!
//! Every solid thing in the game is an axis-aligned bounding box:
//! - min: top-left corner (smallest x and y, +y points down)
//! - max: bottom-right corner

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Build from top-left corner and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos, pos + size)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Center point of the box
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Rectangle overlap test (shared edges do not count as overlap)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Check if a point is inside the box (edges inclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Closest point on or inside the box to the given point
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Bounding box of a circle
    pub fn from_circle(center: Vec2, radius: f32) -> Self {
        Self::new(center - Vec2::splat(radius), center + Vec2::splat(radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlaps() {
        let a = Aabb::from_pos_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::from_pos_size(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        let c = Aabb::from_pos_size(Vec2::new(20.0, 0.0), Vec2::new(5.0, 5.0));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::from_pos_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::from_pos_size(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_contains_point() {
        let rect = Aabb::from_pos_size(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0));
        assert!(rect.contains_point(Vec2::new(25.0, 40.0)));
        assert!(rect.contains_point(Vec2::new(10.0, 20.0))); // corner is inclusive
        assert!(!rect.contains_point(Vec2::new(5.0, 40.0)));
        assert!(!rect.contains_point(Vec2::new(25.0, 70.0)));
    }

    #[test]
    fn test_closest_point() {
        let rect = Aabb::from_pos_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        // Point to the left clamps to the left edge
        assert_eq!(rect.closest_point(Vec2::new(-5.0, 5.0)), Vec2::new(0.0, 5.0));
        // Inside point stays put
        assert_eq!(rect.closest_point(Vec2::new(3.0, 4.0)), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_from_circle() {
        let b = Aabb::from_circle(Vec2::new(10.0, 10.0), 4.0);
        assert_eq!(b.min, Vec2::new(6.0, 6.0));
        assert_eq!(b.max, Vec2::new(14.0, 14.0));
        assert!((b.width() - 8.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_min_max_normalized() {
        let rect = Aabb::new(Vec2::new(10.0, 10.0), Vec2::new(0.0, 0.0));
        assert_eq!(rect.min, Vec2::ZERO);
        assert_eq!(rect.max, Vec2::new(10.0, 10.0));
    }
}
