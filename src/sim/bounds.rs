//! Axis-aligned bounds shared by every moving object
//!
//! `Bounds` is the position/size/visibility record each entity kind embeds.
//! The overlap test here is the only geometry primitive the simulation uses.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Position, size and visibility of an entity (top-left origin, y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
}

impl Bounds {
    /// Visible bounds at the given rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            visible: true,
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// AABB overlap test
    ///
    /// Invisible bounds never collide. Rectangles that only share an edge do
    /// not overlap.
    pub fn collides_with(&self, other: &Bounds) -> bool {
        if !self.visible || !other.visible {
            return false;
        }

        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_edge_touching_does_not_collide() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.collides_with(&b));
        assert!(!b.collides_with(&a));

        let below = Bounds::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.collides_with(&below));
    }

    #[test]
    fn test_overlap_collides() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(9.0, 0.0, 10.0, 10.0);
        assert!(a.collides_with(&b));
        assert!(b.collides_with(&a));
    }

    #[test]
    fn test_containment_collides() {
        let outer = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let inner = Bounds::new(40.0, 40.0, 4.0, 8.0);
        assert!(outer.collides_with(&inner));
        assert!(inner.collides_with(&outer));
    }

    #[test]
    fn test_invisible_never_collides() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let mut b = Bounds::new(0.0, 0.0, 10.0, 10.0);
        b.visible = false;
        assert!(!a.collides_with(&b));
        assert!(!b.collides_with(&a));
    }

    #[test]
    fn test_center() {
        let b = Bounds::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.center(), Vec2::new(25.0, 40.0));
        assert_eq!(b.bottom(), 60.0);
        assert_eq!(b.right(), 40.0);
    }

    fn rect() -> impl Strategy<Value = Bounds> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.5f32..200.0, 0.5f32..200.0)
            .prop_map(|(x, y, w, h)| Bounds::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_collision_is_symmetric(a in rect(), b in rect()) {
            prop_assert_eq!(a.collides_with(&b), b.collides_with(&a));
        }

        #[test]
        fn prop_hidden_side_never_collides(a in rect(), mut b in rect()) {
            b.visible = false;
            prop_assert!(!a.collides_with(&b));
            prop_assert!(!b.collides_with(&a));
        }

        #[test]
        fn prop_visible_rect_collides_with_itself(a in rect()) {
            prop_assert!(a.collides_with(&a));
        }

        #[test]
        fn prop_right_neighbour_only_touches(a in rect(), w in 0.5f32..200.0) {
            let neighbour = Bounds::new(a.right(), a.y, w, a.height);
            prop_assert!(!a.collides_with(&neighbour));
        }
    }
}
