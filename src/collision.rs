/// Axis-aligned bounding boxes for tile collision
///
/// Every probe the integrator builds during a frame is an [`Aabb`]: a small
/// `Copy` value that lives on the stack for the duration of one call.
///
/// # Rust Learning Notes
///
/// - **Value types instead of pools**: `Aabb` is `Copy`, so "allocating" a
///   probe rectangle is just writing four floats to the stack
/// - **Corner storage**: boxes keep `min`/`max` corners rather than
///   origin + size, so a union of two boxes reports exactly the same edges
///   as the boxes it was built from
use glam::Vec2;

/// World-space rectangle, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Builds a box from its bottom-left corner and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let min = Vec2::new(x, y);
        Aabb {
            min,
            max: Vec2::new(x + width, y + height),
        }
    }

    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        Aabb { min, max }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.max.x
    }

    pub fn bottom(&self) -> f32 {
        self.min.y
    }

    pub fn top(&self) -> f32 {
        self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Same box moved by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        let delta = Vec2::new(dx, dy);
        Aabb {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Aabb) -> Self {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The area covered while moving from `self` by `(dx, dy)`.
    pub fn swept(&self, dx: f32, dy: f32) -> Self {
        self.union(&self.translated(dx, dy))
    }

    /// Positive-area overlap test.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        aabb_intersect(self, other)
    }
}

/// Checks if two axis-aligned bounding boxes intersect with positive area.
///
/// Boxes that only touch along an edge do NOT intersect. This is what lets an
/// entity rest exactly on top of a tile (`entity.bottom == tile.top`) without
/// being reported as colliding with it.
///
/// # Example
///
/// ```rust
/// use problematic::collision::{Aabb, aabb_intersect};
///
/// let player = Aabb::new(0.0, 1.0, 0.5, 0.5);
/// let floor = Aabb::new(0.0, 0.0, 1.0, 1.0);
/// assert!(!aabb_intersect(&player, &floor));
/// ```
pub fn aabb_intersect(a: &Aabb, b: &Aabb) -> bool {
    let x_overlap = a.min.x < b.max.x && a.max.x > b.min.x;
    let y_overlap = a.min.y < b.max.y && a.max.y > b.min.y;

    x_overlap && y_overlap
}

/// Calculates how far `a` reaches into `b` on each axis.
///
/// Returns `(0.0, 0.0)` when the boxes do not intersect.
pub fn penetration(a: &Aabb, b: &Aabb) -> (f32, f32) {
    if !aabb_intersect(a, b) {
        return (0.0, 0.0);
    }
    let x = a.max.x.min(b.max.x) - a.min.x.max(b.min.x);
    let y = a.max.y.min(b.max.y) - a.min.y.max(b.min.y);
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_intersect_overlapping() {
        let a = Aabb::new(0.0, 0.0, 1.0, 1.0);
        let b = Aabb::new(0.5, 0.5, 1.0, 1.0);

        assert!(aabb_intersect(&a, &b));
        assert!(aabb_intersect(&b, &a)); // Symmetric
    }

    #[test]
    fn test_aabb_intersect_touching_edges() {
        // Touching is not overlapping: resting contact must not count
        let a = Aabb::new(0.0, 0.0, 1.0, 1.0);
        let right = Aabb::new(1.0, 0.0, 1.0, 1.0);
        let above = Aabb::new(0.0, 1.0, 1.0, 1.0);

        assert!(!aabb_intersect(&a, &right));
        assert!(!aabb_intersect(&a, &above));
    }

    #[test]
    fn test_aabb_intersect_separated() {
        let a = Aabb::new(0.0, 0.0, 1.0, 1.0);
        let b = Aabb::new(5.0, 5.0, 1.0, 1.0);

        assert!(!aabb_intersect(&a, &b));
    }

    #[test]
    fn test_aabb_intersect_contained() {
        let large = Aabb::new(0.0, 0.0, 4.0, 4.0);
        let small = Aabb::new(1.0, 1.0, 0.5, 0.5);

        assert!(aabb_intersect(&large, &small));
        assert!(aabb_intersect(&small, &large));
    }

    #[test]
    fn test_swept_covers_start_and_end() {
        let start = Aabb::new(2.0, 1.0, 0.25, 0.5);
        let swept = start.swept(-0.5, 0.0);

        assert_eq!(swept.left(), 1.5);
        assert_eq!(swept.right(), 2.25);
        assert_eq!(swept.bottom(), 1.0);
        assert_eq!(swept.top(), 1.5);
    }

    #[test]
    fn test_union_keeps_exact_edges() {
        let a = Aabb::new(3.7431, 1.0, 18.0 / 70.0, 26.0 / 70.0);
        let b = Aabb::new(3.7431 + 5.0 / 60.0, 1.0, 18.0 / 70.0, 26.0 / 70.0);
        let u = a.union(&b);

        assert_eq!(u.left(), a.left());
        assert_eq!(u.right(), b.right());
        assert_eq!(u.top(), a.top());
    }

    #[test]
    fn test_penetration() {
        let a = Aabb::new(0.0, 0.0, 1.0, 1.0);
        let b = Aabb::new(0.75, 0.5, 1.0, 1.0);

        assert_eq!(penetration(&a, &b), (0.25, 0.5));
        assert_eq!(penetration(&a, &Aabb::new(3.0, 3.0, 1.0, 1.0)), (0.0, 0.0));
    }
}
