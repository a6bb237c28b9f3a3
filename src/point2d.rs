use std::ops::{Add, Sub, Mul, Div};

use crate::point3d::Point3D;

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Point3D> for Point2D {
    fn from(p: Point3D) -> Point2D {
        Point2D { x: p.x, y: p.y }
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, other: Point2D) -> Point2D {
        Point2D { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, other: Point2D) -> Point2D {
        Point2D { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Mul<f32> for Point2D {
    type Output = Point2D;
    fn mul(self, scalar: f32) -> Point2D {
        Point2D { x: self.x * scalar, y: self.y * scalar }
    }
}

impl Div<f32> for Point2D {
    type Output = Point2D;
    fn div(self, scalar: f32) -> Point2D {
        Point2D { x: self.x / scalar, y: self.y / scalar }
    }
}

/// z component of the 3D cross product of two vectors lying in the xy plane
#[inline(always)]
pub fn cross2(a: Point2D, b: Point2D) -> f32 {
    a.x * b.y - a.y * b.x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_sign_follows_turn_direction() {
        let x = Point2D::new(1.0, 0.0);
        let y = Point2D::new(0.0, 1.0);
        assert_eq!(cross2(x, y), 1.0);
        assert_eq!(cross2(y, x), -1.0);
    }
}
