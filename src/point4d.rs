use std::ops::{Add, Sub, Mul, Div};

use crate::point3d::Point3D;

/// Homogeneous position or RGBA colour (0..1 per channel)
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point4D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Point4D {
    pub const WHITE: Point4D = Point4D { x: 1.0, y: 1.0, z: 1.0, w: 1.0 };

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn from_point(p: Point3D, w: f32) -> Self {
        Self { x: p.x, y: p.y, z: p.z, w }
    }

    pub fn xyz(self) -> Point3D {
        Point3D { x: self.x, y: self.y, z: self.z }
    }

    pub fn lerp(self, other: Point4D, t: f32) -> Point4D {
        self + (other - self) * t
    }
}

impl Add for Point4D {
    type Output = Point4D;
    fn add(self, other: Point4D) -> Point4D {
        Point4D { x: self.x + other.x, y: self.y + other.y, z: self.z + other.z, w: self.w + other.w }
    }
}

impl Sub for Point4D {
    type Output = Point4D;
    fn sub(self, other: Point4D) -> Point4D {
        Point4D { x: self.x - other.x, y: self.y - other.y, z: self.z - other.z, w: self.w - other.w }
    }
}

impl Mul<f32> for Point4D {
    type Output = Point4D;
    fn mul(self, scalar: f32) -> Point4D {
        Point4D { x: self.x * scalar, y: self.y * scalar, z: self.z * scalar, w: self.w * scalar }
    }
}

impl Div<f32> for Point4D {
    type Output = Point4D;
    fn div(self, scalar: f32) -> Point4D {
        Point4D { x: self.x / scalar, y: self.y / scalar, z: self.z / scalar, w: self.w / scalar }
    }
}

pub fn dot4(a: Point4D, b: Point4D) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z + a.w * b.w
}
