use std::ops::{Add, AddAssign, Sub, SubAssign, Mul, Div, Neg};

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    pub const ZERO: Point3D = Point3D { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f32 {
        dot3(self, self).sqrt()
    }

    pub fn lerp(self, other: Point3D, t: f32) -> Point3D {
        self + (other - self) * t
    }
}

impl Add for Point3D {
    type Output = Point3D;
    fn add(self, other: Point3D) -> Point3D {
        Point3D { x: self.x + other.x, y: self.y + other.y, z: self.z + other.z }
    }
}

impl AddAssign for Point3D {
    fn add_assign(&mut self, other: Point3D) {
        *self = *self + other;
    }
}

impl Add<f32> for Point3D {
    type Output = Point3D;
    fn add(self, scalar: f32) -> Point3D {
        Point3D { x: self.x + scalar, y: self.y + scalar, z: self.z + scalar }
    }
}

impl Sub for Point3D {
    type Output = Point3D;
    fn sub(self, other: Point3D) -> Point3D {
        Point3D { x: self.x - other.x, y: self.y - other.y, z: self.z - other.z }
    }
}

impl SubAssign for Point3D {
    fn sub_assign(&mut self, other: Point3D) {
        *self = *self - other;
    }
}

impl Neg for Point3D {
    type Output = Point3D;
    fn neg(self) -> Point3D {
        Point3D { x: -self.x, y: -self.y, z: -self.z }
    }
}

impl Mul<f32> for Point3D {
    type Output = Point3D;
    fn mul(self, scalar: f32) -> Point3D {
        Point3D { x: self.x * scalar, y: self.y * scalar, z: self.z * scalar }
    }
}

impl Div<f32> for Point3D {
    type Output = Point3D;
    fn div(self, scalar: f32) -> Point3D {
        Point3D { x: self.x / scalar, y: self.y / scalar, z: self.z / scalar }
    }
}

#[inline(always)]
pub fn dot3(a: Point3D, b: Point3D) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

#[inline(always)]
pub fn cross3(a: Point3D, b: Point3D) -> Point3D {
    Point3D {
        x: a.y * b.z - a.z * b.y,
        y: a.z * b.x - a.x * b.z,
        z: a.x * b.y - a.y * b.x,
    }
}

pub fn normalize(vec: Point3D) -> Point3D {
    let length = vec.length();
    if length != 0.0 { vec / length } else { vec }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_of_axes_is_right_handed() {
        let x = Point3D::new(1.0, 0.0, 0.0);
        let y = Point3D::new(0.0, 1.0, 0.0);
        assert_eq!(cross3(x, y), Point3D::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn normalize_leaves_zero_vector_alone() {
        assert_eq!(normalize(Point3D::ZERO), Point3D::ZERO);
        let n = normalize(Point3D::new(3.0, 0.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn reciprocal_divides_each_component() {
        let r = 1.0 / Point3D::new(2.0, 4.0, 0.5);
        assert_eq!(r, Point3D::new(0.5, 0.25, 2.0));
    }
}
