use std::ops::Mul;

use crate::point3d::Point3D;
use crate::point4d::{Point4D, dot4};

/// Row-major 4x4 matrix acting on column vectors (`p' = M * p`)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Affine matrix whose first three columns are the basis vectors and whose last column is the translation
    pub fn from_basis(ihat: Point3D, jhat: Point3D, khat: Point3D, translation: Point3D) -> Mat4 {
        Mat4 {
            m: [
                [ihat.x, jhat.x, khat.x, translation.x],
                [ihat.y, jhat.y, khat.y, translation.y],
                [ihat.z, jhat.z, khat.z, translation.z],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn scale(s: f32) -> Mat4 {
        let mut out = Mat4::IDENTITY;
        out.m[0][0] = s;
        out.m[1][1] = s;
        out.m[2][2] = s;
        out
    }

    /// Perspective projection with reversed, infinite-far depth.
    ///
    /// View space looks down +z. After the divide `ndc.z = near / z`, so the near plane maps
    /// to 1.0 and depth falls towards 0.0 with distance.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32) -> Mat4 {
        let f = 1.0 / (fov_y * 0.5).tan();
        Mat4 {
            m: [
                [f / aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, 0.0, near],
                [0.0, 0.0, 1.0, 0.0],
            ],
        }
    }

    pub fn row(&self, i: usize) -> Point4D {
        let r = self.m[i];
        Point4D::new(r[0], r[1], r[2], r[3])
    }

    pub fn transform(&self, v: Point4D) -> Point4D {
        Point4D {
            x: dot4(self.row(0), v),
            y: dot4(self.row(1), v),
            z: dot4(self.row(2), v),
            w: dot4(self.row(3), v),
        }
    }

    /// Transform a position (w = 1)
    pub fn transform_point(&self, p: Point3D) -> Point4D {
        self.transform(Point4D::from_point(p, 1.0))
    }

    /// Transform a direction with the upper-left 3x3 (translation ignored)
    pub fn transform_vector(&self, v: Point3D) -> Point3D {
        self.transform(Point4D::from_point(v, 0.0)).xyz()
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [[0.0f32; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        Mat4 { m: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(t: Point3D) -> Mat4 {
        Mat4::from_basis(Point3D::new(1.0, 0.0, 0.0), Point3D::new(0.0, 1.0, 0.0), Point3D::new(0.0, 0.0, 1.0), t)
    }

    #[test]
    fn translation_moves_points_not_vectors() {
        let t = shift(Point3D::new(1.0, 2.0, 3.0));
        let p = t.transform_point(Point3D::new(1.0, 1.0, 1.0));
        assert_eq!(p, Point4D::new(2.0, 3.0, 4.0, 1.0));
        assert_eq!(t.transform_vector(Point3D::new(1.0, 1.0, 1.0)), Point3D::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn product_applies_right_matrix_first() {
        let m = shift(Point3D::new(1.0, 0.0, 0.0)) * Mat4::scale(2.0);
        let p = m.transform_point(Point3D::new(1.0, 1.0, 1.0));
        assert_eq!(p.xyz(), Point3D::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn perspective_maps_near_plane_to_one() {
        let p = Mat4::perspective(90f32.to_radians(), 1.0, 0.5);
        let near = p.transform_point(Point3D::new(0.0, 0.0, 0.5));
        assert!((near.z / near.w - 1.0).abs() < 1e-6);
        let far = p.transform_point(Point3D::new(0.0, 0.0, 50.0));
        assert!((far.z / far.w - 0.01).abs() < 1e-6);
        // 90 degree fov: a point on the frustum edge lands on ndc x = 1
        let edge = p.transform_point(Point3D::new(4.0, 0.0, 4.0));
        assert!((edge.x / edge.w - 1.0).abs() < 1e-6);
    }
}
