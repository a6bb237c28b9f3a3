use crate::point2d::{Point2D, cross2};
use crate::point3d::{Point3D, dot3};

/// Edge function of the directed edge `v0 -> v1` evaluated at `p`.
///
/// Equal to `x * delta_y - y * delta_x + delta_k` with the coefficients from [`EdgeCoefficients`].
#[inline(always)]
pub fn edge_function(v0: Point2D, v1: Point2D, p: Point2D) -> f32 {
    cross2(v1 - v0, p - v0)
}

/// Linear coefficients of the three edge functions of a triangle, one component per edge:
/// `x` for edge BC (alpha), `y` for edge CA (beta), `z` for edge AB (gamma).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EdgeCoefficients {
    pub delta_x: Point3D,
    pub delta_y: Point3D,
    pub delta_k: Point3D,
}

fn edge_terms(v0: Point2D, v1: Point2D) -> (f32, f32, f32) {
    (v0.x - v1.x, v0.y - v1.y, v0.x * v1.y - v0.y * v1.x)
}

impl EdgeCoefficients {
    pub fn new(a: Point2D, b: Point2D, c: Point2D) -> Self {
        let (bc_dx, bc_dy, bc_k) = edge_terms(b, c);
        let (ca_dx, ca_dy, ca_k) = edge_terms(c, a);
        let (ab_dx, ab_dy, ab_k) = edge_terms(a, b);
        Self {
            delta_x: Point3D::new(bc_dx, ca_dx, ab_dx),
            delta_y: Point3D::new(bc_dy, ca_dy, ab_dy),
            delta_k: Point3D::new(bc_k, ca_k, ab_k),
        }
    }

    /// Raw edge values at `p`, not yet divided by the area
    #[inline(always)]
    pub fn evaluate(&self, p: Point2D) -> Point3D {
        self.delta_y * p.x - self.delta_x * p.y + self.delta_k
    }
}

/// All three edge values share a sign. Points on an edge count as inside.
#[inline(always)]
pub fn edges_agree(e: Point3D) -> bool {
    (e.x >= 0.0 && e.y >= 0.0 && e.z >= 0.0) || (e.x <= 0.0 && e.y <= 0.0 && e.z <= 0.0)
}

/// Barycentric-weighted sum of three per-vertex values
#[inline(always)]
pub fn interpolate(weights: Point3D, values: Point3D) -> f32 {
    dot3(weights, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficients_match_edge_function() {
        let (a, b, c) = (Point2D::new(1.0, 2.0), Point2D::new(7.0, 3.0), Point2D::new(4.0, 9.0));
        let e = EdgeCoefficients::new(a, b, c);
        let p = Point2D::new(3.5, 4.5);
        let v = e.evaluate(p);
        assert!((v.x - edge_function(b, c, p)).abs() < 1e-4);
        assert!((v.y - edge_function(c, a, p)).abs() < 1e-4);
        assert!((v.z - edge_function(a, b, p)).abs() < 1e-4);
    }

    #[test]
    fn barycentrics_sum_to_one() {
        let triangles = [
            (Point2D::new(1.0, 2.0), Point2D::new(7.0, 3.0), Point2D::new(4.0, 9.0)),
            (Point2D::new(100.0, 5.0), Point2D::new(3.0, 80.0), Point2D::new(250.0, 190.0)),
            (Point2D::new(0.0, 0.0), Point2D::new(0.0, 10.0), Point2D::new(10.0, 0.0)),
        ];
        for (a, b, c) in triangles {
            let e = EdgeCoefficients::new(a, b, c);
            let area = edge_function(a, b, c);
            for y in 0..20 {
                for x in 0..20 {
                    let p = Point2D::new(x as f32 * 13.0 + 0.5, y as f32 * 11.0 + 0.5);
                    let w = e.evaluate(p) / area;
                    assert!((w.x + w.y + w.z - 1.0).abs() < 1e-3, "{w:?}");
                }
            }
        }
    }

    #[test]
    fn weights_are_one_at_their_own_vertex() {
        let (a, b, c) = (Point2D::new(1.0, 2.0), Point2D::new(7.0, 3.0), Point2D::new(4.0, 9.0));
        let e = EdgeCoefficients::new(a, b, c);
        let area = edge_function(a, b, c);
        let w = e.evaluate(a) / area;
        assert!((w.x - 1.0).abs() < 1e-5 && w.y.abs() < 1e-5 && w.z.abs() < 1e-5);
    }

    #[test]
    fn inside_test_accepts_either_winding() {
        let (a, b, c) = (Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0), Point2D::new(0.0, 10.0));
        let p = Point2D::new(2.0, 2.0);
        assert!(edges_agree(EdgeCoefficients::new(a, b, c).evaluate(p)));
        assert!(edges_agree(EdgeCoefficients::new(a, c, b).evaluate(p)));
        assert!(!edges_agree(EdgeCoefficients::new(a, b, c).evaluate(Point2D::new(9.0, 9.0))));
    }
}
