//! Single plane triangle clipping.
//!
//! A triangle is tested against one plane at a time and comes back as zero, one or two
//! triangles. Chaining several planes is done by feeding the output of one clip into the next.

use smallvec::SmallVec;

use crate::point3d::{Point3D, dot3, normalize};
use crate::triangle::{Triangle, Vertex};

/// Output of a single clip. Never more than two triangles.
pub type Clipped = SmallVec<[Triangle; 2]>;

/// Triangles produced by a chain of clips against several planes
pub type ClipList = SmallVec<[Triangle; 8]>;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub point: Point3D,
    pub normal: Point3D,
}

impl Plane {
    pub fn new(point: Point3D, normal: Point3D) -> Self {
        Self { point, normal: normalize(normal) }
    }

    /// View space near plane, keeping everything with `z > distance`
    pub fn near(distance: f32) -> Self {
        Self::new(Point3D::new(0.0, 0.0, distance), Point3D::new(0.0, 0.0, 1.0))
    }

    /// Positive on the side the normal points to
    #[inline(always)]
    pub fn signed_distance(&self, p: Point3D) -> f32 {
        dot3(p - self.point, self.normal)
    }

    /// Where the infinite line through `start` and `end` meets the plane
    pub fn intersect_line(&self, start: Point3D, end: Point3D) -> Point3D {
        let t = dot3(self.point - start, self.normal) / dot3(end - start, self.normal);
        start + (end - start) * t
    }
}

/// The four screen space half-planes bounding a `width` x `height` raster, in clipping order
/// (bottom, top, left, right). The far edges sit at `width` and `height` so the last pixel
/// column and row keep their centres inside.
pub fn screen_planes(width: u32, height: u32) -> [Plane; 4] {
    let max_x = width as f32;
    let max_y = height as f32;
    [
        Plane::new(Point3D::new(0.0, max_y, 0.0), Point3D::new(0.0, -1.0, 0.0)),
        Plane::new(Point3D::new(0.0, 0.0, 0.0), Point3D::new(0.0, 1.0, 0.0)),
        Plane::new(Point3D::new(0.0, 0.0, 0.0), Point3D::new(1.0, 0.0, 0.0)),
        Plane::new(Point3D::new(max_x, 0.0, 0.0), Point3D::new(-1.0, 0.0, 0.0)),
    ]
}

/// How a triangle sits relative to a plane. Indices are vertex slots (0 = a, 1 = b, 2 = c).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Classification {
    Inside,
    Outside,
    OneInside { inside: usize },
    TwoInside { outside: usize },
    /// At least one vertex lies exactly on the plane and the rest do not settle it
    OnPlane,
}

pub fn classify(plane: &Plane, tri: &Triangle) -> Classification {
    let d = tri.vertices().map(|v| plane.signed_distance(v.position));
    let inside = d.iter().filter(|&&x| x > 0.0).count();
    let outside = d.iter().filter(|&&x| x < 0.0).count();
    match (inside, outside) {
        (3, _) => Classification::Inside,
        (_, 3) => Classification::Outside,
        (1, 2) => Classification::OneInside { inside: d.iter().position(|&x| x > 0.0).unwrap_or(0) },
        (2, 1) => Classification::TwoInside { outside: d.iter().position(|&x| x < 0.0).unwrap_or(0) },
        _ => Classification::OnPlane,
    }
}

/// Vertex where the edge from `start` to `end` crosses the plane.
///
/// Attributes are blended by the distance ratio `|p - start| / |end - start|`.
fn edge_intersection(plane: &Plane, start: &Vertex, end: &Vertex) -> Vertex {
    let p = plane.intersect_line(start.position, end.position);
    let edge_length = (end.position - start.position).length();
    let t = if edge_length > 0.0 { (p - start.position).length() / edge_length } else { 0.0 };
    start.lerp_attributes(end, t).with_position(p)
}

fn clip_one_inside(plane: &Plane, tri: &Triangle, inside: usize) -> Triangle {
    let mut v = tri.vertices();
    let keep = v[inside];
    let (j, k) = ((inside + 1) % 3, (inside + 2) % 3);
    v[j] = edge_intersection(plane, &keep, &v[j]);
    v[k] = edge_intersection(plane, &keep, &v[k]);
    tri.with_vertices(v)
}

fn clip_two_inside(plane: &Plane, tri: &Triangle, outside: usize) -> [Triangle; 2] {
    let v = tri.vertices();
    let (i1, i2) = ((outside + 1) % 3, (outside + 2) % 3);
    // p1 on edge (i1, outside), p2 on edge (i2, outside)
    let p1 = edge_intersection(plane, &v[i1], &v[outside]);
    let p2 = edge_intersection(plane, &v[i2], &v[outside]);

    let mut first = v;
    first[outside] = p2;

    let mut second = v;
    second[outside] = p1;
    second[i2] = p2;

    [tri.with_vertices(first), tri.with_vertices(second)]
}

/// Clip `tri` against `plane`, keeping the part on the positive side
pub fn clip_triangle(plane: &Plane, tri: &Triangle) -> Clipped {
    let mut out = Clipped::new();
    match classify(plane, tri) {
        Classification::Inside => out.push(*tri),
        Classification::Outside | Classification::OnPlane => {}
        Classification::OneInside { inside } => out.push(clip_one_inside(plane, tri, inside)),
        Classification::TwoInside { outside } => out.extend(clip_two_inside(plane, tri, outside)),
    }
    out
}

/// Clip every triangle against each plane in turn
pub fn clip_against_planes(planes: &[Plane], tri: &Triangle) -> ClipList {
    let mut current = ClipList::new();
    current.push(*tri);
    for plane in planes {
        let mut next = ClipList::new();
        for t in &current {
            next.extend(clip_triangle(plane, t));
        }
        if next.is_empty() {
            return next;
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point2d::{Point2D, cross2};
    use crate::point4d::Point4D;

    fn vertex(x: f32, y: f32, z: f32, u: f32, v: f32, grey: f32) -> Vertex {
        let mut out = Vertex::new(Point3D::new(x, y, z), Point2D::new(u, v), Point3D::new(0.0, 0.0, -1.0));
        out.colour = Point4D::new(grey, grey, grey, 1.0);
        out
    }

    fn winding(t: &Triangle) -> f32 {
        let a = Point2D::from(t.a.position);
        cross2(Point2D::from(t.b.position) - a, Point2D::from(t.c.position) - a)
    }

    fn area_xy(t: &Triangle) -> f32 {
        winding(t).abs() * 0.5
    }

    fn between(value: f32, a: f32, b: f32) -> bool {
        value >= a.min(b) - 1e-5 && value <= a.max(b) + 1e-5
    }

    #[test]
    fn fully_inside_triangle_is_unchanged() {
        let tri = Triangle::new(vertex(0.0, 0.0, 1.0, 0.0, 0.0, 0.0), vertex(1.0, 0.0, 2.0, 1.0, 0.0, 0.5), vertex(0.0, 1.0, 3.0, 0.0, 1.0, 1.0));
        let out = clip_triangle(&Plane::near(0.5), &tri);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0], tri);
    }

    #[test]
    fn fully_outside_triangle_is_dropped() {
        let tri = Triangle::new(vertex(0.0, 0.0, -1.0, 0.0, 0.0, 0.0), vertex(1.0, 0.0, -2.0, 1.0, 0.0, 0.5), vertex(0.0, 1.0, 0.2, 0.0, 1.0, 1.0));
        assert!(clip_triangle(&Plane::near(0.5), &tri).is_empty());
    }

    #[test]
    fn one_vertex_inside_gives_one_triangle() {
        let plane = Plane::new(Point3D::new(1.0, 0.0, 0.0), Point3D::new(-1.0, 0.0, 0.0));
        let tri = Triangle::new(vertex(0.0, 0.0, 0.0, 0.0, 0.0, 0.0), vertex(4.0, 0.0, 0.0, 1.0, 0.0, 1.0), vertex(4.0, 4.0, 0.0, 1.0, 1.0, 1.0));
        let out = clip_triangle(&plane, &tri);
        assert_eq!(out.len(), 1);
        let t = out[0];
        assert_eq!(t.a, tri.a);
        assert!((t.b.position.x - 1.0).abs() < 1e-6);
        assert!((t.b.tex.x - 0.25).abs() < 1e-6);
        assert!((t.b.colour.x - 0.25).abs() < 1e-6);
        assert!((t.c.position.x - 1.0).abs() < 1e-6);
        assert!((t.c.position.y - 1.0).abs() < 1e-6);
        assert!((t.c.tex.y - 0.25).abs() < 1e-6);
        assert!(winding(&t) * winding(&tri) > 0.0);
    }

    #[test]
    fn two_vertices_inside_gives_two_triangles_covering_the_visible_part() {
        // x < 3 is kept; the full triangle has area 8, the part with x > 3 has area 0.5
        let plane = Plane::new(Point3D::new(3.0, 0.0, 0.0), Point3D::new(-1.0, 0.0, 0.0));
        let tri = Triangle::new(vertex(0.0, 0.0, 0.0, 0.0, 0.0, 0.0), vertex(4.0, 0.0, 0.0, 1.0, 0.0, 1.0), vertex(0.0, 4.0, 0.0, 0.0, 1.0, 0.5));
        let out = clip_triangle(&plane, &tri);
        assert_eq!(out.len(), 2);
        let total: f32 = out.iter().map(area_xy).sum();
        assert!((total - 7.5).abs() < 1e-4);
        for t in &out {
            assert!(winding(t) * winding(&tri) > 0.0);
            for v in t.vertices() {
                assert!(plane.signed_distance(v.position) >= -1e-5);
            }
        }
    }

    #[test]
    fn generated_attributes_stay_between_edge_endpoints() {
        let plane = Plane::near(1.0);
        let a = vertex(0.0, 0.0, 3.0, 0.1, 0.9, 0.2);
        let b = vertex(1.0, 0.0, -2.0, 0.7, 0.3, 0.8);
        let c = vertex(0.0, 1.0, 2.0, 0.4, 0.5, 1.0);
        let out = clip_triangle(&plane, &Triangle::new(a, b, c));
        assert_eq!(out.len(), 2);
        // b is the outside vertex, so every generated vertex sits on (a, b) or (c, b)
        for t in &out {
            for v in t.vertices() {
                if v == a || v == c {
                    continue;
                }
                assert!((v.position.z - 1.0).abs() < 1e-5);
                let other = if between(v.position.x, a.position.x, b.position.x) && v.position.y.abs() < 1e-6 { a } else { c };
                assert!(between(v.tex.x, other.tex.x, b.tex.x));
                assert!(between(v.tex.y, other.tex.y, b.tex.y));
                assert!(between(v.colour.x, other.colour.x, b.colour.x));
                assert!(between(v.normal.z, other.normal.z, b.normal.z));
            }
        }
    }

    #[test]
    fn near_plane_straddler_with_one_vertex_behind_gives_two_triangles() {
        let near = Plane::near(0.1);
        let tri = Triangle::new(vertex(-1.0, 0.0, 2.0, 0.0, 0.0, 1.0), vertex(0.0, 1.0, -1.0, 0.5, 1.0, 1.0), vertex(1.0, 0.0, 2.0, 1.0, 0.0, 1.0));
        let out = clip_triangle(&near, &tri);
        assert_eq!(out.len(), 2);
        for t in &out {
            for v in t.vertices() {
                assert!(v.position.z >= 0.1 - 1e-5);
            }
        }
    }

    #[test]
    fn vertex_exactly_on_plane_emits_nothing() {
        let near = Plane::near(1.0);
        let tri = Triangle::new(vertex(0.0, 0.0, 1.0, 0.0, 0.0, 1.0), vertex(1.0, 0.0, 2.0, 1.0, 0.0, 1.0), vertex(0.0, 1.0, 3.0, 0.0, 1.0, 1.0));
        assert_eq!(classify(&near, &tri), Classification::OnPlane);
        assert!(clip_triangle(&near, &tri).is_empty());
    }

    #[test]
    fn screen_planes_keep_the_raster_interior() {
        let planes = screen_planes(100, 50);
        let centre = Point3D::new(50.0, 25.0, 0.0);
        for p in &planes {
            assert!(p.signed_distance(centre) > 0.0);
        }
        assert!(planes[3].signed_distance(Point3D::new(120.0, 25.0, 0.0)) < 0.0);
        assert!(planes[0].signed_distance(Point3D::new(50.0, 60.0, 0.0)) < 0.0);
        // Centres of the last column and row stay inside
        assert!(planes[3].signed_distance(Point3D::new(99.5, 25.0, 0.0)) > 0.0);
        assert!(planes[0].signed_distance(Point3D::new(50.0, 49.5, 0.0)) > 0.0);
    }

    #[test]
    fn chained_clip_drops_triangle_outside_one_plane() {
        let planes = screen_planes(100, 50);
        let tri = Triangle::new(vertex(120.0, 10.0, 1.0, 0.0, 0.0, 1.0), vertex(130.0, 10.0, 1.0, 1.0, 0.0, 1.0), vertex(120.0, 20.0, 1.0, 0.0, 1.0, 1.0));
        assert!(clip_against_planes(&planes, &tri).is_empty());
    }

    #[test]
    fn chained_clip_can_produce_more_than_two_triangles() {
        let planes = screen_planes(100, 100);
        // Big triangle poking out of three sides of the screen
        let tri = Triangle::new(vertex(-50.0, -50.0, 1.0, 0.0, 0.0, 1.0), vertex(-50.0, 200.0, 1.0, 0.0, 1.0, 1.0), vertex(200.0, 50.0, 1.0, 1.0, 0.0, 1.0));
        let out = clip_against_planes(&planes, &tri);
        assert!(out.len() > 2);
        for t in &out {
            for v in t.vertices() {
                for p in &planes {
                    assert!(p.signed_distance(v.position) >= -1e-3);
                }
            }
        }
    }
}
