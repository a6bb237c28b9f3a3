use crate::point2d::Point2D;
use crate::point3d::{Point3D, cross3, normalize};
use crate::point4d::Point4D;

/// A single vertex as it travels through the pipeline.
///
/// `position` changes meaning per stage (model, world, view, screen). `tex.z` is free while the
/// vertex is in model/view space and carries `1/w` once the vertex has been projected.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vertex {
    pub position: Point3D,
    pub tex: Point3D,
    pub colour: Point4D,
    pub normal: Point3D,
}

impl Vertex {
    pub fn new(position: Point3D, uv: Point2D, normal: Point3D) -> Self {
        Self {
            position,
            tex: Point3D { x: uv.x, y: uv.y, z: 1.0 },
            colour: Point4D::WHITE,
            normal,
        }
    }

    /// Same attributes, new position
    pub fn with_position(self, position: Point3D) -> Self {
        Self { position, ..self }
    }

    /// Linearly interpolate every non-position attribute towards `other`
    pub fn lerp_attributes(&self, other: &Vertex, t: f32) -> Vertex {
        Vertex {
            position: self.position,
            tex: self.tex.lerp(other.tex, t),
            colour: self.colour.lerp(other.colour, t),
            normal: self.normal.lerp(other.normal, t),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    pub a: Vertex,
    pub b: Vertex,
    pub c: Vertex,
    pub colour: Option<Point4D>,
}

impl Triangle {
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self { a, b, c, colour: None }
    }

    pub fn vertices(&self) -> [Vertex; 3] {
        [self.a, self.b, self.c]
    }

    /// Rebuild from three vertices, keeping the flat colour
    pub fn with_vertices(&self, [a, b, c]: [Vertex; 3]) -> Self {
        Self { a, b, c, colour: self.colour }
    }

    pub fn map_vertices(&self, f: impl Fn(Vertex) -> Vertex) -> Self {
        self.with_vertices(self.vertices().map(f))
    }

    pub fn centroid(&self) -> Point3D {
        (self.a.position + self.b.position + self.c.position) / 3.0
    }

    /// Unit normal following the vertex winding (`(b - a) x (c - a)`)
    pub fn face_normal(&self) -> Point3D {
        let ab = self.b.position - self.a.position;
        let ac = self.c.position - self.a.position;
        normalize(cross3(ab, ac))
    }
}

/// Triangle soup plus the slot of its texture in the scene's texture table
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
    pub texture_index: usize,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>, texture_index: usize) -> Self {
        Self { triangles, texture_index }
    }

    /// Axis aligned quad in the z = 0 plane facing -z, uv spanning the full texture
    pub fn quad(half_size: f32, texture_index: usize) -> Self {
        let s = half_size;
        let n = Point3D::new(0.0, 0.0, -1.0);
        let bl = Vertex::new(Point3D::new(-s, -s, 0.0), Point2D::new(0.0, 0.0), n);
        let br = Vertex::new(Point3D::new(s, -s, 0.0), Point2D::new(1.0, 0.0), n);
        let tr = Vertex::new(Point3D::new(s, s, 0.0), Point2D::new(1.0, 1.0), n);
        let tl = Vertex::new(Point3D::new(-s, s, 0.0), Point2D::new(0.0, 1.0), n);
        Self::new(vec![Triangle::new(bl, tl, tr), Triangle::new(bl, tr, br)], texture_index)
    }
}
