//! Scanline triangle fill.
//!
//! Triangles arrive in screen space with their attributes already premultiplied by `1/w`.
//! Each one is split at its middle vertex into two halves with a horizontal edge, the halves
//! are walked row by row, and every pixel in a padded span goes through the barycentric
//! inside test, the depth test and shading.

use std::cmp::Ordering;

use crate::geometry::{EdgeCoefficients, edge_function, edges_agree, interpolate};
use crate::point2d::Point2D;
use crate::point3d::{Point3D, normalize};
use crate::point4d::Point4D;
use crate::rectangle::Rect;
use crate::screen::{ScreenSpace, depth_to_u8};
use crate::settings::{DebugView, RenderSettings};
use crate::texture::Texture;
use crate::triangle::{Triangle, Vertex};

/// Extra pixels tested on both ends of every span so neighbouring triangles leave no seams
pub const SPAN_PADDING: f32 = 3.0;

/// Per-triangle constants shared by every pixel of the fill
pub struct InterpolationContext<'a> {
    /// Vertices sorted by descending screen y
    pub vertices: [Vertex; 3],
    pub edges: EdgeCoefficients,
    pub area: f32,
    pub inv_depth: Point3D,
    pub inv_w: Point3D,
    pub bounds: Rect,
    pub texture: &'a Texture,
    pub flat_colour: Option<Point4D>,
    pub light: f32,
    pub mix_factor: f32,
    pub view: DebugView,
}

/// Interpolated values at one pixel centre
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fragment {
    pub weights: Point3D,
    pub depth: f32,
    pub w: f32,
    pub uv: Point2D,
    pub normal: Point3D,
    pub colour: Point4D,
}

fn component(p: Point3D, i: usize) -> f32 {
    match i {
        0 => p.x,
        1 => p.y,
        _ => p.z,
    }
}

fn permute(p: Point3D, order: [usize; 3]) -> Point3D {
    Point3D::new(component(p, order[0]), component(p, order[1]), component(p, order[2]))
}

impl<'a> InterpolationContext<'a> {
    /// `None` for triangles with no area or no pixels on the raster
    pub fn new(
        tri: &Triangle,
        inv_depth: Point3D,
        inv_w: Point3D,
        texture: &'a Texture,
        light: f32,
        settings: &RenderSettings,
        width: u32,
        height: u32,
    ) -> Option<Self> {
        let unsorted = tri.vertices();
        let mut order = [0usize, 1, 2];
        // Stable, so equal heights keep their incoming order
        order.sort_by(|&i, &j| {
            unsorted[j].position.y.partial_cmp(&unsorted[i].position.y).unwrap_or(Ordering::Equal)
        });
        let vertices = order.map(|i| unsorted[i]);
        let [a, b, c] = vertices.map(|v| Point2D::from(v.position));

        let area = edge_function(a, b, c);
        if area == 0.0 || !area.is_finite() {
            return None;
        }
        let bounds = Rect::bounding(&[a, b, c], width, height)?;

        Some(Self {
            vertices,
            edges: EdgeCoefficients::new(a, b, c),
            area,
            inv_depth: permute(inv_depth, order),
            inv_w: permute(inv_w, order),
            bounds,
            texture,
            flat_colour: tri.colour,
            light,
            mix_factor: settings.mix_factor,
            view: settings.view,
        })
    }

    fn corner(&self, i: usize) -> Point2D {
        Point2D::from(self.vertices[i].position)
    }

    /// Barycentric weights and perspective-correct attributes at `p`, or `None` when `p` is
    /// outside the triangle
    pub fn fragment_at(&self, p: Point2D) -> Option<Fragment> {
        let e = self.edges.evaluate(p);
        if !edges_agree(e) {
            return None;
        }
        let weights = e / self.area;
        let depth = 1.0 / interpolate(weights, self.inv_depth);
        let w = 1.0 / interpolate(weights, self.inv_w);

        let [va, vb, vc] = &self.vertices;
        let tex = va.tex * weights.x + vb.tex * weights.y + vc.tex * weights.z;
        let normal = va.normal * weights.x + vb.normal * weights.y + vc.normal * weights.z;
        let colour = va.colour * weights.x + vb.colour * weights.y + vc.colour * weights.z;

        // tex.z carries the interpolated 1/w
        let uv = Point2D::new(tex.x / tex.z, tex.y / tex.z);
        Some(Fragment { weights, depth, w, uv, normal: normal * w, colour: colour * w })
    }

    fn shade(&self, frag: &Fragment) -> (u8, u8, u8) {
        match self.view {
            DebugView::Depth => {
                let g = depth_to_u8(frag.depth);
                (g, g, g)
            }
            DebugView::Normals => {
                let n = normalize(frag.normal) * 0.5 + 0.5;
                (to_u8(n.x * 255.0), to_u8(n.y * 255.0), to_u8(n.z * 255.0))
            }
            DebugView::Shaded => {
                let (r, g, b, _) = self.texture.sample(frag.uv);
                let texel = Point3D::new(r as f32, g as f32, b as f32);
                let vertex = self.flat_colour.unwrap_or(frag.colour).xyz() * 255.0;
                let blended = vertex.lerp(texel, self.mix_factor) * self.light;
                (to_u8(blended.x), to_u8(blended.y), to_u8(blended.z))
            }
        }
    }

    /// Depth test and write one pixel. Returns whether anything was written.
    fn plot(&self, screen: &mut ScreenSpace, x: u32, y: u32) -> bool {
        let centre = Point2D::new(x as f32 + 0.5, y as f32 + 0.5);
        let Some(frag) = self.fragment_at(centre) else { return false };
        if !screen.depth_passes(x, y, frag.depth) {
            return false;
        }
        let (r, g, b) = self.shade(&frag);
        screen.set_pixel(x, y, r, g, b, 255);
        screen.set_depth(x, y, frag.depth);
        true
    }

    /// Fill the half of the triangle between `apex` and the horizontal segment `left`..`right`
    fn fill_half(&self, screen: &mut ScreenSpace, apex: Point2D, left: Point2D, right: Point2D) -> usize {
        let base_y = left.y;
        let lo = apex.y.min(base_y).floor().max(self.bounds.min_y as f32);
        let hi = apex.y.max(base_y).floor().min(self.bounds.max_y as f32);
        if !(lo <= hi) {
            return 0;
        }
        let height = base_y - apex.y;
        let mut written = 0;

        for y in lo as u32..=hi as u32 {
            let (x0, x1) = if height == 0.0 {
                let xs = [apex.x, left.x, right.x];
                (xs.iter().copied().fold(f32::INFINITY, f32::min), xs.iter().copied().fold(f32::NEG_INFINITY, f32::max))
            } else {
                let t = ((y as f32 + 0.5 - apex.y) / height).clamp(0.0, 1.0);
                let xl = apex.x + (left.x - apex.x) * t;
                let xr = apex.x + (right.x - apex.x) * t;
                (xl.min(xr), xl.max(xr))
            };
            let start = (x0 - SPAN_PADDING).floor().max(self.bounds.min_x as f32);
            let end = (x1 + SPAN_PADDING).ceil().min(self.bounds.max_x as f32);
            if !(start <= end) {
                continue;
            }
            for x in start as u32..=end as u32 {
                if self.plot(screen, x, y) {
                    written += 1;
                }
            }
        }
        written
    }

    /// Split at the middle vertex and fill both halves. Returns the number of pixels written.
    pub fn fill(&self, screen: &mut ScreenSpace) -> usize {
        let (a, b, c) = (self.corner(0), self.corner(1), self.corner(2));
        // Point on the long edge (a, c) level with b
        let t = (b.y - a.y) / (c.y - a.y);
        let d = Point2D::new(a.x + (c.x - a.x) * t, b.y);
        let (left, right) = if b.x <= d.x { (b, d) } else { (d, b) };

        self.fill_half(screen, a, left, right) + self.fill_half(screen, c, left, right)
    }
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Rasterize one screen space triangle into `screen`.
///
/// `inv_depth` and `inv_w` hold the per-vertex reciprocal depth and `1/w` in the triangle's own
/// vertex order. Returns the number of pixels that passed the depth test.
pub fn rasterize(
    screen: &mut ScreenSpace,
    tri: &Triangle,
    inv_depth: Point3D,
    inv_w: Point3D,
    texture: &Texture,
    light: f32,
    settings: &RenderSettings,
) -> usize {
    match InterpolationContext::new(tri, inv_depth, inv_w, texture, light, settings, screen.width, screen.height) {
        Some(ctx) => ctx.fill(screen),
        None => 0,
    }
}

/// Outline a screen space triangle
pub fn draw_wireframe(screen: &mut ScreenSpace, tri: &Triangle, colour: (u8, u8, u8, u8)) {
    let [a, b, c] = tri.vertices().map(|v| Point2D::from(v.position));
    screen.draw_line(a, b, colour);
    screen.draw_line(b, c, colour);
    screen.draw_line(c, a, colour);
}
