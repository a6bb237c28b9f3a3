//! Per-triangle geometry pipeline and the mesh level driver.
//!
//! model -> flip y -> cull -> view -> near clip -> project + divide -> screen clip -> raster

use std::ops::AddAssign;

use crate::camera::ViewParams;
use crate::clip::{Plane, clip_against_planes, clip_triangle, screen_planes};
use crate::matrix::Mat4;
use crate::point3d::{Point3D, dot3};
use crate::raster::{draw_wireframe, rasterize};
use crate::scene::Scene;
use crate::screen::ScreenSpace;
use crate::settings::RenderSettings;
use crate::texture::Texture;
use crate::triangle::{Mesh, Triangle, Vertex};

/// Where triangles went during a draw
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub submitted: usize,
    pub culled: usize,
    pub clipped_away: usize,
    /// Screen space triangles handed to the rasterizer (after clipping)
    pub rasterized: usize,
    pub pixels: usize,
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, other: DrawStats) {
        self.submitted += other.submitted;
        self.culled += other.culled;
        self.clipped_away += other.clipped_away;
        self.rasterized += other.rasterized;
        self.pixels += other.pixels;
    }
}

/// Model transform on positions and normals, then flip y so world y runs down the screen
pub fn to_world(tri: &Triangle, model: &Mat4) -> Triangle {
    tri.map_vertices(|v| {
        let p = model.transform_point(v.position).xyz();
        Vertex {
            position: Point3D::new(p.x, -p.y, p.z),
            normal: model.transform_vector(v.normal),
            ..v
        }
    })
}

/// Back-face and behind-camera tests on a world space triangle
pub fn is_visible(world: &Triangle, view: &ViewParams, backface_cull: bool) -> bool {
    let to_triangle = world.centroid() - view.position;
    if backface_cull && !(dot3(world.face_normal(), to_triangle) > 0.0) {
        return false;
    }
    dot3(to_triangle, view.forward) > 0.0
}

/// Light scalar for a world space face
pub fn light_intensity(world: &Triangle, settings: &RenderSettings) -> f32 {
    dot3(settings.light_direction, world.face_normal()).max(settings.min_light)
}

/// Project a view space vertex to the screen.
///
/// The result carries the reciprocal depth in `position.z` and `1/w` in `tex.z`; uv, normal and
/// colour come back premultiplied by `1/w`.
pub fn project_vertex(v: &Vertex, projection: &Mat4, width: u32, height: u32) -> Vertex {
    let clip = projection.transform_point(v.position);
    let inv_w = 1.0 / clip.w;
    let ndc = clip.xyz() * inv_w;
    let inv_depth = 1.0 / ndc.z;
    Vertex {
        position: Point3D::new(
            (ndc.x + 1.0) * 0.5 * width as f32,
            (ndc.y + 1.0) * 0.5 * height as f32,
            inv_depth,
        ),
        tex: Point3D::new(v.tex.x * inv_w, v.tex.y * inv_w, inv_w),
        colour: v.colour * inv_w,
        normal: v.normal * inv_w,
    }
}

/// Run one model space triangle through the whole pipeline into `screen`
pub fn draw_triangle(
    screen: &mut ScreenSpace,
    tri: &Triangle,
    model: &Mat4,
    view: &ViewParams,
    texture: &Texture,
    settings: &RenderSettings,
) -> DrawStats {
    let mut stats = DrawStats { submitted: 1, ..Default::default() };

    let world = to_world(tri, model);
    if !is_visible(&world, view, settings.backface_cull) {
        stats.culled = 1;
        return stats;
    }
    let light = light_intensity(&world, settings);

    let view_tri = world.map_vertices(|v| v.with_position(view.view.transform_point(v.position).xyz()));
    let planes = screen_planes(screen.width, screen.height);

    for near_clipped in clip_triangle(&Plane::near(view.near), &view_tri) {
        let projected = near_clipped.map_vertices(|v| project_vertex(&v, &view.projection, screen.width, screen.height));
        for screen_tri in clip_against_planes(&planes, &projected) {
            let [a, b, c] = screen_tri.vertices();
            let inv_depth = Point3D::new(a.position.z, b.position.z, c.position.z);
            let inv_w = Point3D::new(a.tex.z, b.tex.z, c.tex.z);
            stats.pixels += rasterize(screen, &screen_tri, inv_depth, inv_w, texture, light, settings);
            stats.rasterized += 1;
            if settings.wireframe {
                draw_wireframe(screen, &screen_tri, settings.wireframe_colour);
            }
        }
    }
    if stats.rasterized == 0 {
        stats.clipped_away = 1;
    }
    stats
}

/// Draw every triangle of a mesh
pub fn draw_mesh(
    screen: &mut ScreenSpace,
    mesh: &Mesh,
    model: &Mat4,
    view: &ViewParams,
    texture: &Texture,
    settings: &RenderSettings,
) -> DrawStats {
    let mut stats = DrawStats::default();
    for tri in &mesh.triangles {
        stats += draw_triangle(screen, tri, model, view, texture, settings);
    }
    stats
}

/// Clear the buffers and draw the whole scene
pub fn render_scene(screen: &mut ScreenSpace, scene: &Scene, view: &ViewParams, settings: &RenderSettings) -> DrawStats {
    let (r, g, b, a) = settings.clear_colour;
    screen.clear(r, g, b, a);
    let mut stats = DrawStats::default();
    for object in &scene.objects {
        let texture = scene.texture(object.mesh.texture_index);
        stats += draw_mesh(screen, &object.mesh, &object.model_matrix(), view, texture, settings);
    }
    log::debug!("frame: {stats:?}");
    stats
}
