use crate::point3d::{Point3D, normalize};

/// What the rasterizer writes into the colour buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugView {
    #[default]
    Shaded,
    /// Reciprocal depth as grey levels
    Depth,
    /// Interpolated vertex normal mapped to RGB
    Normals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// 1.0 = texture only, 0.0 = vertex colour only
    pub mix_factor: f32,
    /// Dotted with each face normal to get the light scalar
    pub light_direction: Point3D,
    /// Lower bound of the light scalar
    pub min_light: f32,
    pub clear_colour: (u8, u8, u8, u8),
    pub view: DebugView,
    /// Draw triangle outlines over the shaded result
    pub wireframe: bool,
    pub wireframe_colour: (u8, u8, u8, u8),
    pub backface_cull: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            mix_factor: 1.0,
            light_direction: Point3D::new(0.0, 0.0, 1.0),
            min_light: 0.1,
            clear_colour: (0, 0, 0, 255),
            view: DebugView::Shaded,
            wireframe: false,
            wireframe_colour: (0, 255, 0, 255),
            backface_cull: true,
        }
    }
}

impl RenderSettings {
    pub fn with_light_direction(mut self, dir: Point3D) -> Self {
        self.light_direction = normalize(dir);
        self
    }

    pub fn with_mix_factor(mut self, mix: f32) -> Self {
        self.mix_factor = mix.clamp(0.0, 1.0);
        self
    }
}
