use std::path::Path;

use crate::matrix::Mat4;
use crate::texture::Texture;
use crate::transform::Transform;
use crate::triangle::Mesh;

/// A mesh placed in the world
pub struct SceneObject {
    pub mesh: Mesh,
    pub transform: Transform,
    pub scale: f32,
}

impl SceneObject {
    pub fn new(mesh: Mesh, transform: Transform) -> Self {
        Self { mesh, transform, scale: 1.0 }
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transform.to_matrix() * Mat4::scale(self.scale)
    }
}

/// Owns every mesh and texture that gets drawn. Meshes refer to textures by slot.
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub textures: Vec<Texture>,
    placeholder: Texture,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self { objects: Vec::new(), textures: Vec::new(), placeholder: Texture::placeholder() }
    }

    pub fn add_texture(&mut self, texture: Texture) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    /// Load into a new slot. A failed load still takes the slot, holding the placeholder.
    pub fn load_texture<P: AsRef<Path>>(&mut self, path: P) -> usize {
        self.add_texture(Texture::load_or_placeholder(path))
    }

    pub fn add_object(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Texture in `index`, or the placeholder when the slot does not exist
    pub fn texture(&self, index: usize) -> &Texture {
        self.textures.get(index).unwrap_or(&self.placeholder)
    }

    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.triangles.len()).sum()
    }
}
