pub mod point2d;
pub mod point3d;
pub mod point4d;
pub mod matrix;
pub mod triangle;
pub mod transform;
pub mod camera;
pub mod clip;
pub mod geometry;
pub mod rectangle;
pub mod raster;
pub mod screen;
pub mod texture;
pub mod obj;
pub mod scene;
pub mod settings;
pub mod pipeline;
