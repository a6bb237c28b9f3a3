use std::path::Path;
use anyhow::{Context, Result, ensure};
use image::{DynamicImage, GenericImageView};

use crate::point2d::Point2D;

pub const PLACEHOLDER_SIZE: u32 = 8;
const PLACEHOLDER_ON: [u8; 4] = [255, 0, 255, 255];
const PLACEHOLDER_OFF: [u8; 4] = [0, 0, 0, 255];

/// RGBA8 image, rows stored bottom-up so that `v = 0` is the bottom edge
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    /// Stand-in for a texture that failed to load
    pub placeholder: bool,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img: DynamicImage = image::open(path).with_context(|| format!("decoding texture {}", path.display()))?;
        let (width, height) = img.dimensions();
        let channels = img.color().channel_count();
        let rgba_img = img.to_rgba8();
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for y in (0..height).rev() {
            let row_start = (y * width * 4) as usize;
            let row_end = row_start + (width * 4) as usize;
            rgba.extend_from_slice(&rgba_img.as_raw()[row_start..row_end]);
        }
        log::info!("loaded texture {} ({}x{}, {} channels)", path.display(), width, height, channels);
        Self::from_rgba8(width, height, rgba).with_context(|| format!("texture {}", path.display()))
    }

    /// Wrap raw bottom-up RGBA8 rows
    pub fn from_rgba8(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "texture must not be empty");
        ensure!(
            rgba.len() == (width * height * 4) as usize,
            "expected {} bytes for a {}x{} texture, got {}",
            width * height * 4, width, height, rgba.len()
        );
        Ok(Self { width, height, rgba, placeholder: false })
    }

    /// Single texel of one colour
    pub fn solid(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { width: 1, height: 1, rgba: vec![r, g, b, a], placeholder: false }
    }

    /// Magenta and black checkerboard used where a texture could not be loaded
    pub fn placeholder() -> Self {
        let mut rgba = Vec::with_capacity((PLACEHOLDER_SIZE * PLACEHOLDER_SIZE * 4) as usize);
        for y in 0..PLACEHOLDER_SIZE {
            for x in 0..PLACEHOLDER_SIZE {
                rgba.extend_from_slice(if (x + y) % 2 == 0 { &PLACEHOLDER_ON } else { &PLACEHOLDER_OFF });
            }
        }
        Self { width: PLACEHOLDER_SIZE, height: PLACEHOLDER_SIZE, rgba, placeholder: true }
    }

    /// Load a texture, falling back to the placeholder on failure
    pub fn load_or_placeholder<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(tex) => tex,
            Err(e) => {
                log::warn!("{e:#}; using placeholder texture");
                Self::placeholder()
            }
        }
    }

    /// Nearest texel at a normalised coordinate. Anything outside `[0, 1]` on either axis is black.
    pub fn sample(&self, uv: Point2D) -> (u8, u8, u8, u8) {
        if !(0.0..=1.0).contains(&uv.x) || !(0.0..=1.0).contains(&uv.y) || self.rgba.is_empty() {
            return (0, 0, 0, 255);
        }
        let x = (uv.x * (self.width as f32 - 1.0)).round() as u32;
        let y = (uv.y * (self.height as f32 - 1.0)).round() as u32;
        let idx = ((y.min(self.height - 1) * self.width + x.min(self.width - 1)) * 4) as usize;
        match self.rgba.get(idx..idx + 4) {
            Some(&[r, g, b, a]) => (r, g, b, a),
            _ => (0, 0, 0, 255),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Texture {
        // bottom row: red, green; top row: blue, white
        Texture::from_rgba8(2, 2, vec![
            255, 0, 0, 255, 0, 255, 0, 255,
            0, 0, 255, 255, 255, 255, 255, 255,
        ]).unwrap()
    }

    #[test]
    fn sample_picks_nearest_texel() {
        let t = two_by_two();
        assert_eq!(t.sample(Point2D::new(0.0, 0.0)), (255, 0, 0, 255));
        assert_eq!(t.sample(Point2D::new(0.9, 0.1)), (0, 255, 0, 255));
        assert_eq!(t.sample(Point2D::new(0.2, 1.0)), (0, 0, 255, 255));
        assert_eq!(t.sample(Point2D::new(1.0, 1.0)), (255, 255, 255, 255));
    }

    #[test]
    fn outside_unit_square_is_black() {
        let t = two_by_two();
        assert_eq!(t.sample(Point2D::new(-0.01, 0.5)), (0, 0, 0, 255));
        assert_eq!(t.sample(Point2D::new(0.5, 1.5)), (0, 0, 0, 255));
        assert_eq!(t.sample(Point2D::new(f32::NAN, 0.5)), (0, 0, 0, 255));
    }

    #[test]
    fn rejects_wrong_buffer_size() {
        assert!(Texture::from_rgba8(2, 2, vec![0; 15]).is_err());
        assert!(Texture::from_rgba8(0, 2, vec![]).is_err());
    }

    #[test]
    fn missing_file_falls_back_to_placeholder() {
        let t = Texture::load_or_placeholder("definitely/not/here.png");
        assert!(t.placeholder);
        assert_eq!(t.sample(Point2D::new(0.0, 0.0)), (255, 0, 255, 255));
    }
}
