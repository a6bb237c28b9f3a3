use bytemuck::try_cast_slice_mut;
use std::fs::File;
use std::io::{Write, BufWriter};
use std::path::Path;
use anyhow::{Context, Result};

use crate::point2d::Point2D;

/// Depth value of a cleared pixel. Stored depths are reciprocal, so anything visible is larger.
pub const CLEAR_DEPTH: f32 = 0.0;

/// Colour buffer (RGBA8, row-major, origin top-left) plus a reciprocal depth buffer
pub struct ScreenSpace {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub depth: Vec<f32>,
}

impl ScreenSpace {
    pub fn new(width: u32, height: u32) -> Self {
        let size_calc = (width * height) as usize;
        Self {
            width,
            height,
            rgba: vec![0; size_calc * 4],
            depth: vec![CLEAR_DEPTH; size_calc],
        }
    }

    #[inline(always)]
    pub fn pixel_index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height { return None }
        Some((y * self.width + x) as usize)
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, red: u8, green: u8, blue: u8, alpha: u8) {
        let Some(p) = self.pixel_index(x, y) else { return };
        let i = p * 4;
        self.rgba[i] = red;
        self.rgba[i + 1] = green;
        self.rgba[i + 2] = blue;
        self.rgba[i + 3] = alpha;
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8, u8)> {
        let i = self.pixel_index(x, y)? * 4;
        Some((self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]))
    }

    pub fn set_depth(&mut self, x: u32, y: u32, value: f32) {
        if let Some(i) = self.pixel_index(x, y) {
            self.depth[i] = value;
        }
    }

    pub fn get_depth(&self, x: u32, y: u32) -> Option<f32> {
        self.pixel_index(x, y).map(|i| self.depth[i])
    }

    /// Greater-wins depth test. Out of range pixels and non-finite depths never pass.
    #[inline(always)]
    pub fn depth_passes(&self, x: u32, y: u32, depth: f32) -> bool {
        match self.get_depth(x, y) {
            Some(stored) => depth.is_finite() && depth > stored,
            None => false,
        }
    }

    pub fn clear(&mut self, r: u8, g: u8, b: u8, a: u8) {
        let color: u32 = u32::from_le_bytes([r, g, b, a]);
        match try_cast_slice_mut::<u8, u32>(&mut self.rgba) {
            Ok(buf_as_u32) => buf_as_u32.fill(color),
            // Allocation not word aligned, fill byte-wise
            Err(_) => self.rgba.chunks_exact_mut(4).for_each(|px| px.copy_from_slice(&[r, g, b, a])),
        }
        self.depth.fill(CLEAR_DEPTH);
    }

    /// Parametric line walk, one step per pixel along the major axis
    pub fn draw_line(&mut self, from: Point2D, to: Point2D, colour: (u8, u8, u8, u8)) {
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil();
        if !steps.is_finite() {
            return;
        }
        let steps = steps.max(1.0) as u32;
        let (r, g, b, a) = colour;
        for i in 0..=steps {
            let p = from + delta * (i as f32 / steps as f32);
            let (x, y) = (p.x.floor(), p.y.floor());
            if x < 0.0 || y < 0.0 {
                continue;
            }
            self.set_pixel(x as u32, y as u32, r, g, b, a);
        }
    }

    pub fn write_bmp<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let width = self.width;
        let height = self.height;
        let row_stride = (3 * width + 3) & !3;
        let pixel_array_size = row_stride * height;
        let file_size = 54 + pixel_array_size;
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut file = BufWriter::new(file);
        file.write_all(b"BM")?;
        file.write_all(&(file_size as u32).to_le_bytes())?;
        file.write_all(&[0u8; 4])?;
        file.write_all(&54u32.to_le_bytes())?;
        file.write_all(&[40u8, 0, 0, 0])?;
        file.write_all(&(width as i32).to_le_bytes())?;
        file.write_all(&(height as i32).to_le_bytes())?;
        file.write_all(&[1, 0])?;
        file.write_all(&[24, 0])?;
        file.write_all(&[0u8; 4])?;
        file.write_all(&(pixel_array_size as u32).to_le_bytes())?;
        file.write_all(&[0u8; 16])?;
        let padding = vec![0u8; (row_stride - width * 3) as usize];
        // BMP rows run bottom-up
        for y in (0..height).rev() {
            for x in 0..width {
                let i = ((y * width + x) * 4) as usize;
                file.write_all(&[self.rgba[i + 2], self.rgba[i + 1], self.rgba[i]])?;
            }
            file.write_all(&padding)?;
        }
        file.flush()?;
        Ok(())
    }
}

/// Grey level for a reciprocal depth: white at the near plane, black at the cleared background
pub fn depth_to_u8(depth: f32) -> u8 {
    if !(depth > 0.0) {
        return 0
    }
    (255.0 * depth.min(1.0).powf(0.25)).round().clamp(0.0, 255.0) as u8
}
